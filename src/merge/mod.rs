//! Layout merging.
//!
//! Three outputs are derived from a layout chain (the layout plus its
//! ancestors up to a root):
//!
//! - **content**: folded root to leaf. A parent contributes only if it
//!   contains the page-content placeholder; the child's content replaces every
//!   occurrence. Otherwise the child's content stands alone.
//! - **head**: every layout's processed head, concatenated root first.
//! - **css**: per layout only, no ancestor merging.
//!
//! Chain walks fail with [`StructuralError`] on cycles, dangling parents or
//! chains deeper than the configured maximum.

use crate::model::{LayoutError, LayoutId, LayoutNode, PageId, StructuralError};
use crate::store::LayoutStore;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

pub mod context;
pub mod markers;
pub mod placeholder;

pub use context::{ContextOwner, CssMemo, RenderContext};
pub use markers::{sanitize_embedded_code, MarkerProcessor, MarkerRecorder};

/// Deepest layout chain walked before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Processed head fragments of a chain, outermost layout first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedHead {
    fragments: Vec<String>,
}

impl MergedHead {
    /// Fragments in chain order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Number of fragments; equals the chain length.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True only for an empty chain, which `chain` never yields.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenate the fragments into one string.
    pub fn into_string(self) -> String {
        self.fragments.concat()
    }
}

impl fmt::Display for MergedHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fragments.iter().try_for_each(|fragment| f.write_str(fragment))
    }
}

/// Read-only merge operations over a store.
///
/// Holds no per-render state: callers pass a [`RenderContext`] or
/// [`CssMemo`] where one is needed, so one engine can serve concurrent renders.
pub struct MergeEngine<'a, P: ?Sized> {
    store: &'a LayoutStore,
    processor: &'a P,
    max_depth: usize,
}

impl<'a, P: MarkerProcessor + ?Sized> MergeEngine<'a, P> {
    /// Engine over `store` using `processor`, with [`DEFAULT_MAX_DEPTH`].
    pub fn new(store: &'a LayoutStore, processor: &'a P) -> Self {
        Self {
            store,
            processor,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the chain depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The layout and its ancestors, root first.
    pub fn chain(&self, layout: LayoutId) -> Result<Vec<&'a LayoutNode>, LayoutError> {
        let mut current = self.store.require_layout(layout)?;
        let mut chain = vec![current];
        let mut seen = HashSet::from([layout]);

        while let Some(parent) = current.parent {
            if !seen.insert(parent) {
                warn!(layout = %layout, revisited = %parent, "Cyclic layout chain");
                return Err(StructuralError::Cycle { layout: parent }.into());
            }
            if chain.len() >= self.max_depth {
                return Err(StructuralError::DepthExceeded {
                    layout,
                    max_depth: self.max_depth,
                }
                .into());
            }
            current = self
                .store
                .layout(parent)
                .ok_or(StructuralError::DanglingParent {
                    layout: current.id,
                    parent,
                })?;
            chain.push(current);
        }

        chain.reverse();
        Ok(chain)
    }

    /// Content of `layout` merged into its ancestors via the content placeholder.
    pub fn merged_content(&self, layout: LayoutId) -> Result<String, LayoutError> {
        let chain = self.chain(layout)?;
        let mut nodes = chain.into_iter();
        let mut merged = nodes
            .next()
            .map(|root| root.content_text().to_string())
            .unwrap_or_default();

        for node in nodes {
            merged = placeholder::substitute_content(&merged, node.content_text())
                .unwrap_or_else(|| node.content_text().to_string());
        }
        Ok(merged)
    }

    /// Processed head of every layout in the chain, outermost first.
    ///
    /// Bodies are processed innermost first, so tags land in `context` in that
    /// order. `context` is shared by the whole chain.
    pub fn merged_head(
        &self,
        layout: LayoutId,
        context: &mut RenderContext,
    ) -> Result<MergedHead, LayoutError> {
        let chain = self.chain(layout)?;
        let mut fragments = Vec::with_capacity(chain.len());
        for node in chain.iter().rev() {
            let sanitized = self.processor.sanitize(node.head_text());
            fragments.push(self.processor.process(context, &sanitized)?);
        }
        fragments.reverse();
        Ok(MergedHead { fragments })
    }

    /// Processed css of one layout.
    ///
    /// With `force_reload` the css is always reprocessed (with fresh tags) and
    /// the memo refreshed; without it a memoized value is returned if present.
    pub fn processed_css(
        &self,
        layout: LayoutId,
        force_reload: bool,
        memo: &mut CssMemo,
    ) -> Result<String, LayoutError> {
        if !force_reload {
            if let Some(css) = memo.get(layout) {
                return Ok(css.to_string());
            }
        }
        let node = self.store.require_layout(layout)?;
        let mut context = RenderContext::for_layout(layout);
        let sanitized = self.processor.sanitize(node.css_text());
        let css = self.processor.process(&mut context, &sanitized)?;
        memo.insert(layout, css.clone());
        Ok(css)
    }

    /// Final content for `page`, ignoring any cached value.
    ///
    /// A page without a layout renders as the empty string.
    pub fn render_content(
        &self,
        page: PageId,
        context: &mut RenderContext,
    ) -> Result<String, LayoutError> {
        let Some(layout) = self.store.assigned_layout(page)? else {
            return Ok(String::new());
        };
        let merged = self.merged_content(layout.id)?;
        let sanitized = self.processor.sanitize(&merged);
        Ok(self.processor.process(context, &sanitized)?)
    }
}

/// Rendered content for `page`, served from its cache when present and
/// cached otherwise.
pub fn render_page<P: MarkerProcessor + ?Sized>(
    store: &mut LayoutStore,
    processor: &P,
    max_depth: usize,
    page: PageId,
) -> Result<String, LayoutError> {
    let cached = store
        .page(page)
        .ok_or(LayoutError::PageNotFound(page))?
        .content_cache
        .clone();
    if let Some(cached) = cached {
        debug!(page = %page, "Serving cached page content");
        return Ok(cached);
    }

    let mut context = RenderContext::for_page(page);
    let rendered = MergeEngine::new(store, processor)
        .with_max_depth(max_depth)
        .render_content(page, &mut context)?;

    if let Some(entry) = store.page_mut(page) {
        entry.content_cache = Some(rendered.clone());
    }
    debug!(page = %page, tags = context.tags().len(), "Rendered page content");
    Ok(rendered)
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
