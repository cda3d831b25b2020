//! Render-scoped state threaded through marker processing.

use crate::model::{LayoutId, PageId};
use std::collections::HashMap;

/// Who a render is being performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextOwner {
    /// Rendering a page's content.
    Page(PageId),
    /// Processing a layout body directly.
    Layout(LayoutId),
}

/// Scratch state for one render pass.
///
/// `tags` accumulates whatever the marker processor wants to record (for
/// example which tags were seen). It is shared across a whole head merge chain
/// and must not be shared between renders of different pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    owner: ContextOwner,
    tags: Vec<String>,
}

impl RenderContext {
    /// Context for rendering `page`.
    pub fn for_page(page: PageId) -> Self {
        Self {
            owner: ContextOwner::Page(page),
            tags: Vec::new(),
        }
    }

    /// Context for processing a layout body on its own.
    pub fn for_layout(layout: LayoutId) -> Self {
        Self {
            owner: ContextOwner::Layout(layout),
            tags: Vec::new(),
        }
    }

    /// Record this context renders for.
    pub fn owner(&self) -> ContextOwner {
        self.owner
    }

    /// Tags recorded so far, in recording order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Append a tag. Duplicates are kept.
    pub fn record_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Forget every recorded tag.
    pub fn reset_tags(&mut self) {
        self.tags.clear();
    }
}

/// Processed css per layout, kept for the lifetime of one caller-owned pass.
#[derive(Debug, Clone, Default)]
pub struct CssMemo {
    entries: HashMap<LayoutId, String>,
}

impl CssMemo {
    /// Empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized css for `layout`, if any.
    pub fn get(&self, layout: LayoutId) -> Option<&str> {
        self.entries.get(&layout).map(String::as_str)
    }

    /// Store processed css for `layout`, replacing any earlier value.
    pub fn insert(&mut self, layout: LayoutId, css: String) {
        self.entries.insert(layout, css);
    }

    /// Drop the memoized css for `layout`.
    pub fn forget(&mut self, layout: LayoutId) -> Option<String> {
        self.entries.remove(&layout)
    }

    /// Number of memoized layouts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
