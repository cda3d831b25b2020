//! Indented option lists of a site's layout tree.
//!
//! Used by pickers that let an editor choose a parent layout: the layout being
//! edited is passed as `exclude` so neither it nor its subtree can be picked.

use crate::model::{LayoutId, LayoutNode, SiteId};
use crate::store::LayoutStore;
use serde::Serialize;
use std::collections::HashSet;

/// Default indentation unit per tree level.
pub const DEFAULT_SPACER: &str = ". . ";

/// One picker entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Indented display label.
    pub label: String,
    /// Layout the entry picks.
    pub id: LayoutId,
}

/// Parameters for [`options_for_select`].
#[derive(Debug, Clone, Copy)]
pub struct SelectRequest<'a> {
    /// Site whose tree is listed.
    pub site: SiteId,
    /// Layout skipped together with its subtree.
    pub exclude: Option<LayoutId>,
    /// Layouts to start from; the site's roots when `None`.
    pub start: Option<&'a [LayoutId]>,
    /// Indentation level of the starting layouts.
    pub depth: usize,
    /// Repeated once per level of indentation.
    pub spacer: &'a str,
}

impl<'a> SelectRequest<'a> {
    /// Whole tree of `site` with the default spacer.
    pub fn new(site: SiteId) -> Self {
        Self {
            site,
            exclude: None,
            start: None,
            depth: 0,
            spacer: DEFAULT_SPACER,
        }
    }

    /// Skip `layout` and its subtree.
    pub fn excluding(mut self, layout: LayoutId) -> Self {
        self.exclude = Some(layout);
        self
    }

    /// Start from `layouts` instead of the roots.
    pub fn starting_at(mut self, layouts: &'a [LayoutId]) -> Self {
        self.start = Some(layouts);
        self
    }

    /// Indent the starting layouts `depth` levels.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Use `spacer` for indentation.
    pub fn with_spacer(mut self, spacer: &'a str) -> Self {
        self.spacer = spacer;
        self
    }
}

/// Depth-first `(label, id)` list with labels indented by `spacer * depth`.
///
/// Start ids that do not resolve, or belong to another site, are skipped.
/// Each layout is emitted at most once.
pub fn options_for_select(store: &LayoutStore, request: SelectRequest<'_>) -> Vec<SelectOption> {
    let start: Vec<&LayoutNode> = match request.start {
        Some(ids) => ids
            .iter()
            .filter_map(|id| store.layout(*id))
            .filter(|layout| layout.site == request.site)
            .collect(),
        None => store.roots(request.site),
    };

    let mut out = Vec::new();
    let mut emitted = HashSet::new();
    collect(store, &request, start, request.depth, &mut emitted, &mut out);
    out
}

fn collect(
    store: &LayoutStore,
    request: &SelectRequest<'_>,
    nodes: Vec<&LayoutNode>,
    depth: usize,
    emitted: &mut HashSet<LayoutId>,
    out: &mut Vec<SelectOption>,
) {
    for node in nodes {
        if request.exclude == Some(node.id) || !emitted.insert(node.id) {
            continue;
        }
        out.push(SelectOption {
            label: format!("{}{}", request.spacer.repeat(depth), node.label),
            id: node.id,
        });
        collect(store, request, store.children(node.id), depth + 1, emitted, out);
    }
}
