//! Cache invalidation cascade.
//!
//! A page's rendered content depends on its layout and on every ancestor of
//! that layout. When a layout changes, pages assigned to it and to every
//! descendant layout lose their cached output.
//!
//! The walk is depth-first in sibling order. Each page is cleared on its own;
//! one page never blocks another. A layout reached twice (only possible with a
//! corrupted parent chain) is skipped rather than revisited.

use crate::model::{LayoutId, PageId};
use crate::store::LayoutStore;
use std::collections::HashSet;
use tracing::{debug, warn};

/// What a cascade touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Layouts walked, in visit order, starting with the changed one.
    pub layouts_visited: Vec<LayoutId>,
    /// Pages whose cached content was reset.
    pub pages_cleared: Vec<PageId>,
}

impl InvalidationReport {
    /// True when no page was cleared.
    pub fn is_empty(&self) -> bool {
        self.pages_cleared.is_empty()
    }
}

/// Clear cached content of pages on `layout` and all of its descendants.
///
/// Does not delete pages or layouts. A missing `layout` yields an empty report.
pub fn invalidate_cascade(store: &mut LayoutStore, layout: LayoutId) -> InvalidationReport {
    let mut report = InvalidationReport::default();
    let mut seen = HashSet::new();
    let mut stack = vec![layout];

    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            warn!(layout = %current, "Layout reached twice during invalidation; parent chain is cyclic");
            continue;
        }
        if store.layout(current).is_none() {
            continue;
        }
        report.layouts_visited.push(current);

        for page_id in store.pages_for_layout(current) {
            if let Some(page) = store.page_mut(page_id) {
                page.clear_cache();
                report.pages_cleared.push(page_id);
            }
        }

        // Reverse so the first child is popped first.
        stack.extend(store.child_ids(current).into_iter().rev());
    }

    debug!(
        layout = %layout,
        layouts = report.layouts_visited.len(),
        pages = report.pages_cleared.len(),
        "Invalidated cached page content"
    );
    report
}
