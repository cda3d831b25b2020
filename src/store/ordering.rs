//! Sibling ordering under a shared parent.
//!
//! Positions are plain integers ranked ascending. New layouts land after their
//! last sibling; an explicit reorder rewrites ranks to `0..n`.

use crate::model::{LayoutId, LayoutNode};

/// Trailing position after `siblings`: `max + 1`, or `0` when there are none.
pub fn next_position(siblings: impl IntoIterator<Item = i64>) -> i64 {
    siblings.into_iter().max().map_or(0, |max| max + 1)
}

/// Sort layouts into display order: ascending position, ties broken by id.
pub fn sort_siblings(nodes: &mut [&LayoutNode]) {
    nodes.sort_by_key(|node| (node.position, node.id));
}

/// Positions to assign for an explicit reorder: the `i`th id gets rank `i`.
pub fn ranks_for(ordered: &[LayoutId]) -> impl Iterator<Item = (LayoutId, i64)> + '_ {
    ordered.iter().zip(0_i64..).map(|(&id, rank)| (id, rank))
}
