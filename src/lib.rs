//! cmslayout
//!
//! Hierarchical layout inheritance for a content-management system.
//!
//! Layouts form a tree per site. A page renders through its layout's chain of
//! ancestors: content merges through the `{{ cms:page:content }}` placeholder,
//! head fragments concatenate outermost first, css stays per layout. Saving or
//! destroying a layout clears cached output of every page rendered through it
//! or through any of its descendants.

pub mod bootstrap;
pub mod config;
pub mod invalidate;
pub mod logging;
pub mod merge;
pub mod model;
pub mod select;
pub mod source;
pub mod store;
