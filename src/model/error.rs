//! Error types for the layout engine.
//!
//! This module defines a hierarchical error taxonomy using `thiserror`. Errors compose
//! via `?` and `From` conversions into the top-level [`LayoutError`].
//!
//! # Error Hierarchy
//!
//! - [`LayoutError`] - Top-level error returned by store, merge and cascade operations
//!   - [`ValidationError`] - A layout failed its save-time checks (missing site, bad
//!     identifier, duplicate identifier, blank label, bad parent)
//!   - [`StructuralError`] - The stored parent chain is broken (cycle, dangling parent,
//!     depth guard exceeded)
//!   - [`MarkerError`] - The tag-processing collaborator failed; carried unchanged
//!   - `NotFound` variants - An id did not resolve to a stored record
//!
//! # Recovery Strategy
//!
//! Validation errors are surfaced to whoever is editing the layout so the record can be
//! corrected; they are never retried. Structural errors are fatal for the current render
//! only. Blank text bodies (content, head, css) are never errors.

use crate::model::identifiers::{LayoutId, LayoutIdentifier, PageId, SiteId};
use thiserror::Error;

/// Top-level error for every core operation.
///
/// Domain-specific errors convert into `LayoutError` via `From`, so store, merge and
/// cascade code can propagate with `?`.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A layout failed validation on save.
    ///
    /// **Recovery**: Show the message to the editor; the record was not written.
    #[error("Layout is invalid: {0}")]
    Validation(#[from] ValidationError),

    /// The parent chain of a layout cannot be walked.
    ///
    /// **Recovery**: Abort the current render. Other pages are unaffected.
    #[error("Layout tree is broken: {0}")]
    Structural(#[from] StructuralError),

    /// The tag-processing collaborator rejected a text body.
    ///
    /// Propagated unchanged; this crate does not reinterpret collaborator failures.
    #[error(transparent)]
    Marker(#[from] MarkerError),

    /// No layout is stored under the given id.
    #[error("Layout not found: {0}")]
    LayoutNotFound(LayoutId),

    /// No page is stored under the given id.
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    /// No site is stored under the given id.
    #[error("Site not found: {0}")]
    SiteNotFound(SiteId),
}

/// Save-time validation failures for a layout.
///
/// Label defaulting runs before any of these checks, so `BlankLabel` only fires when
/// the identifier titleizes to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The layout has no owning site, or the site is unknown to the store.
    #[error("site can't be blank")]
    MissingSite,

    /// The identifier is empty or whitespace.
    #[error("identifier can't be blank")]
    BlankIdentifier,

    /// The identifier does not match the identifier pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmslayout::model::error::ValidationError;
    ///
    /// let err = ValidationError::InvalidIdentifier {
    ///     identifier: "Two Column".to_string(),
    /// };
    /// assert!(err.to_string().contains("'Two Column'"));
    /// ```
    #[error("identifier '{identifier}' is invalid")]
    InvalidIdentifier {
        /// The rejected token, verbatim.
        identifier: String,
    },

    /// Another layout in the same site already uses this identifier.
    #[error("identifier '{identifier}' has already been taken in {site}")]
    DuplicateIdentifier {
        /// The conflicting token.
        identifier: LayoutIdentifier,
        /// Site scoping the uniqueness check.
        site: SiteId,
    },

    /// The label is blank even after defaulting from the identifier.
    #[error("label can't be blank")]
    BlankLabel,

    /// The parent id does not resolve to a stored layout.
    #[error("parent {parent} does not exist")]
    UnknownParent {
        /// The missing parent id.
        parent: LayoutId,
    },

    /// The parent belongs to a different site.
    #[error("parent {parent} belongs to another site")]
    ParentInOtherSite {
        /// The foreign parent id.
        parent: LayoutId,
    },

    /// Another sibling under the same parent already holds this explicit position.
    #[error("position {position} is already taken under this parent")]
    DuplicatePosition {
        /// The contested rank.
        position: i64,
    },

    /// An update gave the layout a negative sibling rank.
    #[error("position {position} must not be negative")]
    NegativePosition {
        /// The rejected rank.
        position: i64,
    },

    /// An update tried to move a layout to a different site.
    ///
    /// Children and assigned pages stay with the original site, so a layout
    /// never changes owner once saved.
    #[error("{layout} can't move from {from} to another site")]
    SiteChanged {
        /// The layout being saved.
        layout: LayoutId,
        /// Its current owning site.
        from: SiteId,
    },

    /// A reorder request named a layout that is not a child of the given parent.
    #[error("{layout} is not a sibling in this reorder")]
    NotASibling {
        /// The stray layout id.
        layout: LayoutId,
    },

    /// A page was assigned to a layout owned by a different site.
    #[error("{layout} belongs to another site")]
    LayoutInOtherSite {
        /// The foreign layout id.
        layout: LayoutId,
    },

    /// Assigning this parent would make the layout its own ancestor.
    #[error("parent {parent} would make {layout} its own ancestor")]
    ParentCycle {
        /// The layout being saved.
        layout: LayoutId,
        /// The proposed parent.
        parent: LayoutId,
    },
}

/// Failures walking a stored parent chain.
///
/// The data model forbids cycles but stored data is not re-validated when it is
/// loaded, so every chain walk guards against these explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The parent chain starting at `layout` revisits a layout.
    #[error("cyclic parent chain detected at {layout}")]
    Cycle {
        /// First layout seen twice while walking up.
        layout: LayoutId,
    },

    /// A layout references a parent that is not stored.
    #[error("{layout} references missing parent {parent}")]
    DanglingParent {
        /// The layout holding the stale reference.
        layout: LayoutId,
        /// The missing parent id.
        parent: LayoutId,
    },

    /// The chain is deeper than the configured guard allows.
    #[error("layout chain at {layout} exceeds maximum depth {max_depth}")]
    DepthExceeded {
        /// Layout where the walk stopped.
        layout: LayoutId,
        /// Configured limit.
        max_depth: usize,
    },
}

/// Error reported by a [`MarkerProcessor`](crate::merge::MarkerProcessor).
///
/// # Examples
///
/// ```
/// use cmslayout::model::error::MarkerError;
///
/// let err = MarkerError::new("unknown tag").with_marker("cms:snippet:missing");
/// assert!(err.to_string().contains("cms:snippet:missing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("marker processing failed{}: {message}", marker_suffix(.marker))]
pub struct MarkerError {
    /// Marker expression that failed, when the processor can tell.
    pub marker: Option<String>,
    /// Processor-supplied reason.
    pub message: String,
}

fn marker_suffix(marker: &Option<String>) -> String {
    marker
        .as_ref()
        .map(|m| format!(" at '{m}'"))
        .unwrap_or_default()
}

impl MarkerError {
    /// Failure without a known marker.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            marker: None,
            message: message.into(),
        }
    }

    /// Attach the marker expression that failed.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }
}
