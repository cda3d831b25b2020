//! Domain model: identifiers, layout records, pages, sites and errors.
//!
//! Everything here is plain data. Tree structure is expressed through
//! id references (`LayoutNode::parent`, `Page::layout`) resolved by the
//! [`store`](crate::store), never through owning pointers.

pub mod error;
pub mod identifiers;
pub mod layout;
pub mod page;
pub mod site;

pub use error::{LayoutError, MarkerError, StructuralError, ValidationError};
pub use identifiers::{InvalidIdentifier, LayoutId, LayoutIdentifier, PageId, SiteId};
pub use layout::{capitalize, titleize, LayoutDraft, LayoutNode};
pub use page::Page;
pub use site::Site;
