//! Pages: the consumers of merged layout output.

use crate::model::identifiers::{LayoutId, PageId, SiteId};
use serde::Serialize;

/// A page assigned to (at most) one layout.
///
/// `content_cache` holds the last rendered output. It is cleared whenever the
/// assigned layout or any of its ancestors changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Store-assigned id.
    pub id: PageId,
    /// Owning site.
    pub site: SiteId,
    /// URL slug, unique per site by convention.
    pub slug: String,
    /// `None` once the layout has been destroyed.
    pub layout: Option<LayoutId>,
    /// Last rendered output, if still valid.
    pub content_cache: Option<String>,
}

impl Page {
    /// Uncached page.
    pub fn new(id: PageId, site: SiteId, slug: impl Into<String>, layout: Option<LayoutId>) -> Self {
        Self {
            id,
            site,
            slug: slug.into(),
            layout,
            content_cache: None,
        }
    }

    /// True when rendered output is cached.
    pub fn is_cached(&self) -> bool {
        self.content_cache.is_some()
    }

    /// Drop rendered output. Returns whether anything was cached.
    pub fn clear_cache(&mut self) -> bool {
        self.content_cache.take().is_some()
    }
}
