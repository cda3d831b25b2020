//! Sites own layouts and pages and scope identifier uniqueness.

use crate::model::identifiers::SiteId;
use serde::Serialize;

/// A site: the owner of layouts and pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    /// Store-assigned id.
    pub id: SiteId,
    /// Display name.
    pub label: String,
}

impl Site {
    /// Site record.
    pub fn new(id: SiteId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}
