//! Site documents.
//!
//! A site document is a TOML file describing one site's layouts and pages,
//! with parents and page layouts referenced by identifier:
//!
//! ```toml
//! [site]
//! label = "Default"
//!
//! [[layouts]]
//! identifier = "default"
//! content = "<body>{{ cms:page:content }}</body>"
//!
//! [[layouts]]
//! identifier = "blog"
//! parent = "default"
//! content = "<article>{{ cms:page:content }}</article>"
//!
//! [[pages]]
//! slug = "index"
//! layout = "blog"
//! ```
//!
//! Layouts are saved in document order through the store, so every save-time
//! rule applies; a parent must appear before its children.

use crate::model::{LayoutDraft, LayoutError, SiteId};
use crate::store::LayoutStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Failure loading a site document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Site document does not exist.
    #[error("Site document not found: {path}")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// Site document exists but cannot be read.
    #[error("Failed to read site document {path}: {source}")]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Site document is not valid TOML or does not match the schema.
    #[error("Invalid site document {path}: {reason}")]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A layout names a parent not declared before it.
    #[error("Layout '{layout}' references undeclared parent '{parent}'")]
    UnknownParent {
        /// Identifier of the layout declaring the parent.
        layout: String,
        /// The parent identifier as written.
        parent: String,
    },

    /// A page names a layout that is not declared.
    #[error("Page '{page}' references undeclared layout '{layout}'")]
    UnknownLayout {
        /// Slug of the page.
        page: String,
        /// The layout identifier as written.
        layout: String,
    },

    /// The store rejected an entry.
    #[error("Layout '{identifier}' rejected: {source}")]
    Layout {
        /// Identifier of the rejected entry.
        identifier: String,
        /// Why the store refused it.
        #[source]
        source: LayoutError,
    },
}

/// Top-level TOML structure of a site document.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteDocument {
    /// The `[site]` table.
    pub site: SiteSection,
    /// `[[layouts]]`, parents before children.
    #[serde(default)]
    pub layouts: Vec<LayoutEntry>,
    /// `[[pages]]`.
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

/// The `[site]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Display name.
    pub label: String,
}

/// One `[[layouts]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayoutEntry {
    /// Layout identifier.
    pub identifier: String,
    /// Label; defaulted from the identifier when absent.
    #[serde(default)]
    pub label: Option<String>,
    /// Identifier of the parent layout.
    #[serde(default)]
    pub parent: Option<String>,
    /// Explicit sibling position.
    #[serde(default)]
    pub position: Option<i64>,
    /// Content body.
    #[serde(default)]
    pub content: Option<String>,
    /// Head body.
    #[serde(default)]
    pub head: Option<String>,
    /// Css body.
    #[serde(default)]
    pub css: Option<String>,
    /// Js body.
    #[serde(default)]
    pub js: Option<String>,
    /// Application template name.
    #[serde(default)]
    pub app_layout: Option<String>,
}

/// One `[[pages]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    /// Page slug.
    pub slug: String,
    /// Identifier of the assigned layout.
    #[serde(default)]
    pub layout: Option<String>,
    /// Previously rendered content, if any.
    #[serde(default)]
    pub content_cache: Option<String>,
}

/// A store populated from one site document.
#[derive(Debug, Clone)]
pub struct LoadedSite {
    /// Populated store.
    pub store: LayoutStore,
    /// The document's site.
    pub site: SiteId,
}

/// Read and load a site document from disk.
pub fn load_site_file(path: impl AsRef<Path>) -> Result<LoadedSite, SourceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SourceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_site_document(&contents, path)?;
    let loaded = build_store(&document)?;
    info!(
        path = ?path,
        layouts = document.layouts.len(),
        pages = document.pages.len(),
        "Loaded site document"
    );
    Ok(loaded)
}

/// Parse document text; `origin` is only used in error messages.
pub fn parse_site_document(contents: &str, origin: &Path) -> Result<SiteDocument, SourceError> {
    toml::from_str(contents).map_err(|e| SourceError::Parse {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Save every layout and page of `document` into a fresh store.
pub fn build_store(document: &SiteDocument) -> Result<LoadedSite, SourceError> {
    let mut store = LayoutStore::new();
    let site = store.add_site(document.site.label.as_str());

    for entry in &document.layouts {
        let mut draft = LayoutDraft::new(site, entry.identifier.as_str());
        if let Some(parent) = &entry.parent {
            let parent_id = store
                .layout_by_identifier(site, parent)
                .ok_or_else(|| SourceError::UnknownParent {
                    layout: entry.identifier.clone(),
                    parent: parent.clone(),
                })?
                .id;
            draft.parent = Some(parent_id);
        }
        draft.label = entry.label.clone().unwrap_or_default();
        draft.position = entry.position.unwrap_or_default();
        draft.content = entry.content.clone();
        draft.head = entry.head.clone();
        draft.css = entry.css.clone();
        draft.js = entry.js.clone();
        draft.app_layout = entry.app_layout.clone();

        store.create(draft).map_err(|source| SourceError::Layout {
            identifier: entry.identifier.clone(),
            source,
        })?;
    }

    for entry in &document.pages {
        let layout = match &entry.layout {
            Some(identifier) => Some(
                store
                    .layout_by_identifier(site, identifier)
                    .ok_or_else(|| SourceError::UnknownLayout {
                        page: entry.slug.clone(),
                        layout: identifier.clone(),
                    })?
                    .id,
            ),
            None => None,
        };
        let page = store
            .add_page(site, entry.slug.as_str(), layout)
            .map_err(|source| SourceError::Layout {
                identifier: entry.layout.clone().unwrap_or_default(),
                source,
            })?;
        if let Some(page) = store.page_mut(page) {
            page.content_cache = entry.content_cache.clone();
        }
    }

    Ok(LoadedSite { store, site })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DOCUMENT: &str = r#"
[site]
label = "Default"

[[layouts]]
identifier = "default"
content = "<body>{{ cms:page:content }}</body>"
head = "<title>Site</title>"

[[layouts]]
identifier = "blog"
parent = "default"
label = "Blog Posts"
content = "<article>{{ cms:page:content }}</article>"

[[pages]]
slug = "index"
layout = "blog"
content_cache = "<p>old</p>"

[[pages]]
slug = "orphan"
"#;

    #[test]
    fn build_store_resolves_parents_and_pages() {
        let document = parse_site_document(DOCUMENT, Path::new("inline.toml")).unwrap();
        let LoadedSite { store, site } = build_store(&document).unwrap();

        let default = store.layout_by_identifier(site, "default").unwrap();
        let blog = store.layout_by_identifier(site, "blog").unwrap();
        assert_eq!(blog.parent, Some(default.id));
        assert_eq!(blog.label, "Blog Posts");
        assert_eq!(default.label, "Default");

        let index = store.page_by_slug(site, "index").unwrap();
        assert_eq!(index.layout, Some(blog.id));
        assert_eq!(index.content_cache.as_deref(), Some("<p>old</p>"));
        assert_eq!(store.page_by_slug(site, "orphan").unwrap().layout, None);
    }

    #[test]
    fn parent_must_be_declared_first() {
        let text = r#"
[site]
label = "Default"

[[layouts]]
identifier = "child"
parent = "later"

[[layouts]]
identifier = "later"
"#;
        let document = parse_site_document(text, Path::new("inline.toml")).unwrap();
        assert!(matches!(
            build_store(&document),
            Err(SourceError::UnknownParent { ref parent, .. }) if parent == "later"
        ));
    }

    #[test]
    fn page_with_unknown_layout_is_rejected() {
        let text = r#"
[site]
label = "Default"

[[pages]]
slug = "index"
layout = "missing"
"#;
        let document = parse_site_document(text, Path::new("inline.toml")).unwrap();
        assert!(matches!(
            build_store(&document),
            Err(SourceError::UnknownLayout { .. })
        ));
    }

    #[test]
    fn invalid_layout_surfaces_validation_error() {
        let text = r#"
[site]
label = "Default"

[[layouts]]
identifier = "Has Spaces"
"#;
        let document = parse_site_document(text, Path::new("inline.toml")).unwrap();
        assert!(matches!(
            build_store(&document),
            Err(SourceError::Layout {
                source: LayoutError::Validation(_),
                ..
            })
        ));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let text = "[site]\nlabel = \"x\"\nsurprise = true\n";
        assert!(matches!(
            parse_site_document(text, Path::new("bad.toml")),
            Err(SourceError::Parse { .. })
        ));
    }

    #[test]
    fn load_site_file_reports_missing_file() {
        assert!(matches!(
            load_site_file("/nonexistent/cmslayout/site.toml"),
            Err(SourceError::FileNotFound { .. })
        ));
    }

    #[test]
    fn load_site_file_reads_from_disk() {
        let path = std::env::temp_dir().join("cmslayout_test_site_document.toml");
        fs::write(&path, DOCUMENT).unwrap();
        let loaded = load_site_file(&path);
        let _ = fs::remove_file(&path);

        let loaded = loaded.unwrap();
        assert_eq!(loaded.store.len(), 2);
    }
}
