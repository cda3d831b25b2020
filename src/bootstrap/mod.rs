//! Layouts for built-in application templates.
//!
//! Every application template found by a [`TemplateDiscovery`] gets a layout
//! of the same identifier, so pages can pick a layout before anyone has
//! authored one. Existing layouts are reused and only their blank fields are
//! filled in.

use crate::model::{capitalize, LayoutDraft, LayoutError, LayoutId, SiteId, ValidationError};
use crate::store::LayoutStore;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Content given to a bootstrapped layout that has none.
pub const DEFAULT_APP_LAYOUT_CONTENT: &str = "{{ cms:page:content:text }}";

/// Failure listing application templates.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A directory under the templates root could not be listed.
    #[error("Failed to read templates directory {path:?}: {source}")]
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Source of built-in template names.
pub trait TemplateDiscovery {
    /// Sorted, de-duplicated template names. Partials (leading `_`) are excluded.
    fn template_names(&self) -> Result<Vec<String>, DiscoveryError>;
}

/// Fixed list of names, normalized like a directory scan.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplates(pub Vec<String>);

impl TemplateDiscovery for StaticTemplates {
    fn template_names(&self) -> Result<Vec<String>, DiscoveryError> {
        let mut names: Vec<String> = self
            .0
            .iter()
            .filter(|name| !is_partial(name))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// Scans a templates directory for `*.html.*` files.
///
/// A template's name is its path relative to the root up to the first `.` of
/// the file name, with `/` separators: `admin/main.html.erb` -> `admin/main`.
/// A missing root yields no names.
#[derive(Debug, Clone)]
pub struct FsTemplateDiscovery {
    root: PathBuf,
}

impl FsTemplateDiscovery {
    /// Discovery rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan(&self, dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<(), DiscoveryError> {
        let read_dir = |path: &Path| {
            std::fs::read_dir(path).map_err(|source| DiscoveryError::ReadDir {
                path: path.to_path_buf(),
                source,
            })
        };

        for entry in read_dir(dir)? {
            let entry = entry.map_err(|source| DiscoveryError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if path.is_dir() {
                self.scan(&path, &format!("{prefix}{file_name}/"), names)?;
                continue;
            }
            if is_partial(file_name) || !file_name.contains(".html.") {
                continue;
            }
            let stem = file_name.split('.').next().unwrap_or_default();
            names.push(format!("{prefix}{stem}"));
        }
        Ok(())
    }
}

impl TemplateDiscovery for FsTemplateDiscovery {
    fn template_names(&self) -> Result<Vec<String>, DiscoveryError> {
        if !self.root.is_dir() {
            debug!(root = ?self.root, "Templates directory missing");
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        self.scan(&self.root, "", &mut names)?;
        names.sort();
        names.dedup();
        Ok(names)
    }
}

fn is_partial(name: &str) -> bool {
    name.rsplit('/').next().is_some_and(|last| last.starts_with('_'))
}

/// A template whose layout could not be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTemplate {
    /// Template name as discovered.
    pub name: String,
    /// Why the store refused it.
    pub error: ValidationError,
}

/// What a bootstrap run did, by layout id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Layouts created for templates that had none.
    pub created: Vec<LayoutId>,
    /// Existing layouts re-linked to their template.
    pub updated: Vec<LayoutId>,
    /// Templates whose layout failed validation.
    pub rejected: Vec<RejectedTemplate>,
}

/// Ensure one layout per discovered template in `site`.
///
/// New layouts get the template name as identifier and `app_layout`, a label
/// defaulted from the identifier and [`DEFAULT_APP_LAYOUT_CONTENT`]. Existing
/// layouts get `app_layout` set and blank label/content filled. Templates
/// whose name is not a valid identifier are reported in `rejected`.
pub fn create_layouts_from_app_layouts(
    store: &mut LayoutStore,
    site: SiteId,
    discovery: &dyn TemplateDiscovery,
) -> Result<BootstrapReport, BootstrapError> {
    if store.site(site).is_none() {
        return Err(LayoutError::SiteNotFound(site).into());
    }

    let mut report = BootstrapReport::default();
    for name in discovery.template_names()? {
        debug!(template = %name, "Checking application layout");
        let existing = store.layout_by_identifier(site, &name).map(|l| l.id);

        let result = match existing {
            Some(id) => store
                .update(id, |draft| fill_blank_fields(draft, &name))
                .map(|_| report.updated.push(id)),
            None => {
                let mut draft = LayoutDraft::new(site, name.as_str()).with_app_layout(name.as_str());
                draft.content = Some(DEFAULT_APP_LAYOUT_CONTENT.to_string());
                store.create(draft).map(|outcome| report.created.push(outcome.id))
            }
        };

        match result {
            Ok(()) => {}
            Err(LayoutError::Validation(error)) => {
                warn!(template = %name, error = %error, "Skipping application layout");
                report.rejected.push(RejectedTemplate { name, error });
            }
            Err(other) => return Err(other.into()),
        }
    }

    info!(
        site = %site,
        created = report.created.len(),
        updated = report.updated.len(),
        rejected = report.rejected.len(),
        "Bootstrapped application layouts"
    );
    Ok(report)
}

fn fill_blank_fields(draft: &mut LayoutDraft, name: &str) {
    draft.app_layout = Some(name.to_string());
    if draft.label.trim().is_empty() {
        draft.label = capitalize(name);
    }
    if draft.content.as_deref().is_none_or(|c| c.trim().is_empty()) {
        draft.content = Some(DEFAULT_APP_LAYOUT_CONTENT.to_string());
    }
}

/// Failure that aborts a bootstrap run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Templates could not be listed.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The store failed for a reason other than validation.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
