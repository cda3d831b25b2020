//! In-memory layout store.
//!
//! An arena of sites, layouts and pages indexed by id. Tree links are id
//! references; the store resolves them and enforces the save-time rules:
//! - label defaulting, identifier format and per-site uniqueness
//! - parent existence, same-site parent, no ancestor cycles
//! - trailing sibling position on create
//!
//! Every successful save or destroy runs the invalidation cascade so that
//! pages rendered through the changed layout are re-rendered on next request.

use crate::invalidate::{invalidate_cascade, InvalidationReport};
use crate::model::{
    InvalidIdentifier, LayoutDraft, LayoutError, LayoutId, LayoutIdentifier, LayoutNode, Page,
    PageId, Site, SiteId, ValidationError,
};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

pub mod ordering;

/// Result of a successful create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Saved layout.
    pub id: LayoutId,
    /// Pages cleared by the save.
    pub invalidation: InvalidationReport,
}

/// Result of destroying a layout.
///
/// Children are orphaned to roots; pages lose their layout reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyOutcome {
    /// The record as it was before removal.
    pub removed: LayoutNode,
    /// Pages cleared before removal.
    pub invalidation: InvalidationReport,
    /// Former children, now roots, in their new root order.
    pub orphaned: Vec<LayoutId>,
    /// Pages whose `layout` was nullified.
    pub detached_pages: Vec<PageId>,
}

/// How a save treats the draft's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionRule {
    /// Non-positive means "append"; a positive rank must be free.
    Create,
    /// Rank stays as edited; it must be non-negative and free.
    Keep,
    /// Parent changed; the caller appends after the new siblings.
    Reassign,
}

/// Arena of sites, layouts and pages.
#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    sites: BTreeMap<SiteId, Site>,
    layouts: BTreeMap<LayoutId, LayoutNode>,
    pages: BTreeMap<PageId, Page>,
    next_site: u64,
    next_layout: u64,
    next_page: u64,
}

impl LayoutStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Sites =====

    /// Register a site and return its id.
    pub fn add_site(&mut self, label: impl Into<String>) -> SiteId {
        self.next_site += 1;
        let id = SiteId::new(self.next_site);
        self.sites.insert(id, Site::new(id, label));
        id
    }

    /// Site by id.
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(&id)
    }

    // ===== Layout reads =====

    /// Layout by id.
    pub fn layout(&self, id: LayoutId) -> Option<&LayoutNode> {
        self.layouts.get(&id)
    }

    /// Layout by id, or [`LayoutError::LayoutNotFound`].
    pub fn require_layout(&self, id: LayoutId) -> Result<&LayoutNode, LayoutError> {
        self.layout(id).ok_or(LayoutError::LayoutNotFound(id))
    }

    /// Layout of `site` with this identifier.
    pub fn layout_by_identifier(&self, site: SiteId, identifier: &str) -> Option<&LayoutNode> {
        self.layouts
            .values()
            .find(|l| l.site == site && l.identifier.as_str() == identifier)
    }

    /// All layouts of a site in ascending position.
    pub fn layouts_for_site(&self, site: SiteId) -> Vec<&LayoutNode> {
        let mut nodes: Vec<&LayoutNode> = self.layouts.values().filter(|l| l.site == site).collect();
        ordering::sort_siblings(&mut nodes);
        nodes
    }

    /// Root layouts of a site in ascending position.
    pub fn roots(&self, site: SiteId) -> Vec<&LayoutNode> {
        self.siblings(site, None)
    }

    /// Direct children of a layout in ascending position.
    pub fn children(&self, id: LayoutId) -> Vec<&LayoutNode> {
        let mut nodes: Vec<&LayoutNode> = self
            .layouts
            .values()
            .filter(|l| l.parent == Some(id))
            .collect();
        ordering::sort_siblings(&mut nodes);
        nodes
    }

    /// Ids of [`Self::children`].
    pub fn child_ids(&self, id: LayoutId) -> Vec<LayoutId> {
        self.children(id).into_iter().map(|l| l.id).collect()
    }

    fn siblings(&self, site: SiteId, parent: Option<LayoutId>) -> Vec<&LayoutNode> {
        let mut nodes: Vec<&LayoutNode> = self
            .layouts
            .values()
            .filter(|l| l.site == site && l.parent == parent)
            .collect();
        ordering::sort_siblings(&mut nodes);
        nodes
    }

    /// Number of stored layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// True when no layout is stored.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    // ===== Layout writes =====

    /// Validate and insert a new layout, then invalidate dependents.
    pub fn create(&mut self, draft: LayoutDraft) -> Result<SaveOutcome, LayoutError> {
        let id = LayoutId::new(self.next_layout + 1);
        let mut node = self
            .validate(id, draft, PositionRule::Create)
            .inspect_err(|e| {
                debug!(error = %e, "Rejected new layout");
            })?;
        if node.position <= 0 {
            node.position = ordering::next_position(
                self.siblings(node.site, node.parent)
                    .into_iter()
                    .map(|l| l.position),
            );
        }
        self.next_layout += 1;
        info!(layout = %id, identifier = %node.identifier, position = node.position, "Created layout");
        self.layouts.insert(id, node);
        let invalidation = invalidate_cascade(self, id);
        Ok(SaveOutcome { id, invalidation })
    }

    /// Apply `edit` to a copy of the stored layout, validate, write back and
    /// invalidate dependents. Nothing is written if validation fails.
    ///
    /// Moving a layout under a different parent places it after its new siblings.
    /// Otherwise the draft's position is kept and must be free among siblings.
    /// The owning site can't change.
    pub fn update(
        &mut self,
        id: LayoutId,
        edit: impl FnOnce(&mut LayoutDraft),
    ) -> Result<SaveOutcome, LayoutError> {
        let current = self.require_layout(id)?;
        let (previous_site, previous_parent) = (current.site, current.parent);
        let mut draft = LayoutDraft::from(current);
        edit(&mut draft);

        if draft.site != Some(previous_site) {
            debug!(layout = %id, "Rejected site change");
            return Err(ValidationError::SiteChanged {
                layout: id,
                from: previous_site,
            }
            .into());
        }

        let moved = draft.parent != previous_parent;
        let rule = if moved {
            PositionRule::Reassign
        } else {
            PositionRule::Keep
        };
        let mut node = self.validate(id, draft, rule).inspect_err(|e| {
            debug!(layout = %id, error = %e, "Rejected layout update");
        })?;
        if moved {
            node.position = ordering::next_position(
                self.siblings(node.site, node.parent)
                    .into_iter()
                    .filter(|l| l.id != id)
                    .map(|l| l.position),
            );
        }
        info!(layout = %id, identifier = %node.identifier, "Updated layout");
        self.layouts.insert(id, node);
        let invalidation = invalidate_cascade(self, id);
        Ok(SaveOutcome { id, invalidation })
    }

    /// Remove a layout.
    ///
    /// Dependents are invalidated while the subtree is still attached. Afterwards
    /// assigned pages are detached and direct children become roots, appended
    /// after the existing roots in their previous order.
    pub fn destroy(&mut self, id: LayoutId) -> Result<DestroyOutcome, LayoutError> {
        let site = self.require_layout(id)?.site;
        let invalidation = invalidate_cascade(self, id);

        let mut detached_pages = Vec::new();
        for page in self.pages.values_mut().filter(|p| p.layout == Some(id)) {
            page.layout = None;
            detached_pages.push(page.id);
        }

        let children = self.child_ids(id);
        let removed = self
            .layouts
            .remove(&id)
            .ok_or(LayoutError::LayoutNotFound(id))?;

        let mut next_root = ordering::next_position(
            self.siblings(site, None).into_iter().map(|l| l.position),
        );
        for child in &children {
            if let Some(node) = self.layouts.get_mut(child) {
                node.parent = None;
                node.position = next_root;
                next_root += 1;
            }
        }

        info!(
            layout = %id,
            orphaned = children.len(),
            detached_pages = detached_pages.len(),
            "Destroyed layout"
        );
        Ok(DestroyOutcome {
            removed,
            invalidation,
            orphaned: children,
            detached_pages,
        })
    }

    /// Rewrite sibling positions under `parent` to follow `ordered`.
    ///
    /// Every id must be a current child of `parent` in `site`. Siblings not
    /// named keep their relative order after the named ones. Ordering does not
    /// affect merged output, so no invalidation runs.
    pub fn reorder(
        &mut self,
        site: SiteId,
        parent: Option<LayoutId>,
        ordered: &[LayoutId],
    ) -> Result<(), LayoutError> {
        let current: Vec<LayoutId> = self.siblings(site, parent).into_iter().map(|l| l.id).collect();
        if let Some(&stray) = ordered.iter().find(|id| !current.contains(id)) {
            return Err(ValidationError::NotASibling { layout: stray }.into());
        }
        let mut full: Vec<LayoutId> = Vec::with_capacity(current.len());
        for id in ordered.iter().chain(current.iter()) {
            if !full.contains(id) {
                full.push(*id);
            }
        }
        for (id, rank) in ordering::ranks_for(&full) {
            if let Some(node) = self.layouts.get_mut(&id) {
                node.position = rank;
            }
        }
        debug!(site = %site, count = full.len(), "Reordered layouts");
        Ok(())
    }

    /// Insert a persisted record verbatim, without validation or invalidation.
    ///
    /// Stored data is trusted the way a database row is: it may carry a broken
    /// parent chain, which merge operations detect when they walk it.
    pub fn restore(&mut self, node: LayoutNode) {
        self.next_layout = self.next_layout.max(node.id.get());
        self.next_site = self.next_site.max(node.site.get());
        self.sites
            .entry(node.site)
            .or_insert_with(|| Site::new(node.site, node.site.to_string()));
        self.layouts.insert(node.id, node);
    }

    fn validate(
        &self,
        id: LayoutId,
        mut draft: LayoutDraft,
        rule: PositionRule,
    ) -> Result<LayoutNode, ValidationError> {
        draft.assign_label();

        let site = draft
            .site
            .filter(|s| self.sites.contains_key(s))
            .ok_or(ValidationError::MissingSite)?;

        let identifier = LayoutIdentifier::new(draft.identifier.clone()).map_err(|e| match e {
            InvalidIdentifier::Blank => ValidationError::BlankIdentifier,
            InvalidIdentifier::Malformed(identifier) => {
                ValidationError::InvalidIdentifier { identifier }
            }
        })?;

        if draft.label.trim().is_empty() {
            return Err(ValidationError::BlankLabel);
        }

        if self
            .layouts
            .values()
            .any(|l| l.id != id && l.site == site && l.identifier == identifier)
        {
            return Err(ValidationError::DuplicateIdentifier { identifier, site });
        }

        if let Some(parent) = draft.parent {
            self.validate_parent(id, site, parent)?;
        }

        let position = match rule {
            PositionRule::Reassign => 0,
            PositionRule::Create if draft.position <= 0 => 0,
            PositionRule::Keep if draft.position < 0 => {
                return Err(ValidationError::NegativePosition {
                    position: draft.position,
                });
            }
            PositionRule::Create | PositionRule::Keep => {
                if self
                    .siblings(site, draft.parent)
                    .iter()
                    .any(|l| l.id != id && l.position == draft.position)
                {
                    return Err(ValidationError::DuplicatePosition {
                        position: draft.position,
                    });
                }
                draft.position
            }
        };

        Ok(LayoutNode {
            id,
            site,
            identifier,
            label: draft.label,
            content: draft.content,
            head: draft.head,
            css: draft.css,
            js: draft.js,
            parent: draft.parent,
            position,
            app_layout: draft.app_layout,
        })
    }

    fn validate_parent(
        &self,
        id: LayoutId,
        site: SiteId,
        parent: LayoutId,
    ) -> Result<(), ValidationError> {
        let parent_node = self
            .layout(parent)
            .ok_or(ValidationError::UnknownParent { parent })?;
        if parent_node.site != site {
            return Err(ValidationError::ParentInOtherSite { parent });
        }

        let mut seen = HashSet::new();
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == id || !seen.insert(current) {
                return Err(ValidationError::ParentCycle { layout: id, parent });
            }
            cursor = self.layout(current).and_then(|l| l.parent);
        }
        Ok(())
    }

    // ===== Pages =====

    /// Register a page, optionally assigned to a layout of the same site.
    pub fn add_page(
        &mut self,
        site: SiteId,
        slug: impl Into<String>,
        layout: Option<LayoutId>,
    ) -> Result<PageId, LayoutError> {
        if !self.sites.contains_key(&site) {
            return Err(LayoutError::SiteNotFound(site));
        }
        if let Some(layout) = layout {
            if self.require_layout(layout)?.site != site {
                warn!(layout = %layout, site = %site, "Page assigned to a layout of another site");
                return Err(ValidationError::LayoutInOtherSite { layout }.into());
            }
        }
        self.next_page += 1;
        let id = PageId::new(self.next_page);
        self.pages.insert(id, Page::new(id, site, slug, layout));
        Ok(id)
    }

    /// Page by id.
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    /// Mutable page by id.
    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(&id)
    }

    /// Page of `site` with this slug.
    pub fn page_by_slug(&self, site: SiteId, slug: &str) -> Option<&Page> {
        self.pages.values().find(|p| p.site == site && p.slug == slug)
    }

    /// Pages directly assigned to `layout`, by id.
    pub fn pages_for_layout(&self, layout: LayoutId) -> Vec<PageId> {
        self.pages
            .values()
            .filter(|p| p.layout == Some(layout))
            .map(|p| p.id)
            .collect()
    }

    /// The layout a page renders through, if it still has one.
    pub fn assigned_layout(&self, page: PageId) -> Result<Option<&LayoutNode>, LayoutError> {
        let page = self.page(page).ok_or(LayoutError::PageNotFound(page))?;
        match page.layout {
            Some(layout) => self.require_layout(layout).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
