//! Layout records and the drafts they are saved from.

use crate::model::identifiers::{LayoutId, LayoutIdentifier, SiteId};
use serde::Serialize;

/// A stored layout: one node in a site's layout tree.
///
/// Text bodies are optional; every reader goes through the `*_text` accessors,
/// which treat a missing body as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutNode {
    /// Store-assigned id.
    pub id: LayoutId,
    /// Owning site; never changes after creation.
    pub site: SiteId,
    /// Unique within the site.
    pub identifier: LayoutIdentifier,
    /// Display name.
    pub label: String,
    /// Body merged through the content placeholder.
    pub content: Option<String>,
    /// Markup concatenated root first.
    pub head: Option<String>,
    /// Per-layout stylesheet.
    pub css: Option<String>,
    /// Per-layout script, stored as is.
    pub js: Option<String>,
    /// `None` for a root layout.
    pub parent: Option<LayoutId>,
    /// Sibling rank under `parent`, ascending.
    pub position: i64,
    /// Built-in application template this layout wraps, if any.
    pub app_layout: Option<String>,
}

impl LayoutNode {
    /// Content, or `""` when unset.
    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Head, or `""` when unset.
    pub fn head_text(&self) -> &str {
        self.head.as_deref().unwrap_or_default()
    }

    /// Css, or `""` when unset.
    pub fn css_text(&self) -> &str {
        self.css.as_deref().unwrap_or_default()
    }

    /// Js, or `""` when unset.
    pub fn js_text(&self) -> &str {
        self.js.as_deref().unwrap_or_default()
    }

    /// True for a layout without parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Unvalidated layout fields, as an editor submits them.
///
/// The store turns a draft into a [`LayoutNode`] on save after defaulting the label
/// and position and running validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutDraft {
    /// Owning site. `None` fails validation.
    pub site: Option<SiteId>,
    /// Raw identifier, checked on save.
    pub identifier: String,
    /// Blank means "derive from the identifier".
    pub label: String,
    /// See [`LayoutNode::content`].
    pub content: Option<String>,
    /// See [`LayoutNode::head`].
    pub head: Option<String>,
    /// See [`LayoutNode::css`].
    pub css: Option<String>,
    /// See [`LayoutNode::js`].
    pub js: Option<String>,
    /// Parent layout in the same site.
    pub parent: Option<LayoutId>,
    /// Non-positive means "assign the trailing sibling position on create".
    pub position: i64,
    /// See [`LayoutNode::app_layout`].
    pub app_layout: Option<String>,
}

impl LayoutDraft {
    /// Draft for `identifier` in `site`, everything else blank.
    pub fn new(site: SiteId, identifier: impl Into<String>) -> Self {
        Self {
            site: Some(site),
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the parent.
    pub fn with_parent(mut self, parent: LayoutId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set an explicit sibling position.
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    /// Set the content body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the head body.
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    /// Set the css body.
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    /// Set the js body.
    pub fn with_js(mut self, js: impl Into<String>) -> Self {
        self.js = Some(js.into());
        self
    }

    /// Link to an application template.
    pub fn with_app_layout(mut self, app_layout: impl Into<String>) -> Self {
        self.app_layout = Some(app_layout.into());
        self
    }

    /// Fill a blank label with the titleized identifier.
    pub fn assign_label(&mut self) {
        if self.label.trim().is_empty() {
            self.label = titleize(&self.identifier);
        }
    }
}

impl From<&LayoutNode> for LayoutDraft {
    fn from(node: &LayoutNode) -> Self {
        Self {
            site: Some(node.site),
            identifier: node.identifier.as_str().to_string(),
            label: node.label.clone(),
            content: node.content.clone(),
            head: node.head.clone(),
            css: node.css.clone(),
            js: node.js.clone(),
            parent: node.parent,
            position: node.position,
            app_layout: node.app_layout.clone(),
        }
    }
}

/// Human-readable label for an identifier: `"two_column-wide"` -> `"Two Column Wide"`.
///
/// CamelCase boundaries split into words, `-` and `_` become spaces, a trailing
/// `_id` is dropped and each word is capitalized.
pub fn titleize(identifier: &str) -> String {
    let mut snake = String::with_capacity(identifier.len() + 4);
    let mut prev: Option<char> = None;
    for c in identifier.trim().chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            snake.push('_');
        }
        let c = if c == '-' || c.is_whitespace() { '_' } else { c };
        snake.extend(c.to_lowercase());
        prev = Some(c);
    }
    let snake = snake.strip_suffix("_id").unwrap_or(&snake);

    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titleize_single_word() {
        assert_eq!(titleize("default"), "Default");
    }

    #[test]
    fn titleize_splits_underscores_and_hyphens() {
        assert_eq!(titleize("two_column-wide"), "Two Column Wide");
    }

    #[test]
    fn titleize_splits_camel_case() {
        assert_eq!(titleize("MainLayout"), "Main Layout");
    }

    #[test]
    fn titleize_drops_trailing_id_and_leading_underscores() {
        assert_eq!(titleize("author_id"), "Author");
        assert_eq!(titleize("_private"), "Private");
    }

    #[test]
    fn titleize_blank_is_blank() {
        assert_eq!(titleize(""), "");
        assert_eq!(titleize("__"), "");
    }

    #[test]
    fn capitalize_only_touches_first_char() {
        assert_eq!(capitalize("application"), "Application");
        assert_eq!(capitalize("admin/main"), "Admin/main");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn assign_label_keeps_explicit_label() {
        let mut draft = LayoutDraft::new(SiteId::new(1), "default").with_label("Site Chrome");
        draft.assign_label();
        assert_eq!(draft.label, "Site Chrome");
    }

    #[test]
    fn assign_label_defaults_blank_label() {
        let mut draft = LayoutDraft::new(SiteId::new(1), "blog_post").with_label("  ");
        draft.assign_label();
        assert_eq!(draft.label, "Blog Post");
    }

    #[test]
    fn missing_bodies_read_as_empty() {
        let node = LayoutNode {
            id: LayoutId::new(1),
            site: SiteId::new(1),
            identifier: LayoutIdentifier::new("default").expect("valid identifier"),
            label: "Default".to_string(),
            content: None,
            head: None,
            css: None,
            js: None,
            parent: None,
            position: 0,
            app_layout: None,
        };
        assert_eq!(node.content_text(), "");
        assert_eq!(node.head_text(), "");
        assert_eq!(node.css_text(), "");
        assert_eq!(node.js_text(), "");
        assert!(node.is_root());
    }

    #[test]
    fn draft_from_node_round_trips_fields() {
        let node = LayoutNode {
            id: LayoutId::new(3),
            site: SiteId::new(2),
            identifier: LayoutIdentifier::new("nested").expect("valid identifier"),
            label: "Nested".to_string(),
            content: Some("body".to_string()),
            head: None,
            css: Some("a {}".to_string()),
            js: None,
            parent: Some(LayoutId::new(1)),
            position: 4,
            app_layout: Some("application".to_string()),
        };
        let draft = LayoutDraft::from(&node);
        assert_eq!(draft.site, Some(SiteId::new(2)));
        assert_eq!(draft.identifier, "nested");
        assert_eq!(draft.parent, Some(LayoutId::new(1)));
        assert_eq!(draft.position, 4);
        assert_eq!(draft.css.as_deref(), Some("a {}"));
    }
}
