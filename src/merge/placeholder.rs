//! The page-content placeholder.
//!
//! A parent layout pulls its child's content in with
//! `{{ cms:page:content }}`, optionally qualified as `:text` or `:rich_text`.
//! Whitespace inside the braces is ignored, and so is one stray `:` after
//! `content` (`{{ cms:page:content: }}`, `{{ cms:page:content::text }}`).

use regex::{NoExpand, Regex};
use std::sync::OnceLock;

const CONTENT_PLACEHOLDER_PATTERN: &str = r"\{\{\s*cms:page:content:?(?::text|:rich_text)?\s*\}\}";

fn content_placeholder() -> &'static Regex {
    static CONTENT_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    CONTENT_PLACEHOLDER.get_or_init(|| {
        Regex::new(CONTENT_PLACEHOLDER_PATTERN).expect("content placeholder pattern is valid")
    })
}

/// Whether `text` holds at least one content placeholder.
pub fn contains_content_placeholder(text: &str) -> bool {
    content_placeholder().is_match(text)
}

/// Number of content placeholders in `text`.
pub fn count_content_placeholders(text: &str) -> usize {
    content_placeholder().find_iter(text).count()
}

/// Replace every content placeholder in `parent` with `child`, verbatim.
///
/// Returns `None` when `parent` has no placeholder. Single pass: placeholders
/// inside `child` are left as they are.
pub fn substitute_content(parent: &str, child: &str) -> Option<String> {
    let regex = content_placeholder();
    if !regex.is_match(parent) {
        return None;
    }
    Some(regex.replace_all(parent, NoExpand(child)).into_owned())
}
