//! Core identifier newtypes with smart constructors.
//!
//! Record ids are opaque integers handed out by the store. The layout
//! `identifier` token is a validated string; its raw constructor is never
//! exported - use [`LayoutIdentifier::new`].

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Identifier pattern: word-character start, lowercase/digit/underscore/hyphen body.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z0-9_][a-z0-9_-]*$";

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER_REGEX
        .get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("identifier pattern is valid"))
}

/// Owning site of a layout or page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SiteId(u64);

impl SiteId {
    /// Wrap a raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site#{}", self.0)
    }
}

/// Opaque id of a stored layout record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayoutId(u64);

impl LayoutId {
    /// Wrap a raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout#{}", self.0)
    }
}

/// Opaque id of a stored page record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PageId(u64);

impl PageId {
    /// Wrap a raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Short token naming a layout, unique within its owning site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayoutIdentifier(String);

impl LayoutIdentifier {
    /// Smart constructor: rejects blank and malformed tokens.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidIdentifier> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidIdentifier::Blank);
        }
        if !identifier_regex().is_match(&raw) {
            return Err(InvalidIdentifier::Malformed(raw));
        }
        Ok(Self(raw))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LayoutIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ===== Error Types =====

/// Why a raw string is not a [`LayoutIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidIdentifier {
    /// Empty or whitespace only.
    #[error("identifier cannot be blank")]
    Blank,
    /// Non-blank but outside the identifier pattern.
    #[error("identifier '{0}' must start with a letter, digit or underscore and contain only lowercase letters, digits, '_' or '-'")]
    Malformed(String),
}

// ===== Tests =====
