//! Contract with the tag-processing collaborator.
//!
//! The engine never interprets markers itself. It hands each text body to a
//! [`MarkerProcessor`] after running it through the processor's sanitizer.

use crate::merge::context::RenderContext;
use crate::model::MarkerError;
use regex::Regex;
use std::sync::OnceLock;

/// Interprets placeholder markers in a text body.
pub trait MarkerProcessor {
    /// Substitute markers in `text` against `context`, recording into its tags.
    fn process(&self, context: &mut RenderContext, text: &str) -> Result<String, MarkerError>;

    /// Neutralize embedded scripting before [`process`](Self::process) sees the text.
    fn sanitize(&self, text: &str) -> String {
        sanitize_embedded_code(text)
    }
}

impl<F> MarkerProcessor for F
where
    F: Fn(&mut RenderContext, &str) -> Result<String, MarkerError>,
{
    fn process(&self, context: &mut RenderContext, text: &str) -> Result<String, MarkerError> {
        self(context, text)
    }
}

/// Escape ERB-style `<% ... %>` delimiters so they render as text.
pub fn sanitize_embedded_code(text: &str) -> String {
    text.replace("<%", "&lt;%").replace("%>", "%&gt;")
}

const MARKER_PATTERN: &str = r"\{\{\s*(cms:[^{}]*?)\s*\}\}";

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Minimal processor: records each `{{ cms:... }}` marker name as a tag and
/// leaves the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerRecorder;

impl MarkerProcessor for MarkerRecorder {
    fn process(&self, context: &mut RenderContext, text: &str) -> Result<String, MarkerError> {
        for captures in marker_regex().captures_iter(text) {
            if let Some(name) = captures.get(1) {
                context.record_tag(name.as_str());
            }
        }
        Ok(text.to_string())
    }
}
