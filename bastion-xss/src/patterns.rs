//! The shared XSS pattern table.
//!
//! Detection and sanitization both read from [`patterns()`], so the two can
//! never disagree about what a dangerous pattern is. Bump
//! [`PATTERN_TABLE_VERSION`] whenever an entry is added, removed or its
//! expression changes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;

/// Version of the pattern table below.
pub const PATTERN_TABLE_VERSION: u32 = 1;

/// Every pattern the table knows about, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatternKind {
    ScriptTag,
    Iframe,
    ObjectTag,
    EmbedTag,
    EventHandler,
    JavaScriptUrl,
    VbScript,
    DataUrl,
    Svg,
    ImageWithEvent,
}

impl PatternKind {
    /// All kinds in the fixed evaluation order.
    pub const ALL: [PatternKind; 10] = [
        PatternKind::ScriptTag,
        PatternKind::Iframe,
        PatternKind::ObjectTag,
        PatternKind::EmbedTag,
        PatternKind::EventHandler,
        PatternKind::JavaScriptUrl,
        PatternKind::VbScript,
        PatternKind::DataUrl,
        PatternKind::Svg,
        PatternKind::ImageWithEvent,
    ];

    /// Display name reported in `matchedPatterns`.
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::ScriptTag => "Script Tag",
            PatternKind::Iframe => "Iframe",
            PatternKind::ObjectTag => "Object Tag",
            PatternKind::EmbedTag => "Embed Tag",
            PatternKind::EventHandler => "Event Handler",
            PatternKind::JavaScriptUrl => "JavaScript URL",
            PatternKind::VbScript => "VBScript",
            PatternKind::DataUrl => "Data URL",
            PatternKind::Svg => "SVG",
            PatternKind::ImageWithEvent => "Image with Event",
        }
    }

    fn detect_source(&self) -> &'static str {
        match self {
            PatternKind::ScriptTag => r"(?i)<script",
            PatternKind::Iframe => r"(?i)<iframe",
            PatternKind::ObjectTag => r"(?i)<object",
            PatternKind::EmbedTag => r"(?i)<embed",
            PatternKind::EventHandler => r"(?i)on[a-z0-9_]+\s*=",
            PatternKind::JavaScriptUrl => r"(?i)javascript:",
            PatternKind::VbScript => r"(?i)vbscript:",
            PatternKind::DataUrl => r"(?i)data:text/html",
            PatternKind::Svg => r"(?i)<svg",
            PatternKind::ImageWithEvent => r"(?i)<img.*on",
        }
    }

    // svg and img-with-handler are only entity encoded, never stripped.
    fn strip_source(&self) -> Option<&'static str> {
        match self {
            PatternKind::ScriptTag => Some(r"(?is)<script\b.*?</script>"),
            PatternKind::Iframe => Some(r"(?is)<iframe\b.*?</iframe>"),
            PatternKind::ObjectTag => Some(r"(?is)<object\b.*?</object>"),
            PatternKind::EmbedTag => Some(r"(?is)<embed\b.*?</embed>"),
            PatternKind::EventHandler
            | PatternKind::JavaScriptUrl
            | PatternKind::VbScript
            | PatternKind::DataUrl => Some(self.detect_source()),
            PatternKind::Svg | PatternKind::ImageWithEvent => None,
        }
    }

    /// Whether sanitization removes matches of this pattern before encoding.
    pub fn is_stripped(&self) -> bool {
        self.strip_source().is_some()
    }
}

/// A compiled table entry.
#[derive(Debug)]
pub struct XssPattern {
    kind: PatternKind,
    detect: Regex,
    strip: Option<Regex>,
}

impl XssPattern {
    fn compile(kind: PatternKind) -> Self {
        let compile = |source: &str| {
            Regex::new(source).unwrap_or_else(|e| panic!("invalid {:?} pattern: {}", kind, e))
        };

        Self {
            kind,
            detect: compile(kind.detect_source()),
            strip: kind.strip_source().map(compile),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Test the raw input against this pattern.
    pub fn is_match(&self, input: &str) -> bool {
        self.detect.is_match(input)
    }

    /// Remove every match of the strip expression.
    ///
    /// Returns `Cow::Borrowed` when nothing was removed, including for
    /// entries that are never stripped.
    pub fn strip<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match &self.strip {
            Some(re) => re.replace_all(input, ""),
            None => Cow::Borrowed(input),
        }
    }
}

static PATTERNS: Lazy<Vec<XssPattern>> =
    Lazy::new(|| PatternKind::ALL.iter().copied().map(XssPattern::compile).collect());

/// The compiled table, in evaluation order.
pub fn patterns() -> &'static [XssPattern] {
    &PATTERNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_kinds() {
        let kinds: Vec<PatternKind> = patterns().iter().map(XssPattern::kind).collect();
        assert_eq!(kinds, PatternKind::ALL.to_vec());
    }

    #[test]
    fn test_strip_list_excludes_svg_and_img() {
        let stripped: Vec<&str> = PatternKind::ALL
            .iter()
            .filter(|k| k.is_stripped())
            .map(PatternKind::name)
            .collect();

        assert_eq!(stripped.len(), 8);
        assert!(!PatternKind::Svg.is_stripped());
        assert!(!PatternKind::ImageWithEvent.is_stripped());
    }

    #[test]
    fn test_script_strip_spans_lines_and_nested_tags() {
        let script = &patterns()[0];
        let input = "a<SCRIPT type=\"x\">\n<b>1</b>\n</script>b";
        assert_eq!(script.strip(input), "ab");
    }

    #[test]
    fn test_script_strip_is_non_greedy() {
        let script = &patterns()[0];
        let input = "<script>1</script>keep<script>2</script>";
        assert_eq!(script.strip(input), "keep");
    }

    #[test]
    fn test_unclosed_tag_is_detected_but_not_stripped() {
        let script = &patterns()[0];
        assert!(script.is_match("<script>alert(1)"));
        assert_eq!(script.strip("<script>alert(1)"), "<script>alert(1)");
    }

    #[test]
    fn test_event_handler_requires_name() {
        let handler = &patterns()[4];
        assert!(handler.is_match("onerror="));
        assert!(handler.is_match("ONLOAD ="));
        assert!(!handler.is_match("on="));
    }

    #[test]
    fn test_non_stripped_entry_borrows() {
        let svg = &patterns()[8];
        assert!(matches!(svg.strip("<svg onload=x>"), Cow::Borrowed(_)));
    }
}
