use crate::error::{Result, XssError};
use crate::patterns::{patterns, PatternKind};
use serde::Serialize;
use serde_json::Value;

/// Outcome of running the pattern table over one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// True iff any pattern matched
    pub had_match: bool,

    /// Names of every matching pattern, in table order
    pub matched_patterns: Vec<&'static str>,
}

impl Detection {
    pub fn contains(&self, kind: PatternKind) -> bool {
        self.matched_patterns.contains(&kind.name())
    }
}

/// XSS pattern validator
pub struct XssValidator;

impl XssValidator {
    /// Evaluate every pattern independently against the raw input.
    pub fn detect(text: &str) -> Detection {
        let matched_patterns: Vec<&'static str> = patterns()
            .iter()
            .filter(|p| p.is_match(text))
            .map(|p| p.name())
            .collect();

        if !matched_patterns.is_empty() {
            tracing::debug!(patterns = ?matched_patterns, "XSS patterns matched");
        }

        Detection {
            had_match: !matched_patterns.is_empty(),
            matched_patterns,
        }
    }

    /// Detect over a JSON value; anything but a string never matches.
    pub fn detect_value(value: &Value) -> Detection {
        match value {
            Value::String(s) => Self::detect(s),
            _ => Detection::default(),
        }
    }

    /// Check if text contains potential XSS attacks
    pub fn contains_xss(text: &str) -> bool {
        patterns().iter().any(|p| p.is_match(text))
    }

    /// Validate text and return error if XSS detected
    pub fn validate(text: &str) -> Result<()> {
        match Self::detect_attack_type(text) {
            Some(attack) => Err(XssError::MaliciousContent(attack.to_string())),
            None => Ok(()),
        }
    }

    /// Name of the first pattern, in table order, that matches.
    pub fn detect_attack_type(text: &str) -> Option<&'static str> {
        patterns().iter().find(|p| p.is_match(text)).map(|p| p.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_injection() {
        let detection = XssValidator::detect("<script>alert(1)</script>");
        assert!(detection.had_match);
        assert!(detection.contains(PatternKind::ScriptTag));
        assert!(XssValidator::validate("<script>alert(1)</script>").is_err());
    }

    #[test]
    fn test_img_onerror_matches_two_patterns() {
        let detection = XssValidator::detect("<img src=x onerror=alert(1)>");
        assert_eq!(
            detection.matched_patterns,
            vec!["Event Handler", "Image with Event"]
        );
    }

    #[test]
    fn test_patterns_reported_in_table_order() {
        let input = r#"<svg onload="x"><iframe src="javascript:alert(1)"></iframe>"#;
        let detection = XssValidator::detect(input);
        assert_eq!(
            detection.matched_patterns,
            vec!["Iframe", "Event Handler", "JavaScript URL", "SVG"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert!(XssValidator::contains_xss("JaVaScRiPt:alert(1)"));
        assert!(XssValidator::contains_xss("DATA:TEXT/HTML,hi"));
        assert!(XssValidator::contains_xss("<EmBeD src=x>"));
    }

    #[test]
    fn test_safe_content() {
        let safe = "<p>Hello <strong>world</strong>!</p>";
        let detection = XssValidator::detect(safe);
        assert!(!detection.had_match);
        assert!(detection.matched_patterns.is_empty());
        assert!(XssValidator::validate(safe).is_ok());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(XssValidator::detect(""), Detection::default());
    }

    #[test]
    fn test_non_string_value_never_matches() {
        assert!(!XssValidator::detect_value(&json!(42)).had_match);
        assert!(!XssValidator::detect_value(&json!(null)).had_match);
        assert!(!XssValidator::detect_value(&json!(["<script>"])).had_match);
        assert!(XssValidator::detect_value(&json!("<script>")).had_match);
    }

    #[test]
    fn test_detect_attack_type() {
        assert_eq!(
            XssValidator::detect_attack_type("<script>alert('XSS')</script>"),
            Some("Script Tag")
        );
        assert_eq!(
            XssValidator::detect_attack_type(r#"<img onerror="alert()">"#),
            Some("Event Handler")
        );
        assert_eq!(
            XssValidator::detect_attack_type(r#"<a href="vbscript:msgbox(1)">x</a>"#),
            Some("VBScript")
        );
        assert_eq!(XssValidator::detect_attack_type("plain text"), None);
    }

    #[test]
    fn test_detection_serializes_camel_case() {
        let value = serde_json::to_value(XssValidator::detect("<svg>")).unwrap();
        assert_eq!(value, json!({ "hadMatch": true, "matchedPatterns": ["SVG"] }));
    }
}
