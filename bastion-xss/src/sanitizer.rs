use crate::encoder::XssEncoder;
use crate::patterns::patterns;
use crate::validator::XssValidator;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Full regex passes [`XssSanitizer::strip`] runs before falling back to a
/// single scan for the URL schemes.
pub const MAX_STRIP_PASSES: usize = 8;

/// URL schemes that must never survive stripping, however deeply nested.
const SCHEME_ROOTS: [&str; 3] = ["javascript:", "vbscript:", "data:text/html"];

/// Everything the secure demo endpoints report about one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizationResult {
    /// The input, unmodified
    pub original: String,

    /// Stripped and entity-encoded output
    pub sanitized: String,

    /// True iff any pattern matched the original input
    pub had_match: bool,

    /// Matching pattern names, in table order
    pub matched_patterns: Vec<&'static str>,
}

/// Two-stage sanitizer: structural strip, then HTML entity encoding.
///
/// The output is safe as HTML text content. It is not safe inside an
/// unquoted attribute or a script block; use the matching
/// [`XssEncoder`] function for those contexts.
///
/// `<svg` and `<img ... on` are detected but deliberately not stripped;
/// they only come out entity encoded.
pub struct XssSanitizer;

impl XssSanitizer {
    /// Sanitize untrusted text.
    pub fn sanitize(input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }
        XssEncoder::encode_html(&Self::strip(input))
    }

    /// Sanitize a JSON value; anything but a string yields an empty string.
    pub fn sanitize_value(value: &Value) -> String {
        match value {
            Value::String(s) => Self::sanitize(s),
            _ => String::new(),
        }
    }

    /// Stage one only: remove every strippable pattern.
    ///
    /// Passes repeat until nothing more is removed, so a removal can never
    /// splice together a fresh `javascript:` out of the surrounding text.
    /// Input still changing after [`MAX_STRIP_PASSES`] passes gets one
    /// splice-safe scan for the URL schemes instead, keeping the whole call
    /// linear in the input length.
    pub fn strip(input: &str) -> String {
        let mut current = input.to_owned();

        for _ in 0..MAX_STRIP_PASSES {
            let mut changed = false;

            for pattern in patterns() {
                let replaced = match pattern.strip(&current) {
                    Cow::Owned(s) => Some(s),
                    Cow::Borrowed(_) => None,
                };
                if let Some(s) = replaced {
                    current = s;
                    changed = true;
                }
            }

            if !changed {
                return current;
            }
        }

        strip_scheme_roots(&current)
    }

    /// Detect and sanitize in one call.
    pub fn analyze(input: &str) -> SanitizationResult {
        let detection = XssValidator::detect(input);

        SanitizationResult {
            original: input.to_owned(),
            sanitized: Self::sanitize(input),
            had_match: detection.had_match,
            matched_patterns: detection.matched_patterns,
        }
    }
}

/// Remove every [`SCHEME_ROOTS`] entry, ASCII case-insensitively, in one
/// left-to-right pass.
///
/// Each character is appended to the output and a root ending at the new
/// tail is cut off at once, so the output never contains a root, including
/// one formed by joining the text on either side of an earlier cut.
fn strip_scheme_roots(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
        out.push(c);

        for root in SCHEME_ROOTS {
            let Some(start) = out.len().checked_sub(root.len()) else {
                continue;
            };
            // Roots are ASCII, so a match starts on a char boundary.
            if out.as_bytes()[start..].eq_ignore_ascii_case(root.as_bytes()) {
                out.truncate(start);
                break;
            }
        }
    }

    out
}
