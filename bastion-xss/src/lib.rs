//! # Bastion XSS Protection
//!
//! Cross-Site Scripting (XSS) detection and sanitization for Bastion.
//!
//! ## Features
//!
//! - ✅ **Pattern Detection** - Ten case-insensitive injection patterns from one shared table
//! - ✅ **Two-stage Sanitization** - Structural strip, then HTML entity encoding
//! - ✅ **Context Encoding** - HTML, attribute, JavaScript and URL encoders
//! - ✅ **Middleware Integration** - Request validation and body sanitization over `http` types
//! - ✅ **Protection Headers** - X-XSS-Protection, X-Content-Type-Options
//!
//! ## Quick Start
//!
//! ```rust
//! use bastion_xss::{analyze, detect, sanitize};
//!
//! let detection = detect("<img src=x onerror=alert(1)>");
//! assert!(detection.had_match);
//! assert_eq!(detection.matched_patterns, vec!["Event Handler", "Image with Event"]);
//!
//! let clean = sanitize("<b>hi</b><script>alert(1)</script>");
//! assert_eq!(clean, "&lt;b&gt;hi&lt;&#x2F;b&gt;");
//!
//! let report = analyze("<script>alert(1)</script>");
//! assert!(report.had_match);
//! assert!(!report.sanitized.contains('<'));
//! ```
//!
//! ## Sanitization Pipeline
//!
//! 1. Every match of the eight strippable patterns (script, iframe, object
//!    and embed elements, `on*=` handlers, `javascript:`, `vbscript:`,
//!    `data:text/html`) is removed.
//! 2. `& < > " ' /` are replaced with HTML entities.
//!
//! `<svg` and `<img ... on` are reported by detection but only encoded:
//!
//! ```rust
//! use bastion_xss::sanitize;
//!
//! assert_eq!(sanitize("<svg onload=x>"), "&lt;svg x&gt;");
//! ```
//!
//! The output is safe as HTML text content only. For attribute values or
//! inline scripts use [`XssEncoder`]:
//!
//! ```rust
//! use bastion_xss::XssEncoder;
//!
//! let attr = XssEncoder::encode_html_attribute("x onmouseover=alert(1)");
//! assert!(!attr.contains(' '));
//!
//! let js = XssEncoder::encode_javascript("'; alert('XSS'); //");
//! assert!(!js.contains("';"));
//! ```
//!
//! ## Usage with an HTTP layer
//!
//! ```rust
//! use bastion_xss::{XssConfig, XssMiddleware};
//!
//! let xss = XssMiddleware::new(
//!     XssConfig::default().with_exclude_paths(vec!["/api/xss/vulnerable".into()]),
//! );
//!
//! let request = http::Request::post("/api/xss/secure")
//!     .body(b"<script>alert(1)</script>".to_vec())
//!     .unwrap();
//! assert!(xss.validate_request(&request).is_err());
//!
//! let response = xss.add_protection_headers(http::Response::new(()));
//! assert_eq!(response.headers()["x-content-type-options"], "nosniff");
//! ```

pub mod encoder;
pub mod error;
pub mod middleware;
pub mod patterns;
pub mod sanitizer;
pub mod validator;

pub use encoder::XssEncoder;
pub use error::{Result, XssError};
pub use middleware::{XssConfig, XssMiddleware};
pub use patterns::{PatternKind, XssPattern, PATTERN_TABLE_VERSION};
pub use sanitizer::{SanitizationResult, XssSanitizer, MAX_STRIP_PASSES};
pub use validator::{Detection, XssValidator};

/// Run every pattern against `input`. See [`XssValidator::detect`].
pub fn detect(input: &str) -> Detection {
    XssValidator::detect(input)
}

/// Strip and encode `input`. See [`XssSanitizer::sanitize`].
pub fn sanitize(input: &str) -> String {
    XssSanitizer::sanitize(input)
}

/// Detect and sanitize in one call. See [`XssSanitizer::analyze`].
pub fn analyze(input: &str) -> SanitizationResult {
    XssSanitizer::analyze(input)
}
