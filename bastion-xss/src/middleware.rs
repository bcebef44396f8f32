use crate::error::{Result, XssError};
use crate::sanitizer::{SanitizationResult, XssSanitizer};
use crate::validator::XssValidator;
use http::header::{HeaderValue, X_CONTENT_TYPE_OPTIONS, X_XSS_PROTECTION};
use http::{Request, Response};
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;

/// XSS protection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XssConfig {
    /// Rewrite request bodies through the sanitizer
    pub auto_sanitize: bool,

    /// Reject requests whose body matches any pattern
    pub enable_validation: bool,

    /// Paths to exclude from XSS protection
    pub exclude_paths: Vec<String>,
}

impl XssConfig {
    pub fn new() -> Self {
        Self {
            auto_sanitize: false,
            enable_validation: true,
            exclude_paths: Vec::new(),
        }
    }

    /// Overlay `BASTION_XSS_AUTO_SANITIZE` and `BASTION_XSS_VALIDATE` onto
    /// the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        let defaults = Self::new();

        Self {
            auto_sanitize: flag("BASTION_XSS_AUTO_SANITIZE").unwrap_or(defaults.auto_sanitize),
            enable_validation: flag("BASTION_XSS_VALIDATE").unwrap_or(defaults.enable_validation),
            exclude_paths: defaults.exclude_paths,
        }
    }

    pub fn with_auto_sanitize(mut self, enable: bool) -> Self {
        self.auto_sanitize = enable;
        self
    }

    pub fn with_validation(mut self, enable: bool) -> Self {
        self.enable_validation = enable;
        self
    }

    pub fn with_exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.exclude_paths = paths;
        self
    }
}

impl Default for XssConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// XSS protection for `http` request/response pairs.
#[derive(Debug, Clone)]
pub struct XssMiddleware {
    config: Arc<XssConfig>,
}

impl XssMiddleware {
    pub fn new(config: XssConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &XssConfig {
        &self.config
    }

    /// Check if a path is covered by XSS protection
    pub fn needs_protection(&self, path: &str) -> bool {
        !self
            .config
            .exclude_paths
            .iter()
            .any(|excluded| path.starts_with(excluded.as_str()))
    }

    /// Reject a request whose body carries any known pattern.
    ///
    /// JSON bodies are checked after decoding, one string at a time, so
    /// escapes like `\u003c` cannot hide a payload. Anything else is checked
    /// as text.
    pub fn validate_request<B: AsRef<[u8]>>(&self, request: &Request<B>) -> Result<()> {
        let path = request.uri().path();
        if !self.config.enable_validation || !self.needs_protection(path) {
            return Ok(());
        }

        let body = request.body().as_ref();
        let detected = match serde_json::from_slice::<Value>(body) {
            Ok(json) => Self::json_attack_type(&json),
            Err(_) => XssValidator::detect_attack_type(&String::from_utf8_lossy(body)),
        };

        if let Some(attack_type) = detected {
            bastion_log::security_event(
                "xss_rejected",
                &json!({ "path": path, "pattern": attack_type }),
            );
            return Err(XssError::MaliciousContent(attack_type.to_string()));
        }

        Ok(())
    }

    /// Rewrite the request body through the sanitizer.
    ///
    /// JSON bodies keep their shape: every string value is sanitized,
    /// other values and object keys are left alone. Anything else is
    /// sanitized as text.
    pub fn sanitize_request(&self, request: &mut Request<Vec<u8>>) -> Result<()> {
        if !self.config.auto_sanitize || !self.needs_protection(request.uri().path()) {
            return Ok(());
        }

        let sanitized = match serde_json::from_slice::<Value>(request.body()) {
            Ok(mut json) => {
                Self::sanitize_json_value(&mut json);
                serde_json::to_vec(&json)?
            }
            Err(_) => {
                let text = String::from_utf8_lossy(request.body());
                XssSanitizer::sanitize(&text).into_bytes()
            }
        };

        *request.body_mut() = sanitized;
        Ok(())
    }

    fn json_attack_type(value: &Value) -> Option<&'static str> {
        match value {
            Value::String(s) => XssValidator::detect_attack_type(s),
            Value::Array(items) => items.iter().find_map(Self::json_attack_type),
            Value::Object(map) => map.iter().find_map(|(key, value)| {
                XssValidator::detect_attack_type(key).or_else(|| Self::json_attack_type(value))
            }),
            _ => None,
        }
    }

    fn sanitize_json_value(value: &mut Value) {
        match value {
            Value::String(s) => *s = XssSanitizer::sanitize(s),
            Value::Array(items) => items.iter_mut().for_each(Self::sanitize_json_value),
            Value::Object(map) => map.values_mut().for_each(Self::sanitize_json_value),
            _ => {}
        }
    }

    /// Full detection and sanitization report for one field.
    pub fn report(&self, input: &str) -> SanitizationResult {
        XssSanitizer::analyze(input)
    }

    /// Add XSS protection headers to response
    pub fn add_protection_headers<B>(&self, mut response: Response<B>) -> Response<B> {
        let headers = response.headers_mut();
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        response
    }
}

impl Default for XssMiddleware {
    fn default() -> Self {
        Self::new(XssConfig::default())
    }
}
