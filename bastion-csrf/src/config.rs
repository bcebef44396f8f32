use crate::error::{CsrfError, Result};
use chrono::Duration;
use http::{HeaderName, Method};
use std::env;

/// Fewest random bytes a token may carry.
pub const MIN_TOKEN_BYTES: usize = 32;

/// Longest token lifetime accepted, in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

/// CSRF protection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfConfig {
    /// Token time-to-live
    pub token_ttl: Duration,

    /// Random bytes per token (at least [`MIN_TOKEN_BYTES`])
    pub token_bytes: usize,

    /// Header carrying the CSRF token
    pub header_name: String,

    /// Header carrying the session key
    pub session_header: String,

    /// JSON or form field carrying the CSRF token
    pub field_name: String,

    /// Safe HTTP methods (tokens are issued, never checked)
    pub safe_methods: Vec<Method>,

    /// Paths to exclude from CSRF protection
    pub exclude_paths: Vec<String>,
}

impl CsrfConfig {
    pub fn new() -> Self {
        Self {
            token_ttl: Duration::hours(1),
            token_bytes: MIN_TOKEN_BYTES,
            header_name: "X-CSRF-Token".to_string(),
            session_header: "X-Session-Id".to_string(),
            field_name: "csrfToken".to_string(),
            safe_methods: vec![Method::GET, Method::HEAD, Method::OPTIONS],
            exclude_paths: Vec::new(),
        }
    }

    /// Overlay `BASTION_CSRF_*` environment variables onto the defaults.
    ///
    /// - `BASTION_CSRF_TTL_SECS` - token lifetime in seconds
    /// - `BASTION_CSRF_HEADER` - token header name
    /// - `BASTION_CSRF_SESSION_HEADER` - session key header name
    /// - `BASTION_CSRF_FIELD` - token body field name
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();

        if let Some(raw) = lookup("BASTION_CSRF_TTL_SECS") {
            let secs: i64 = raw.trim().parse().map_err(|_| {
                CsrfError::InvalidConfig(format!("BASTION_CSRF_TTL_SECS is not an integer: {raw}"))
            })?;
            config.token_ttl = Duration::try_seconds(secs).ok_or_else(|| {
                CsrfError::InvalidConfig(format!("BASTION_CSRF_TTL_SECS is out of range: {raw}"))
            })?;
        }
        if let Some(name) = lookup("BASTION_CSRF_HEADER") {
            config.header_name = name;
        }
        if let Some(name) = lookup("BASTION_CSRF_SESSION_HEADER") {
            config.session_header = name;
        }
        if let Some(name) = lookup("BASTION_CSRF_FIELD") {
            config.field_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the manager and middleware rely on.
    pub fn validate(&self) -> Result<()> {
        self.validate_ttl()?;
        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(CsrfError::InvalidConfig(format!(
                "tokens need at least {MIN_TOKEN_BYTES} random bytes, got {}",
                self.token_bytes
            )));
        }
        for name in [&self.header_name, &self.session_header] {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                CsrfError::InvalidConfig(format!("invalid header name: {name:?}"))
            })?;
        }
        if self.field_name.is_empty() {
            return Err(CsrfError::InvalidConfig("field name is empty".to_string()));
        }
        Ok(())
    }

    /// TTL must be positive and at most [`MAX_TOKEN_TTL_DAYS`].
    pub fn validate_ttl(&self) -> Result<()> {
        if self.token_ttl <= Duration::zero() {
            return Err(CsrfError::InvalidConfig(format!(
                "token ttl must be positive, got {}s",
                self.token_ttl.num_seconds()
            )));
        }
        if self.token_ttl > Duration::days(MAX_TOKEN_TTL_DAYS) {
            return Err(CsrfError::InvalidConfig(format!(
                "token ttl exceeds {MAX_TOKEN_TTL_DAYS} days, got {}s",
                self.token_ttl.num_seconds()
            )));
        }
        Ok(())
    }

    /// Set token TTL
    pub fn with_token_ttl(mut self, ttl: Duration) -> Result<Self> {
        self.token_ttl = ttl;
        self.validate_ttl()?;
        Ok(self)
    }

    /// Set random bytes per token
    pub fn with_token_bytes(mut self, bytes: usize) -> Result<Self> {
        self.token_bytes = bytes;
        self.validate()?;
        Ok(self)
    }

    /// Set header name
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Set session header name
    pub fn with_session_header(mut self, name: impl Into<String>) -> Self {
        self.session_header = name.into();
        self
    }

    /// Set field name
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Replace safe methods
    pub fn with_safe_methods(mut self, methods: Vec<Method>) -> Self {
        self.safe_methods = methods;
        self
    }

    /// Add excluded paths
    pub fn with_exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.exclude_paths = paths;
        self
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = CsrfConfig::default();
        assert_eq!(config.token_ttl, Duration::hours(1));
        assert_eq!(config.token_bytes, 32);
        assert_eq!(config.header_name, "X-CSRF-Token");
        assert_eq!(config.session_header, "X-Session-Id");
        assert_eq!(config.field_name, "csrfToken");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CsrfConfig::default()
            .with_token_ttl(Duration::minutes(5))
            .unwrap()
            .with_header_name("X-XSRF-TOKEN")
            .with_field_name("_csrf")
            .with_token_bytes(48)
            .unwrap();

        assert_eq!(config.token_ttl, Duration::minutes(5));
        assert_eq!(config.header_name, "X-XSRF-TOKEN");
        assert_eq!(config.field_name, "_csrf");
        assert_eq!(config.token_bytes, 48);
    }

    #[test]
    fn test_short_tokens_rejected() {
        let err = CsrfConfig::default().with_token_bytes(16).unwrap_err();
        assert!(matches!(err, CsrfError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let config = CsrfConfig::default().with_header_name("bad header");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = CsrfConfig::from_lookup(lookup(&[
            ("BASTION_CSRF_TTL_SECS", "120"),
            ("BASTION_CSRF_FIELD", "_csrf"),
        ]))
        .unwrap();

        assert_eq!(config.token_ttl, Duration::seconds(120));
        assert_eq!(config.field_name, "_csrf");
        assert_eq!(config.header_name, "X-CSRF-Token");
    }

    #[test]
    fn test_from_lookup_bad_ttl() {
        let result = CsrfConfig::from_lookup(lookup(&[("BASTION_CSRF_TTL_SECS", "soon")]));
        assert!(matches!(result, Err(CsrfError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_lookup_ttl_out_of_range() {
        for raw in ["9223372036854775807", "1000000000000000", "-5", "0"] {
            let result = CsrfConfig::from_lookup(lookup(&[("BASTION_CSRF_TTL_SECS", raw)]));
            assert!(
                matches!(result, Err(CsrfError::InvalidConfig(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_lookup_ttl_upper_bound() {
        let year = Duration::days(MAX_TOKEN_TTL_DAYS).num_seconds().to_string();
        let config =
            CsrfConfig::from_lookup(lookup(&[("BASTION_CSRF_TTL_SECS", year.as_str())])).unwrap();
        assert_eq!(config.token_ttl, Duration::days(MAX_TOKEN_TTL_DAYS));

        let over = (Duration::days(MAX_TOKEN_TTL_DAYS).num_seconds() + 1).to_string();
        let result = CsrfConfig::from_lookup(lookup(&[("BASTION_CSRF_TTL_SECS", over.as_str())]));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_token_ttl_rejects_out_of_range() {
        assert!(CsrfConfig::default().with_token_ttl(Duration::seconds(-5)).is_err());
        assert!(CsrfConfig::default().with_token_ttl(Duration::zero()).is_err());
        assert!(CsrfConfig::default().with_token_ttl(Duration::days(366)).is_err());
        assert!(CsrfConfig::default().with_token_ttl(Duration::seconds(1)).is_ok());
    }
}
