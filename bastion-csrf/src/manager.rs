use crate::clock::{Clock, SystemClock};
use crate::config::CsrfConfig;
use crate::error::{CsrfError, Result};
use crate::store::{MemoryTokenStore, TokenStore};
use crate::token::CsrfToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Why a validation passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationReason {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "no token found")]
    NoTokenFound,
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "mismatch")]
    Mismatch,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::Ok => "ok",
            ValidationReason::NoTokenFound => "no token found",
            ValidationReason::Expired => "expired",
            ValidationReason::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`CsrfManager::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub reason: ValidationReason,
}

impl Validation {
    fn pass() -> Self {
        Self {
            valid: true,
            reason: ValidationReason::Ok,
        }
    }

    fn fail(reason: ValidationReason) -> Self {
        Self {
            valid: false,
            reason,
        }
    }

    /// `Ok(())` when valid, otherwise [`CsrfError::Rejected`].
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(CsrfError::Rejected(self.reason))
        }
    }
}

/// Issues and checks per-session CSRF tokens.
///
/// Cloning is cheap; clones share the store and clock.
#[derive(Clone)]
pub struct CsrfManager {
    config: Arc<CsrfConfig>,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl CsrfManager {
    /// Manager over an in-memory store and the system clock.
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(MemoryTokenStore::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Issue a fresh token for `session_key`, replacing any previous one.
    pub fn issue(&self, session_key: &str) -> Result<String> {
        if session_key.is_empty() {
            return Err(CsrfError::EmptySessionKey);
        }

        self.config.validate_ttl()?;

        let now = self.clock.now();
        let token = CsrfToken::generate(
            session_key,
            self.config.token_ttl,
            now,
            self.config.token_bytes,
        )
        .ok_or_else(|| {
            CsrfError::InvalidConfig(format!(
                "token ttl of {}s overflows the expiry timestamp at {now}",
                self.config.token_ttl.num_seconds()
            ))
        })?;
        let value = token.value.clone();

        let replaced = self.store.set(token);
        debug!(
            session = session_key,
            rotated = replaced.is_some(),
            "Issued CSRF token"
        );

        Ok(value)
    }

    /// Rotate the token for `session_key`. Same as [`issue`](Self::issue).
    pub fn refresh(&self, session_key: &str) -> Result<String> {
        self.issue(session_key)
    }

    /// Check `provided` against the token stored for `session_key`.
    ///
    /// An expired record is deleted on the way out. A successful check
    /// leaves the token in place.
    pub fn validate(&self, session_key: &str, provided: &str) -> Validation {
        let Some(stored) = self.store.get(session_key) else {
            return Validation::fail(ValidationReason::NoTokenFound);
        };

        if stored.is_expired_at(self.clock.now()) {
            // Only the record we saw; a token re-issued meanwhile survives.
            self.store
                .delete_if(session_key, &|current| current.value == stored.value);
            debug!(session = session_key, "CSRF token expired");
            return Validation::fail(ValidationReason::Expired);
        }

        if !stored.matches(provided) {
            return Validation::fail(ValidationReason::Mismatch);
        }

        Validation::pass()
    }

    /// Drop the token for `session_key`. Returns whether one existed.
    pub fn invalidate(&self, session_key: &str) -> bool {
        self.store.delete(session_key).is_some()
    }

    /// Delete every expired record and return how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let purged = self.store.purge_expired(self.clock.now());
        if purged > 0 {
            debug!(purged, "Swept expired CSRF tokens");
        }
        purged
    }

    /// Number of live records, expired ones included until touched.
    pub fn token_count(&self) -> usize {
        self.store.len()
    }
}

impl Default for CsrfManager {
    fn default() -> Self {
        Self::new(CsrfConfig::default())
    }
}

impl fmt::Debug for CsrfManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfManager")
            .field("config", &self.config)
            .field("tokens", &self.store.len())
            .field("clock", &self.clock)
            .finish()
    }
}
