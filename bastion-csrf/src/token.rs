use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A token issued to one session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken {
    /// Session the token is bound to
    pub session_key: String,

    /// Random token value (base64url, no padding)
    pub value: String,

    /// Issue timestamp
    pub issued_at: DateTime<Utc>,

    /// `issued_at + ttl`
    pub expires_at: DateTime<Utc>,
}

impl CsrfToken {
    /// Generate a fresh token of `bytes` random bytes.
    ///
    /// Returns `None` when `issued_at + ttl` falls outside the representable
    /// date range.
    pub fn generate(
        session_key: impl Into<String>,
        ttl: Duration,
        issued_at: DateTime<Utc>,
        bytes: usize,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;

        let mut random = vec![0u8; bytes];
        rand::thread_rng().fill_bytes(&mut random);

        Some(Self {
            session_key: session_key.into(),
            value: URL_SAFE_NO_PAD.encode(&random),
            issued_at,
            expires_at,
        })
    }

    /// Expired strictly after `expires_at`; the boundary instant is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Compare against a caller-supplied value in constant time.
    pub fn matches(&self, provided: &str) -> bool {
        self.value.as_bytes().ct_eq(provided.as_bytes()).into()
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfToken")
            .field("session_key", &self.session_key)
            .field("value", &"***")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
