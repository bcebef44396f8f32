use crate::error::{PaymentError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretBox};
use std::env;
use tracing::warn;

/// Vault key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Card vault configuration
#[derive(Debug)]
pub struct PaymentConfig {
    key: SecretBox<[u8; KEY_LEN]>,
}

impl PaymentConfig {
    pub fn with_key(key: [u8; KEY_LEN]) -> Self {
        Self {
            key: SecretBox::new(Box::new(key)),
        }
    }

    /// Fresh random key. Anything sealed under it is lost on restart.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self::with_key(key)
    }

    /// Decode a base64 key of exactly [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| PaymentError::InvalidKey(e.to_string()))?;
        let key: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            PaymentError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", bytes.len()))
        })?;
        Ok(Self::with_key(key))
    }

    /// Key from `BASTION_PAYMENT_KEY` (base64), or a generated one when unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match lookup("BASTION_PAYMENT_KEY") {
            Some(encoded) => Self::from_base64(&encoded),
            None => {
                warn!("BASTION_PAYMENT_KEY not set, using an ephemeral vault key");
                Ok(Self::generate())
            }
        }
    }

    pub(crate) fn key(&self) -> &[u8; KEY_LEN] {
        self.key.expose_secret()
    }
}
