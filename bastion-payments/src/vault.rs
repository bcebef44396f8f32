//! Card tokenization.
//!
//! The card number is sealed with AES-256-GCM under the vault key and
//! handed back inside a [`CardToken`]. The envelope is base64 of
//! `nonce (12 bytes) || ciphertext + tag`.

use crate::config::PaymentConfig;
use crate::error::{PaymentError, Result};
use crate::validation::is_valid_card_number;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::debug;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Reference to a sealed card.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardToken {
    /// 16 random bytes, hex
    pub token: String,

    /// Last four digits, for display
    pub last4: String,

    /// Sealed card data
    pub encrypted_data: String,
}

impl fmt::Debug for CardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardToken")
            .field("token", &self.token)
            .field("last4", &self.last4)
            .field("encrypted_data", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SealedCard {
    card_number: String,
    token: String,
    timestamp: i64,
}

/// Seals card numbers and opens them again by token.
#[derive(Clone)]
pub struct CardVault {
    cipher: Aes256Gcm,
}

impl CardVault {
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(config.key())
            .map_err(|e| PaymentError::InvalidKey(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Vault over `BASTION_PAYMENT_KEY`, see [`PaymentConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(&PaymentConfig::from_env()?)
    }

    /// Validate and seal `card_number`.
    pub fn tokenize(&self, card_number: &str) -> Result<CardToken> {
        if !is_valid_card_number(card_number) {
            return Err(PaymentError::InvalidCardNumber);
        }

        let digits: String = card_number.chars().filter(char::is_ascii_digit).collect();
        let last4 = digits[digits.len() - 4..].to_string();

        let mut raw = [0u8; 16];
        OsRng.fill_bytes(&mut raw);
        let token = hex::encode(raw);

        let payload = serde_json::to_vec(&SealedCard {
            card_number: digits,
            token: token.clone(),
            timestamp: Utc::now().timestamp_millis(),
        })?;

        let encrypted_data = self.seal(&payload)?;
        debug!(last4 = %last4, "Tokenized card");

        Ok(CardToken {
            token,
            last4,
            encrypted_data,
        })
    }

    /// Open a token's envelope and return the card number.
    pub fn reveal(&self, card: &CardToken) -> Result<SecretString> {
        let payload = self.open(&card.encrypted_data).inspect_err(|e| {
            bastion_log::security_event(
                "card_unseal_failed",
                &json!({ "token": card.token, "error": e.to_string() }),
            );
        })?;
        let sealed: SealedCard = serde_json::from_slice(&payload)?;

        if sealed.token != card.token {
            bastion_log::security_event("card_token_mismatch", &json!({ "token": card.token }));
            return Err(PaymentError::TokenMismatch);
        }

        Ok(SecretString::new(sealed.card_number.into_boxed_str()))
    }

    fn seal(&self, plaintext: &[u8]) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| PaymentError::Encryption)?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(envelope))
    }

    fn open(&self, encoded: &str) -> Result<Vec<u8>> {
        let envelope = STANDARD
            .decode(encoded)
            .map_err(|e| PaymentError::Decryption(e.to_string()))?;
        if envelope.len() < NONCE_LEN + TAG_LEN {
            return Err(PaymentError::Decryption("envelope too short".to_string()));
        }

        let (nonce, ciphertext) = envelope.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| PaymentError::Decryption("authentication failed".to_string()))
    }
}

impl fmt::Debug for CardVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardVault").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn vault() -> CardVault {
        CardVault::new(&PaymentConfig::generate()).unwrap()
    }

    #[test]
    fn test_tokenize_and_reveal() {
        let vault = vault();
        let card = vault.tokenize("4111 1111 1111 1111").unwrap();

        assert_eq!(card.token.len(), 32);
        assert!(card.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(card.last4, "1111");
        assert!(!card.encrypted_data.contains("4111111111111111"));

        let revealed = vault.reveal(&card).unwrap();
        assert_eq!(revealed.expose_secret(), "4111111111111111");
    }

    #[test]
    fn test_invalid_card_not_tokenized() {
        assert!(matches!(
            vault().tokenize("4111111111111112"),
            Err(PaymentError::InvalidCardNumber)
        ));
    }

    #[test]
    fn test_same_card_seals_differently() {
        let vault = vault();
        let a = vault.tokenize("4242424242424242").unwrap();
        let b = vault.tokenize("4242424242424242").unwrap();
        assert_ne!(a.token, b.token);
        assert_ne!(a.encrypted_data, b.encrypted_data);
    }

    #[test]
    fn test_tampered_envelope_rejected() {
        let vault = vault();
        let mut card = vault.tokenize("4242424242424242").unwrap();

        let mut raw = STANDARD.decode(&card.encrypted_data).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        card.encrypted_data = STANDARD.encode(raw);

        assert!(matches!(
            vault.reveal(&card),
            Err(PaymentError::Decryption(_))
        ));
    }

    #[test]
    fn test_other_key_cannot_reveal() {
        let card = vault().tokenize("4242424242424242").unwrap();
        assert!(vault().reveal(&card).is_err());
    }

    #[test]
    fn test_swapped_token_rejected() {
        let vault = vault();
        let a = vault.tokenize("4242424242424242").unwrap();
        let b = vault.tokenize("5555555555554444").unwrap();

        let forged = CardToken {
            token: a.token.clone(),
            last4: b.last4.clone(),
            encrypted_data: b.encrypted_data.clone(),
        };
        assert!(matches!(
            vault.reveal(&forged),
            Err(PaymentError::TokenMismatch)
        ));
    }

    #[test]
    fn test_short_envelope_rejected() {
        let vault = vault();
        let card = CardToken {
            token: "00".repeat(16),
            last4: "0000".to_string(),
            encrypted_data: STANDARD.encode([0u8; 8]),
        };
        assert!(matches!(
            vault.reveal(&card),
            Err(PaymentError::Decryption(_))
        ));
    }

    #[test]
    fn test_debug_hides_envelope() {
        let card = vault().tokenize("4242424242424242").unwrap();
        assert!(!format!("{:?}", card).contains(&card.encrypted_data));
    }
}
