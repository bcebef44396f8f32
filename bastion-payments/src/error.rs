//! Error types for payment data handling

use thiserror::Error;

/// Payment error types
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Card number failed validation
    #[error("Invalid card number")]
    InvalidCardNumber,

    /// Vault key is missing or malformed
    #[error("Invalid vault key: {0}")]
    InvalidKey(String),

    /// Sealing failed
    #[error("Encryption failed")]
    Encryption,

    /// Envelope is malformed, tampered with or sealed under another key
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Sealed payload belongs to a different token
    #[error("Token does not match sealed data")]
    TokenMismatch,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for payment operations
pub type Result<T> = std::result::Result<T, PaymentError>;
