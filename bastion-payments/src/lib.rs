//! Payment data handling for Bastion
//!
//! Server-side checks for card data and a small vault that swaps a card
//! number for an opaque token.
//!
//! ## Overview
//!
//! ```text
//! checkout form ──► validate_payment_data ──► CardVault::tokenize ──► CardToken
//!                   (Luhn, CVV, expiry)       (AES-256-GCM)           { token, last4,
//!                                                                       encryptedData }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bastion_payments::{validate_payment_data, CardVault, PaymentConfig, PaymentData};
//! use chrono::NaiveDate;
//! use secrecy::ExposeSecret;
//!
//! let data = PaymentData {
//!     card_number: "4111 1111 1111 1111".into(),
//!     cvv: "123".into(),
//!     expiry_month: 12,
//!     expiry_year: 2030,
//! };
//! let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! assert!(validate_payment_data(&data, today).is_valid);
//!
//! let vault = CardVault::new(&PaymentConfig::generate()).unwrap();
//! let card = vault.tokenize(&data.card_number).unwrap();
//! assert_eq!(card.last4, "1111");
//! assert_eq!(vault.reveal(&card).unwrap().expose_secret(), "4111111111111111");
//! ```

pub mod config;
pub mod error;
pub mod validation;
pub mod vault;

pub use config::{PaymentConfig, KEY_LEN};
pub use error::{PaymentError, Result};
pub use validation::{
    is_valid_card_number, is_valid_cvv, is_valid_expiry, mask_card_number,
    validate_payment_data, PaymentData, PaymentValidation,
};
pub use vault::{CardToken, CardVault};
