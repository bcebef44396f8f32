//! Integration tests for bastion-payments

use base64::{engine::general_purpose::STANDARD, Engine};
use bastion_payments::*;
use chrono::NaiveDate;
use secrecy::ExposeSecret;

const TEST_CARDS: &[&str] = &[
    "4111111111111111",
    "4242 4242 4242 4242",
    "5555-5555-5555-4444",
    "378282246310005",
    "6011111111111117",
];

fn checkout(card_number: &str) -> PaymentData {
    PaymentData {
        card_number: card_number.to_string(),
        cvv: "123".to_string(),
        expiry_month: 8,
        expiry_year: 2028,
    }
}

#[test]
fn test_known_test_cards_validate() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    for card in TEST_CARDS {
        let result = validate_payment_data(&checkout(card), today);
        assert!(result.is_valid, "{card} rejected: {:?}", result.errors);
    }
}

#[test]
fn test_checkout_json_is_accepted() {
    let data: PaymentData = serde_json::from_str(
        r#"{"cardNumber":"4111111111111111","cvv":"999","expiryMonth":1,"expiryYear":2027}"#,
    )
    .unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    assert!(validate_payment_data(&data, today).is_valid);
}

#[test]
fn test_expired_this_year() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    let mut data = checkout("4111111111111111");
    data.expiry_month = 9;
    data.expiry_year = 2026;

    let result = validate_payment_data(&data, today);
    assert_eq!(result.errors, vec!["Invalid expiry date"]);
}

#[test]
fn test_vault_from_configured_key() {
    let encoded = STANDARD.encode([42u8; KEY_LEN]);
    let config = PaymentConfig::from_lookup(|key| {
        (key == "BASTION_PAYMENT_KEY").then(|| encoded.clone())
    })
    .unwrap();

    let sealing = CardVault::new(&config).unwrap();
    let card = sealing.tokenize("4242424242424242").unwrap();

    // A second vault over the same key opens it
    let opening = CardVault::new(&PaymentConfig::from_base64(&encoded).unwrap()).unwrap();
    assert_eq!(
        opening.reveal(&card).unwrap().expose_secret(),
        "4242424242424242"
    );
}

#[test]
fn test_every_test_card_tokenizes() {
    let vault = CardVault::new(&PaymentConfig::generate()).unwrap();
    for card in TEST_CARDS {
        let token = vault.tokenize(card).unwrap();
        let masked = mask_card_number(card);
        assert!(masked.ends_with(&token.last4));
        assert!(!masked[..masked.len() - 4].contains(|c: char| c.is_ascii_digit()));
    }
}

#[test]
fn test_card_token_json_shape() {
    let vault = CardVault::new(&PaymentConfig::generate()).unwrap();
    let token = vault.tokenize("4111111111111111").unwrap();
    let json = serde_json::to_value(&token).unwrap();

    assert_eq!(json["last4"], "1111");
    assert!(json["token"].is_string());
    assert!(json["encryptedData"].is_string());
}
