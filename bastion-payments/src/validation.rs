//! Card data checks done before anything is charged or stored.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Card details as submitted by a checkout form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
}

impl std::fmt::Debug for PaymentData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentData")
            .field("card_number", &mask_card_number(&self.card_number))
            .field("cvv", &"***")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .finish()
    }
}

/// Result of [`validate_payment_data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

fn digits(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Luhn check over the digits of `number`; separators are ignored.
///
/// Fewer than 12 or more than 19 digits never passes.
pub fn is_valid_card_number(number: &str) -> bool {
    let digits = digits(number);
    if !(12..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Three or four ASCII digits.
pub fn is_valid_cvv(cvv: &str) -> bool {
    (3..=4).contains(&cvv.len()) && cvv.bytes().all(|b| b.is_ascii_digit())
}

/// A card is good through the last day of its expiry month.
pub fn is_valid_expiry(month: u32, year: i32, today: NaiveDate) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    (year, month) >= (today.year(), today.month())
}

/// Run every check and collect the failures in a fixed order.
pub fn validate_payment_data(data: &PaymentData, today: NaiveDate) -> PaymentValidation {
    let mut errors = Vec::new();

    if !is_valid_card_number(&data.card_number) {
        errors.push("Invalid card number".to_string());
    }
    if !is_valid_cvv(&data.cvv) {
        errors.push("Invalid CVV".to_string());
    }
    if !is_valid_expiry(data.expiry_month, data.expiry_year, today) {
        errors.push("Invalid expiry date".to_string());
    }

    PaymentValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Replace all but the last four digits with `*`. Separators are dropped.
pub fn mask_card_number(number: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let visible = digits.len().saturating_sub(4);

    digits
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    #[test]
    fn test_luhn() {
        assert!(is_valid_card_number("4111111111111111"));
        assert!(is_valid_card_number("4111 1111 1111 1111"));
        assert!(is_valid_card_number("5555-5555-5555-4444"));
        assert!(is_valid_card_number("378282246310005"));
        assert!(!is_valid_card_number("4111111111111112"));
    }

    #[test]
    fn test_luhn_length_bounds() {
        assert!(!is_valid_card_number(""));
        assert!(!is_valid_card_number("0000000000"));
        assert!(!is_valid_card_number("00000000000000000000"));
        assert!(is_valid_card_number("000000000000"));
    }

    #[test]
    fn test_cvv() {
        assert!(is_valid_cvv("123"));
        assert!(is_valid_cvv("1234"));
        assert!(!is_valid_cvv("12"));
        assert!(!is_valid_cvv("12345"));
        assert!(!is_valid_cvv("12a"));
        assert!(!is_valid_cvv(""));
    }

    #[test]
    fn test_expiry() {
        assert!(is_valid_expiry(6, 2026, today()));
        assert!(is_valid_expiry(1, 2027, today()));
        assert!(!is_valid_expiry(5, 2026, today()));
        assert!(!is_valid_expiry(12, 2025, today()));
        assert!(!is_valid_expiry(0, 2030, today()));
        assert!(!is_valid_expiry(13, 2030, today()));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let data = PaymentData {
            card_number: "1234".to_string(),
            cvv: "1".to_string(),
            expiry_month: 1,
            expiry_year: 2020,
        };

        let result = validate_payment_data(&data, today());
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Invalid card number", "Invalid CVV", "Invalid expiry date"]
        );
    }

    #[test]
    fn test_validate_ok() {
        let data = PaymentData {
            card_number: "4242 4242 4242 4242".to_string(),
            cvv: "123".to_string(),
            expiry_month: 12,
            expiry_year: 2030,
        };

        let result = validate_payment_data(&data, today());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask_card_number("4111 1111 1111 1234"), "************1234");
        assert_eq!(mask_card_number("123"), "123");
    }

    #[test]
    fn test_debug_masks_card() {
        let data = PaymentData {
            card_number: "4111111111111111".to_string(),
            cvv: "987".to_string(),
            expiry_month: 12,
            expiry_year: 2030,
        };
        let debug = format!("{:?}", data);
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("987"));
    }

    #[test]
    fn test_validation_serializes_camel_case() {
        let json = serde_json::to_value(PaymentValidation {
            is_valid: false,
            errors: vec!["Invalid CVV".to_string()],
        })
        .unwrap();
        assert_eq!(json["isValid"], false);
    }
}
