//! Fuzz target for pattern detection.
//!
//! Checks that the different views of one detection agree with each other.

#![no_main]

use bastion_xss::patterns::patterns;
use bastion_xss::XssValidator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let detection = bastion_xss::detect(input);

    assert_eq!(detection.had_match, !detection.matched_patterns.is_empty());
    assert_eq!(XssValidator::contains_xss(input), detection.had_match);
    assert_eq!(XssValidator::validate(input).is_err(), detection.had_match);
    assert_eq!(
        XssValidator::detect_attack_type(input),
        detection.matched_patterns.first().copied()
    );

    // Reported in table order, each at most once
    let expected: Vec<&str> = patterns()
        .iter()
        .filter(|p| p.is_match(input))
        .map(|p| p.name())
        .collect();
    assert_eq!(detection.matched_patterns, expected);
});
