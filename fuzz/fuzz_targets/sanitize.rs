//! Fuzz target for the sanitizer.
//!
//! Whatever goes in, the output must carry no raw HTML specials and none of
//! the stripped payload prefixes, and re-sanitizing must stay free of them.

#![no_main]

use libfuzzer_sys::fuzz_target;

const FORBIDDEN: &[&str] = &[
    "<script",
    "<iframe",
    "<object",
    "<embed",
    "javascript:",
    "vbscript:",
];

fn check(output: &str) {
    for c in ['<', '>', '"', '\'', '/'] {
        assert!(!output.contains(c), "raw {c:?} in {output:?}");
    }
    let lower = output.to_lowercase();
    for literal in FORBIDDEN {
        assert!(!lower.contains(literal), "{literal:?} survived in {output:?}");
    }
}

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let once = bastion_xss::sanitize(&input);
    check(&once);
    check(&bastion_xss::sanitize(&once));

    let report = bastion_xss::analyze(&input);
    assert_eq!(report.sanitized, once);
    assert_eq!(report.original, input);

    let value = serde_json::Value::String(input.to_string());
    assert_eq!(bastion_xss::XssSanitizer::sanitize_value(&value), once);
});
