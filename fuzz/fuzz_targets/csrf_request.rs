//! Fuzz target for CSRF request processing.
//!
//! Arbitrary methods, paths, headers and bodies must never panic, and a
//! protected request is only verified when it carries the issued token.

#![no_main]

use arbitrary::Arbitrary;
use bastion_csrf::{CsrfDecision, CsrfMiddleware};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzRequest {
    method: String,
    path: String,
    session: Option<String>,
    token_header: Option<String>,
    body: Vec<u8>,
}

fuzz_target!(|data: FuzzRequest| {
    let csrf = CsrfMiddleware::default();
    let issued = csrf.manager().issue("fuzz-session").unwrap();

    let mut builder = http::Request::builder()
        .method(data.method.as_str())
        .uri(format!("/{}", data.path.trim_start_matches('/')));
    if let Some(session) = &data.session {
        builder = builder.header("X-Session-Id", session.as_str());
    }
    if let Some(token) = &data.token_header {
        builder = builder.header("X-CSRF-Token", token.as_str());
    }
    let Ok(request) = builder.body(data.body) else {
        return;
    };

    let extracted = csrf.extract_token(request.headers(), request.body());

    match csrf.process(&request) {
        Ok(CsrfDecision::Verified) => {
            assert_eq!(extracted.as_deref(), Some(issued.as_str()));
        }
        Ok(CsrfDecision::Issued(token)) => {
            assert!(csrf.manager().validate(
                csrf.session_key(request.headers()).as_deref().unwrap(),
                &token
            ).valid);
        }
        Ok(CsrfDecision::Exempt) => {}
        Err(err) => assert!(err.reason().is_some()),
    }
});
