//! # Bastion CSRF Protection
//!
//! Cross-Site Request Forgery (CSRF) protection with per-session
//! synchronizer tokens.
//!
//! ## Features
//!
//! - ✅ **Session-bound Tokens** - One random token per session key, stored server-side
//! - ✅ **Lazy Expiry** - Expired tokens are removed when next validated
//! - ✅ **Constant-time Comparison** - Token checks via `subtle`
//! - ✅ **Pluggable Store and Clock** - In-memory DashMap store, manual clock for tests
//! - ✅ **Middleware Integration** - Issue on safe methods, verify on the rest
//!
//! ## Quick Start
//!
//! ```rust
//! use bastion_csrf::{CsrfManager, ValidationReason};
//!
//! let csrf = CsrfManager::default();
//! let token = csrf.issue("session-1").unwrap();
//!
//! assert!(csrf.validate("session-1", &token).valid);
//! assert_eq!(
//!     csrf.validate("session-1", "wrong-token").reason,
//!     ValidationReason::Mismatch,
//! );
//! assert_eq!(
//!     csrf.validate("unknown-session", &token).reason,
//!     ValidationReason::NoTokenFound,
//! );
//! ```
//!
//! ## Expiry
//!
//! ```rust
//! use bastion_csrf::{CsrfConfig, CsrfManager, ManualClock, ValidationReason};
//! use chrono::Duration;
//! use std::sync::Arc;
//!
//! let clock = ManualClock::starting_now();
//! let config = CsrfConfig::default().with_token_ttl(Duration::minutes(5)).unwrap();
//! let csrf = CsrfManager::new(config).with_clock(Arc::new(clock.clone()));
//!
//! let token = csrf.issue("s1").unwrap();
//! clock.advance(Duration::minutes(6));
//!
//! assert_eq!(csrf.validate("s1", &token).reason, ValidationReason::Expired);
//! assert_eq!(csrf.validate("s1", &token).reason, ValidationReason::NoTokenFound);
//! ```
//!
//! ## Usage with an HTTP layer
//!
//! ```rust
//! use bastion_csrf::{CsrfDecision, CsrfMiddleware};
//!
//! let csrf = CsrfMiddleware::default();
//!
//! let get = http::Request::get("/form")
//!     .header("X-Session-Id", "s1")
//!     .body(Vec::new())
//!     .unwrap();
//! let CsrfDecision::Issued(token) = csrf.process(&get).unwrap() else {
//!     unreachable!()
//! };
//!
//! let post = http::Request::post("/transfer")
//!     .header("X-Session-Id", "s1")
//!     .header("Content-Type", "application/x-www-form-urlencoded")
//!     .body(format!("amount=10&csrfToken={token}").into_bytes())
//!     .unwrap();
//! assert_eq!(csrf.process(&post).unwrap(), CsrfDecision::Verified);
//!
//! let forged = http::Request::post("/transfer")
//!     .header("X-Session-Id", "s1")
//!     .body(Vec::new())
//!     .unwrap();
//! let reason = csrf.process(&forged).unwrap_err().reason().unwrap();
//! assert_eq!(csrf.rejection_response(reason).status(), 403);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod manager;
pub mod middleware;
pub mod store;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CsrfConfig, MAX_TOKEN_TTL_DAYS, MIN_TOKEN_BYTES};
pub use error::{CsrfError, Result};
pub use manager::{CsrfManager, Validation, ValidationReason};
pub use middleware::{CsrfDecision, CsrfMiddleware};
pub use store::{MemoryTokenStore, TokenStore};
pub use token::CsrfToken;
