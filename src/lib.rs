// Bastion - security building blocks for web applications
//
// XSS detection and sanitization, per-session CSRF tokens and card data
// tokenization, each in its own crate and re-exported here behind a feature.

// Logging is always available
pub use bastion_log as log;

#[cfg(feature = "xss")]
pub use bastion_xss as xss;

#[cfg(feature = "csrf")]
pub use bastion_csrf as csrf;

#[cfg(feature = "payments")]
pub use bastion_payments as payments;

// Prelude for common imports
pub mod prelude {
    pub use bastion_log::{LogConfig, security_event};

    #[cfg(feature = "xss")]
    pub use bastion_xss::{
        Detection, SanitizationResult, XssConfig, XssEncoder, XssError, XssMiddleware,
        XssSanitizer, XssValidator, analyze, detect, sanitize,
    };

    #[cfg(feature = "csrf")]
    pub use bastion_csrf::{
        CsrfConfig, CsrfDecision, CsrfError, CsrfManager, CsrfMiddleware, Validation,
        ValidationReason,
    };

    #[cfg(feature = "payments")]
    pub use bastion_payments::{
        CardToken, CardVault, PaymentConfig, PaymentData, PaymentError, PaymentValidation,
        validate_payment_data,
    };
}
