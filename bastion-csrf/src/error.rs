use crate::manager::ValidationReason;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsrfError {
    #[error("Session key must not be empty")]
    EmptySessionKey,

    #[error("CSRF token validation failed: {0}")]
    Rejected(ValidationReason),

    #[error("Invalid CSRF configuration: {0}")]
    InvalidConfig(String),
}

impl CsrfError {
    /// The validation failure behind a rejection, if this is one.
    pub fn reason(&self) -> Option<ValidationReason> {
        match self {
            CsrfError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CsrfError>;
