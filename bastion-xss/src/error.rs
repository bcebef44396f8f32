use thiserror::Error;

#[derive(Error, Debug)]
pub enum XssError {
    #[error("Potentially malicious content detected: {0}")]
    MaliciousContent(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, XssError>;
