use thiserror::Error;

/// Error type for session token operations.
///
/// Validation failures are kept apart for logging. Callers facing a client
/// should collapse them into a single "unauthorized" outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
