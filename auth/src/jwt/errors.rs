use thiserror::Error;

/// Error raised while issuing a token.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

/// Reason a presented token was rejected.
///
/// Messages are safe to return to clients as-is.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization token")]
    Missing,

    #[error("Invalid or malformed token")]
    Malformed,

    #[error("Token has expired")]
    Expired,
}
