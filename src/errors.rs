use thiserror::Error;

/// Error type that captures the failure classes surfaced by the core.
///
/// The HTTP-facing layer maps variants to status codes; nothing in this
/// crate knows about status codes itself.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("upstream unavailable: {0}")]
    Upstream(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedRecord(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Upstream(err.to_string())
    }
}
