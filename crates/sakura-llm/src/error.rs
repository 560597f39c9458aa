//! Provider error types.

use thiserror::Error;

/// Errors from talking to the language model server.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The server answered with an unexpected non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Authentication was rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested model is not available (HTTP 404).
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The server answered with something that is not a chat completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request did not finish in time.
    #[error("timeout")]
    Timeout,

    /// Nothing is listening at the configured address.
    #[error("server unreachable at {0}")]
    Unreachable(String),

    /// Any other HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Classify a transport error from `reqwest`.
    pub(crate) fn from_send(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unreachable(url.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// A convenience alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
