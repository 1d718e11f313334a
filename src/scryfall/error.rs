//! Provider error types.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors returned by a card search provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API answered with an error object.
    #[error("Scryfall API error ({status}, {code}): {details}")]
    Api {
        status: u16,
        code: String,
        details: String,
    },

    /// The requested object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The invocation that issued the request was cancelled.
    #[error("Request cancelled")]
    Cancelled,

    /// The invocation ran out of time.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

impl ProviderError {
    /// Create an API error.
    pub fn api(status: u16, code: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            details: details.into(),
        }
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Whether the error came from the request scope rather than the provider.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}
