//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the entire application.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error originating from card discovery.
    #[error("Discovery error: {0}")]
    Discovery(#[from] crate::domains::discovery::DiscoveryError),

    /// Error returned by the card search provider.
    #[error("Provider error: {0}")]
    Provider(#[from] crate::scryfall::ProviderError),

    /// Error starting or running a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scryfall::ProviderError;

    #[test]
    fn test_provider_error_conversion() {
        let err: Error = ProviderError::api(404, "not_found", "No cards found").into();
        assert!(matches!(err, Error::Provider(_)));
        assert!(err.to_string().starts_with("Provider error: "));
    }

    #[test]
    fn test_config_error_message() {
        assert_eq!(
            Error::config("missing user agent").to_string(),
            "Configuration error: missing user agent"
        );
    }
}
