//! Discovery error types.

use thiserror::Error;

use crate::scryfall::ProviderError;

/// Failures that abort a discovery request.
///
/// Sub-query failures never surface here; they only drop the affected
/// category.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A required input was missing or empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The main card lookup matched nothing.
    #[error("No card found matching the name '{name}'")]
    CardNotFound { name: String },

    /// The main card lookup failed.
    #[error("Error looking up card '{name}': {source}")]
    Lookup {
        name: String,
        #[source]
        source: ProviderError,
    },

    /// A direct card search failed.
    #[error("Error searching for {kind} '{term}': {source}")]
    Search {
        kind: &'static str,
        term: String,
        #[source]
        source: ProviderError,
    },
}

impl DiscoveryError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Errors raised while loading a reference dataset.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The resource could not be read.
    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource content is malformed.
    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    /// The resource holds no entries.
    #[error("{0} contains no entries")]
    Empty(String),
}
