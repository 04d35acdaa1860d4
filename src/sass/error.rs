//! Error types for the Sass module
//!
//! Malformed stylesheet input never produces an error: it degrades to diagnostics.
//! These errors cover the infrastructure around parsing, such as reading imported
//! files, converting between paths and URIs and loading configuration.

use thiserror::Error;
use url::Url;

/// Main error type for Sass module operations
#[derive(Error, Debug)]
pub enum SassError {
    /// IO errors (reading imported files, etc.)
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON errors (configuration payloads)
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A URI that does not point to a local file
    #[error("URI is not a file path: {uri}")]
    NotAFileUri { uri: Url },

    /// An import that points back to a file whose load is still in progress
    #[error("Import cycle detected while loading {uri}")]
    ImportCycle { uri: Url },

    /// A file that was requested but never parsed
    #[error("File not loaded: {uri}")]
    FileNotLoaded { uri: Url },
}

/// Result type alias for Sass operations
pub type SassResult<T> = Result<T, SassError>;

impl From<std::io::Error> for SassError {
    fn from(err: std::io::Error) -> Self {
        SassError::Io {
            source: err,
            message: "IO operation failed".to_string(),
        }
    }
}

impl From<serde_json::Error> for SassError {
    fn from(err: serde_json::Error) -> Self {
        SassError::Json {
            source: err,
            message: "JSON operation failed".to_string(),
        }
    }
}

/// Helper trait for converting IO errors with context
pub trait IoContext<T> {
    fn with_io_context(self, message: &str) -> SassResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_io_context(self, message: &str) -> SassResult<T> {
        self.map_err(|e| SassError::Io {
            message: message.to_string(),
            source: e,
        })
    }
}
