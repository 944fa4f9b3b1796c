//! Error types for order persistence.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted state.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O error from file-backed storage
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored order collection exists but does not decode
    #[error("Stored orders are unreadable: {0}")]
    Unreadable(serde_json::Error),

    /// Key-value storage could not be accessed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Response status code
        status: u16,
        /// Status text or body excerpt
        message: String,
    },
}

impl PersistenceError {
    /// Create a storage access error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}
