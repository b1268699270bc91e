//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a wide-column store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested table does not exist
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The server rejected the row filter (e.g. an unparsable key regex)
    #[error("invalid row filter: {0}")]
    InvalidFilter(String),

    /// Connectivity problem talking to the store
    #[error("connection error: {0}")]
    Connection(String),

    /// A cell carried data the client could not interpret
    #[error("malformed cell in row {key}: {reason}")]
    MalformedCell { key: String, reason: String },

    /// Fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else the backend reports
    #[error("internal store error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Fixture(e.to_string())
    }
}
