//! Error types for the storage adapters.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The adapter did not answer within its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The key cannot be represented by this adapter.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}
