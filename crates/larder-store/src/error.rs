//! Error types for store operations.

use thiserror::Error;

/// Errors returned by key-value store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A key pattern failed to compile.
    #[error("invalid key pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The backend rejected or failed an operation.
    #[error("store backend error: {0}")]
    Backend(String),
}
