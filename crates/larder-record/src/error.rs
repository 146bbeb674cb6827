//! Error types for record construction and persistence.

use crate::validation::ValidationErrors;
use larder_store::StoreError;
use thiserror::Error;

/// Errors returned by record construction, lookup, and persistence.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Validation rejected the record; nothing was written.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),
    /// No record lives under the key.
    #[error("record not found: {key}")]
    NotFound { key: String },
    /// A timestamp failed to parse.
    #[error("invalid timestamp {value:?}: {source}")]
    Time {
        value: String,
        source: chrono::ParseError,
    },
    /// A decoded field did not match the kind's expectations.
    #[error("invalid field {field}: {message}")]
    Field { field: String, message: String },
    /// Encoding or decoding a record blob failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The store failed; surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
