//! Validated record persistence over key-value stores.
//!
//! A record kind declares its key namespace, expiration policy, payload
//! fields, and validation rules; the persistence front end turns that into
//! validated, atomic writes against any [`larder_store::KvStore`].

pub mod error;
pub mod given;
pub mod kind;
pub mod meta;
pub mod persistence;
pub mod validation;

/// Record error type.
pub use error::RecordError;
/// Tri-state construction inputs.
pub use given::{Given, TimeInput};
/// Record descriptor trait and field document alias.
pub use kind::{FieldMap, RecordKind};
/// Identity state and construction inputs.
pub use meta::{MetaFields, RecordMeta};
/// Persistence front end and its save/destroy seam.
pub use persistence::{Diagnostics, KvRecordStore, RecordStore};
/// Field-level validation results.
pub use validation::ValidationErrors;
