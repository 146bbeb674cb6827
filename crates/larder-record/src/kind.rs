//! Record descriptor trait implemented once per record kind.

use crate::error::RecordError;
use crate::meta::{RecordMeta, format_time};
use crate::validation::ValidationErrors;
use serde_json::{Map, Value};

/// Flat JSON object holding a record's fields.
pub type FieldMap = Map<String, Value>;

/// Reserved field name for the record identifier.
pub const FIELD_IDENTIFIER: &str = "identifier";
/// Reserved field name for the creation timestamp.
pub const FIELD_CREATED_AT: &str = "created_at";
/// Reserved field name for the last-save timestamp.
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// A persistable record kind.
///
/// Implementations declare a key namespace and expiration policy and expose
/// their payload as a flat field map. The provided methods build on those
/// hooks to derive store keys and to render the serialized view shared by
/// persistence and equality.
pub trait RecordKind: Sized + Send + Sync {
    /// Stable key prefix shared by every record of this kind.
    const KEY_NAMESPACE: &'static str;

    /// Seconds until a saved record expires; `None` never expires.
    const TTL_SECS: Option<u64>;

    /// Identity and lifecycle state.
    fn meta(&self) -> &RecordMeta;

    /// Mutable identity and lifecycle state.
    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Kind-specific payload as a flat field map.
    ///
    /// [`FIELD_IDENTIFIER`], [`FIELD_CREATED_AT`], and [`FIELD_UPDATED_AT`]
    /// are reserved for identity; the payload must not use them.
    fn to_fields(&self) -> FieldMap;

    /// Rebuild a record from decoded identity state and payload fields.
    ///
    /// Fields the kind does not recognize are ignored.
    fn from_fields(meta: RecordMeta, fields: FieldMap) -> Result<Self, RecordError>;

    /// Record validation messages for the current field values.
    fn validate(&self, _errors: &mut ValidationErrors) {}

    /// Derive the store key for an identifier.
    fn derive_key(identifier: &str) -> String {
        format!("{}:{}", Self::KEY_NAMESPACE, identifier)
    }

    /// Re-run validation, replacing any prior messages.
    ///
    /// Returns whether the record is currently valid; the fresh messages
    /// are readable through `meta().validation_errors()`.
    fn is_valid(&mut self) -> bool {
        let mut errors = ValidationErrors::new();
        self.validate(&mut errors);
        let valid = errors.is_empty();
        *self.meta_mut().validation_errors_mut() = errors;
        valid
    }

    /// The full serialized view: payload plus identity fields.
    ///
    /// Identity fields render as ISO-8601 strings, or JSON null while the
    /// record has never been saved. Validation state never appears here.
    fn to_document(&self) -> FieldMap {
        let mut document = self.to_fields();
        let meta = self.meta();
        document.insert(
            FIELD_IDENTIFIER.to_string(),
            meta.identifier().map_or(Value::Null, Value::from),
        );
        document.insert(
            FIELD_CREATED_AT.to_string(),
            meta.created_at()
                .map_or(Value::Null, |at| Value::from(format_time(at))),
        );
        document.insert(
            FIELD_UPDATED_AT.to_string(),
            meta.updated_at()
                .map_or(Value::Null, |at| Value::from(format_time(at))),
        );
        document
    }

    /// Structural equality on the full serialized view.
    fn record_eq(&self, other: &Self) -> bool {
        self.to_document() == other.to_document()
    }
}
