//! Record identity and lifecycle state.

use crate::error::RecordError;
use crate::given::{Given, TimeInput};
use crate::validation::ValidationErrors;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Canonical timestamp precision in subsecond digits.
const TIMESTAMP_PRECISION: u16 = 6;

/// Construction inputs for record identity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFields {
    /// Record identifier, assigned on first save when not supplied.
    pub identifier: Given<String>,
    /// Creation timestamp, assigned on first save when not supplied.
    pub created_at: Given<TimeInput>,
    /// Last-save timestamp, refreshed on every save.
    pub updated_at: Given<TimeInput>,
}

/// Identity and lifecycle state embedded in every record kind.
///
/// The identifier is immutable once assigned; there is no setter. A record
/// whose identifier is `None` has never been saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMeta {
    identifier: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    validation_errors: ValidationErrors,
}

impl RecordMeta {
    /// State for a record that has never been saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build identity state from construction inputs.
    ///
    /// Supplied timestamps are normalized to the canonical representation;
    /// explicit null reads the same as absent.
    pub fn from_fields(fields: MetaFields) -> Result<Self, RecordError> {
        let created_at = match fields.created_at.into_option() {
            Some(input) => Some(normalize_time(input)?),
            None => None,
        };
        let updated_at = match fields.updated_at.into_option() {
            Some(input) => Some(normalize_time(input)?),
            None => None,
        };
        Ok(Self {
            identifier: fields.identifier.into_option(),
            created_at,
            updated_at,
            validation_errors: ValidationErrors::new(),
        })
    }

    /// Record identifier; `None` until the first save.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Creation timestamp; `None` until the first save.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Last-save timestamp; `None` until the first save.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Messages recorded by the most recent validation pass.
    ///
    /// Transient state: never persisted and excluded from the serialized
    /// view.
    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.validation_errors
    }

    pub(crate) fn validation_errors_mut(&mut self) -> &mut ValidationErrors {
        &mut self.validation_errors
    }

    /// Assign save-time identity and return the record's identifier.
    ///
    /// Assigns a fresh identifier when none is set, `created_at` once, and
    /// `updated_at` on every call; both timestamps observe the same instant,
    /// so they are equal after the first save. Called by persistence
    /// implementations, not by record constructors.
    pub fn prepare_save(&mut self, now: DateTime<Utc>) -> String {
        let now = now.trunc_subsecs(TIMESTAMP_PRECISION);
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
        self.identifier
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }
}

/// Render a timestamp in the canonical ISO-8601 form.
pub fn format_time(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an ISO-8601 timestamp into the canonical representation.
pub fn parse_time(value: &str) -> Result<DateTime<Utc>, RecordError> {
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|err| RecordError::Time {
        value: value.to_string(),
        source: err,
    })?;
    Ok(parsed.with_timezone(&Utc).trunc_subsecs(TIMESTAMP_PRECISION))
}

fn normalize_time(input: TimeInput) -> Result<DateTime<Utc>, RecordError> {
    match input {
        TimeInput::At(value) => Ok(value.trunc_subsecs(TIMESTAMP_PRECISION)),
        TimeInput::Iso8601(value) => parse_time(&value),
    }
}

#[cfg(test)]
mod tests {
    use super::{MetaFields, RecordMeta, format_time, parse_time};
    use crate::error::RecordError;
    use crate::given::Given;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    #[test]
    fn from_fields_normalizes_supplied_timestamps() {
        let meta = RecordMeta::from_fields(MetaFields {
            identifier: "abc".to_string().into(),
            created_at: Given::Value("2024-05-01T10:20:30.123456789Z".into()),
            updated_at: Given::Value("2024-05-01T10:20:31+02:00".into()),
        })
        .expect("meta");

        assert_eq!(meta.identifier(), Some("abc"));
        assert_eq!(
            meta.created_at(),
            Some(parse_time("2024-05-01T10:20:30.123456Z").expect("time"))
        );
        assert_eq!(
            meta.updated_at(),
            Some(parse_time("2024-05-01T08:20:31Z").expect("time"))
        );
    }

    #[test]
    fn from_fields_treats_null_and_unset_as_absent() {
        let meta = RecordMeta::from_fields(MetaFields {
            identifier: Given::Null,
            ..MetaFields::default()
        })
        .expect("meta");

        assert_eq!(meta.identifier(), None);
        assert_eq!(meta.created_at(), None);
        assert_eq!(meta.updated_at(), None);
    }

    #[test]
    fn from_fields_rejects_malformed_timestamps() {
        let err = RecordMeta::from_fields(MetaFields {
            created_at: Given::Value("yesterday".into()),
            ..MetaFields::default()
        })
        .expect_err("malformed");

        match err {
            RecordError::Time { value, .. } => assert_eq!(value, "yesterday"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn prepare_save_assigns_identity_once() {
        let first = parse_time("2024-05-01T10:20:30.123456Z").expect("time");
        let second = parse_time("2024-05-01T10:20:32.000000Z").expect("time");

        let mut meta = RecordMeta::new();
        let identifier = meta.prepare_save(first);
        Uuid::parse_str(&identifier).expect("uuid identifier");
        assert_eq!(meta.created_at(), Some(first));
        assert_eq!(meta.updated_at(), Some(first));

        let again = meta.prepare_save(second);
        assert_eq!(again, identifier);
        assert_eq!(meta.created_at(), Some(first));
        assert_eq!(meta.updated_at(), Some(second));
    }

    #[test]
    fn prepare_save_truncates_the_save_instant() {
        let base = parse_time("2024-05-01T10:20:30.123456Z").expect("time");
        let raw = base + Duration::nanoseconds(789);

        let mut meta = RecordMeta::new();
        meta.prepare_save(raw);
        assert_eq!(meta.created_at(), Some(base));
    }

    #[test]
    fn prepare_save_preserves_a_supplied_identifier() {
        let now = parse_time("2024-05-01T10:20:30Z").expect("time");

        let mut meta = RecordMeta::from_fields(MetaFields {
            identifier: "order-7".to_string().into(),
            ..MetaFields::default()
        })
        .expect("meta");
        assert_eq!(meta.prepare_save(now), "order-7");

        let mut empty = RecordMeta::from_fields(MetaFields {
            identifier: String::new().into(),
            ..MetaFields::default()
        })
        .expect("meta");
        assert_eq!(empty.prepare_save(now), "");
    }

    #[test]
    fn format_and_parse_round_trip() {
        let value = "2024-05-01T10:20:30.123456Z";
        let parsed = parse_time(value).expect("time");
        assert_eq!(format_time(parsed), value);
    }
}
