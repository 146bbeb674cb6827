//! Tri-state construction inputs for record fields.

use chrono::{DateTime, Utc};

/// A constructor argument that distinguishes "not supplied" from
/// "supplied as null" and "supplied with a value".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Given<T> {
    /// The caller supplied nothing.
    Unset,
    /// The caller explicitly supplied null.
    Null,
    /// The caller supplied a value.
    Value(T),
}

impl<T> Given<T> {
    /// Whether the caller supplied nothing.
    pub fn is_unset(&self) -> bool {
        matches!(self, Given::Unset)
    }

    /// Collapse to an option: `Unset` and `Null` both read as `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Given::Value(value) => Some(value),
            Given::Unset | Given::Null => None,
        }
    }
}

impl<T> Default for Given<T> {
    /// Defaults to unset.
    fn default() -> Self {
        Given::Unset
    }
}

impl<T> From<T> for Given<T> {
    fn from(value: T) -> Self {
        Given::Value(value)
    }
}

impl<T> From<Option<T>> for Given<T> {
    /// `None` reads as explicit null, not as unset.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Given::Value(value),
            None => Given::Null,
        }
    }
}

/// A timestamp supplied either as a concrete instant or as an ISO-8601
/// string awaiting normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    /// A concrete instant.
    At(DateTime<Utc>),
    /// An ISO-8601 timestamp string.
    Iso8601(String),
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimeInput::At(value)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::Iso8601(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        TimeInput::Iso8601(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Given, TimeInput};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn given_defaults_to_unset() {
        let given: Given<String> = Given::default();
        assert!(given.is_unset());
        assert_eq!(given.into_option(), None);
    }

    #[test]
    fn given_collapses_null_and_unset_to_none() {
        assert_eq!(Given::<String>::Null.into_option(), None);
        assert_eq!(
            Given::Value("abc".to_string()).into_option(),
            Some("abc".to_string())
        );
        assert!(!Given::<String>::Null.is_unset());
    }

    #[test]
    fn given_converts_from_values_and_options() {
        assert_eq!(Given::from("abc".to_string()), Given::Value("abc".to_string()));
        assert_eq!(Given::from(Some(1)), Given::Value(1));
        assert_eq!(Given::<i32>::from(None), Given::Null);
    }

    #[test]
    fn time_input_converts_from_instants_and_strings() {
        let now = Utc::now();
        assert_eq!(TimeInput::from(now), TimeInput::At(now));
        assert_eq!(
            TimeInput::from("2024-05-01T00:00:00Z"),
            TimeInput::Iso8601("2024-05-01T00:00:00Z".to_string())
        );
    }
}
