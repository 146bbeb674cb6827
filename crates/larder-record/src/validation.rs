//! Field-level validation results.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Validation messages keyed by field name.
///
/// Fields iterate in name order so rendered output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Discard all recorded messages.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Whether no message is recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded against a field; empty for unknown fields.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate fields and their messages in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}
