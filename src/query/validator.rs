//! Field-level validation error collection.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field name → human-readable message. The first message recorded for a
/// field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Accumulates errors across many checks; never stops at the first one.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Record an error when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// Exact membership test against an allow-list.
pub fn permitted_value<T, P>(value: &T, permitted: &[P]) -> bool
where
    T: ?Sized,
    P: PartialEq<T>,
{
    permitted.iter().any(|p| p == value)
}
