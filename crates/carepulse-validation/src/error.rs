//! Field-level validation errors

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// One invalid field and the first rule it broke
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// User-facing message of the first failing rule
    pub message: String,
}

impl FieldError {
    /// Create field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every invalid field of one validation pass, in schema order
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrorList(Vec<FieldError>);

impl FieldErrorList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Message for `field`, if it failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// True when `field` failed
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Names of the failing fields
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    /// Iterate errors
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field name → message map for display layers
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|e| (e.field.clone(), e.message.clone()))
            .collect()
    }
}

impl IntoIterator for FieldErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<FieldError> for FieldErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
