//! Field values and records
//!
//! A [`FieldValue`] is the untyped union a form input can hold. It maps onto
//! plain JSON so records can be read from files or request bodies without a
//! wrapper format:
//!
//! | JSON | value |
//! |------|-------|
//! | `null` | [`FieldValue::Empty`] |
//! | `true` | [`FieldValue::Bool`] |
//! | `"text"` | [`FieldValue::Text`] |
//! | `[{"name": ..}]` | [`FieldValue::Files`] |
//! | anything else (`42`, `{..}`) | [`FieldValue::Other`] |
//!
//! `Other` keeps a record readable when one input has an unexpected shape;
//! the schema then reports that field as invalid.
//!
//! Dates always arrive as text and are coerced by the schema that reads them;
//! [`FieldValue::Date`] only appears after validation or when a date picker
//! emits a value directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping of field name to value
pub type Record = BTreeMap<String, FieldValue>;

/// Reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Original file name
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// MIME type if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Current value of a single form field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (never touched, or cleared)
    #[default]
    Empty,
    /// Checkbox state
    Bool(bool),
    /// Free text, select choice or phone number
    Text(String),
    /// File list from an upload control
    Files(Vec<FileRef>),
    /// Calendar instant
    Date(DateTime<Utc>),
    /// Any other JSON shape, e.g. an unquoted number
    Other(serde_json::Value),
}

impl FieldValue {
    /// True when the field holds nothing at all
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a checkbox value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Instant, if this is an already-coerced date
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// File list, if this is an upload value
    pub fn as_files(&self) -> Option<&[FileRef]> {
        match self {
            FieldValue::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Empty => "empty",
            FieldValue::Bool(_) => "bool",
            FieldValue::Text(_) => "text",
            FieldValue::Files(_) => "files",
            FieldValue::Date(_) => "date",
            FieldValue::Other(_) => "other",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl From<Vec<FileRef>> for FieldValue {
    fn from(files: Vec<FileRef>) -> Self {
        FieldValue::Files(files)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Empty)
    }
}

/// Build a record from `(name, value)` pairs
pub fn record<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
