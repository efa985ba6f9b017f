//! Field descriptors
//!
//! A descriptor is the declarative metadata of one input. It is fixed once a
//! form is built; the renderer and the controller only read it.

use carepulse_common::Region;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed set of input kinds.
///
/// Tags written by schema authors that this build does not know deserialize
/// to [`FieldType::Unknown`], which renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// Single-line text
    #[serde(alias = "input")]
    Text,
    /// Multi-line text
    #[serde(alias = "textarea")]
    TextArea,
    /// Phone number with country selection
    #[serde(alias = "phoneInput")]
    Phone,
    /// Boolean checkbox with inline label
    Checkbox,
    /// Date (optionally time) picker
    #[serde(alias = "datePicker")]
    Date,
    /// Single choice from options
    Select,
    /// Host-provided widget (radio groups, uploaders)
    #[serde(alias = "skeleton")]
    Custom,
    /// Anything else
    #[serde(other)]
    Unknown,
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let quoted = serde_json::Value::String(s.to_string());
        Ok(serde_json::from_value(quoted).unwrap_or(FieldType::Unknown))
    }
}

/// Option of a select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Option whose label equals its value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Leading icon of a text input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Asset path
    pub src: String,
    /// Alternative text
    pub alt: String,
}

/// Date picker bound, relative to "now" at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateBound {
    /// The current instant
    Now,
    /// The current instant shifted by some minutes
    FromNow {
        /// Offset in minutes (negative is the past)
        minutes: i64,
    },
}

impl DateBound {
    /// Concrete instant for `now`
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DateBound::Now => now,
            DateBound::FromNow { minutes } => now + Duration::minutes(*minutes),
        }
    }
}

/// Date picker options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateOptions {
    /// Offer a time selector as well
    pub show_time: bool,
    /// Display format override
    pub format: Option<String>,
    /// Latest selectable instant
    pub max: Option<DateBound>,
    /// Earliest selectable instant
    pub min: Option<DateBound>,
}

/// Declarative metadata for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key within a form
    pub name: String,
    /// Input kind
    pub field_type: FieldType,
    /// Visible label
    #[serde(default)]
    pub label: Option<String>,
    /// Placeholder text
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Help text under the control
    #[serde(default)]
    pub description: Option<String>,
    /// Leading icon
    #[serde(default)]
    pub icon: Option<Icon>,
    /// Marked as required
    #[serde(default)]
    pub required: bool,
    /// Read-only
    #[serde(default)]
    pub disabled: bool,
    /// Select options
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// Date picker options
    #[serde(default)]
    pub date: DateOptions,
    /// Phone region override
    #[serde(default)]
    pub region: Option<Region>,
}

impl FieldDescriptor {
    /// New descriptor with no decoration
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            placeholder: None,
            description: None,
            icon: None,
            required: false,
            disabled: false,
            options: Vec::new(),
            date: DateOptions::default(),
            region: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn icon(mut self, src: impl Into<String>, alt: impl Into<String>) -> Self {
        self.icon = Some(Icon {
            src: src.into(),
            alt: alt.into(),
        });
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(SelectOption::plain).collect();
        self
    }

    /// No date later than now (birth dates)
    pub fn not_after_now(mut self) -> Self {
        self.date.max = Some(DateBound::Now);
        self
    }

    /// No date earlier than now (appointment slots)
    pub fn not_before_now(mut self) -> Self {
        self.date.min = Some(DateBound::Now);
        self
    }

    pub fn show_time(mut self) -> Self {
        self.date.show_time = true;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date.format = Some(format.into());
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Element id of the control
    pub fn input_id(&self) -> String {
        format!("{}-input", self.name)
    }

    /// Element id of the help text, when there is one
    pub fn description_id(&self) -> Option<String> {
        self.description
            .as_ref()
            .map(|_| format!("{}-description", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_tags() {
        assert_eq!("input".parse::<FieldType>().unwrap(), FieldType::Text);
        assert_eq!("phoneInput".parse::<FieldType>().unwrap(), FieldType::Phone);
        assert_eq!("datePicker".parse::<FieldType>().unwrap(), FieldType::Date);
        assert_eq!("skeleton".parse::<FieldType>().unwrap(), FieldType::Custom);
        assert_eq!("textArea".parse::<FieldType>().unwrap(), FieldType::TextArea);
        assert_eq!("signaturePad".parse::<FieldType>().unwrap(), FieldType::Unknown);
    }

    #[test]
    fn test_descriptor_from_json() {
        let d: FieldDescriptor = serde_json::from_str(
            r#"{"name": "birthDate", "fieldType": "datePicker", "required": true, "date": {"max": "now"}}"#,
        )
        .unwrap();

        assert_eq!(d.field_type, FieldType::Date);
        assert_eq!(d.date.max, Some(DateBound::Now));
        assert_eq!(d.input_id(), "birthDate-input");
        assert_eq!(d.description_id(), None);
    }

    #[test]
    fn test_bound_resolution() {
        let now = Utc::now();
        assert_eq!(DateBound::Now.resolve(now), now);
        assert_eq!(
            DateBound::FromNow { minutes: 30 }.resolve(now),
            now + Duration::minutes(30)
        );
    }
}
