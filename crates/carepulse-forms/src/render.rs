//! Field renderer dispatch
//!
//! [`render`] maps a descriptor and its current value to a concrete
//! [`Control`] plus the accessibility wiring the host needs to emit markup.
//! One arm per [`FieldType`]; `Unknown` renders nothing.
//!
//! Everything here is a pure function of the descriptor, the value and the
//! [`RenderContext`]; no sibling field is ever consulted.

use crate::controller::SubmitStatus;
use crate::field::{FieldDescriptor, FieldType, Icon, SelectOption};
use carepulse_common::{Clock, FieldValue, Region};
use carepulse_validation::rule::parse_date;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Default date display format
pub const DEFAULT_DATE_FORMAT: &str = "MM/dd/yyyy";

/// Renderer for [`FieldType::Custom`] fields, keyed by field name in the context
pub type CustomRenderer =
    Arc<dyn Fn(&FieldDescriptor, &FieldValue) -> Option<serde_json::Value> + Send + Sync>;

/// Concrete control handed to the host UI
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum Control {
    TextInput {
        value: String,
        placeholder: Option<String>,
        icon: Option<Icon>,
        disabled: bool,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
        rows: u8,
        disabled: bool,
    },
    PhoneInput {
        value: String,
        placeholder: Option<String>,
        default_region: Region,
        /// Explicit `+<country code>` entry is always accepted
        international: bool,
        disabled: bool,
    },
    Checkbox {
        checked: bool,
        label: Option<String>,
        disabled: bool,
    },
    DatePicker {
        selected: Option<DateTime<Utc>>,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
        show_time: bool,
        format: String,
        disabled: bool,
    },
    Select {
        options: Vec<SelectOption>,
        selected: Option<String>,
        placeholder: Option<String>,
        disabled: bool,
    },
    Custom {
        props: serde_json::Value,
    },
}

/// Accessibility wiring derived from the descriptor alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    pub input_id: String,
    /// Target of the visible `<label for=..>`; checkboxes carry their label inline
    pub label_for: Option<String>,
    pub described_by: Option<String>,
    pub aria_required: bool,
    pub aria_label: Option<String>,
    pub autocomplete: &'static str,
}

/// Output of [`render`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub name: String,
    pub label: Option<String>,
    /// Show the required asterisk next to the label
    pub required_marker: bool,
    pub description: Option<String>,
    pub control: Control,
    pub a11y: Accessibility,
    pub error: Option<String>,
}

impl RenderedField {
    /// Change event for a new raw value of this field
    pub fn change(&self, value: impl Into<FieldValue>) -> ChangeEvent {
        ChangeEvent {
            field: self.name.clone(),
            value: value.into(),
        }
    }

    /// Attach the current validation message
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

/// Value change emitted by a control, keyed by field name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub field: String,
    pub value: FieldValue,
}

impl ChangeEvent {
    pub fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Ambient inputs of the renderer
#[derive(Clone)]
pub struct RenderContext {
    clock: Arc<dyn Clock>,
    default_region: Region,
    date_format: String,
    custom: HashMap<String, CustomRenderer>,
}

impl RenderContext {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            default_region: Region::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            custom: HashMap::new(),
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.default_region = region;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Register the widget used for a custom field
    pub fn with_custom(mut self, field: impl Into<String>, renderer: CustomRenderer) -> Self {
        self.custom.insert(field.into(), renderer);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("default_region", &self.default_region)
            .field("date_format", &self.date_format)
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Render one field. `None` means "render nothing".
pub fn render(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    ctx: &RenderContext,
) -> Option<RenderedField> {
    let d = descriptor;
    let control = match d.field_type {
        FieldType::Text => Control::TextInput {
            value: text_of(value),
            placeholder: d.placeholder.clone(),
            icon: d.icon.clone(),
            disabled: d.disabled,
        },
        FieldType::TextArea => Control::TextArea {
            value: text_of(value),
            placeholder: d.placeholder.clone(),
            rows: if d.name.to_ascii_lowercase().contains("history") { 4 } else { 3 },
            disabled: d.disabled,
        },
        FieldType::Phone => Control::PhoneInput {
            value: text_of(value),
            placeholder: d.placeholder.clone(),
            default_region: d.region.clone().unwrap_or_else(|| ctx.default_region.clone()),
            international: true,
            disabled: d.disabled,
        },
        FieldType::Checkbox => Control::Checkbox {
            checked: value.as_bool().unwrap_or(false),
            label: d.label.clone(),
            disabled: d.disabled,
        },
        FieldType::Date => {
            let now = ctx.now();
            Control::DatePicker {
                selected: date_of(value),
                min: d.date.min.map(|b| b.resolve(now)),
                max: d.date.max.map(|b| b.resolve(now)),
                show_time: d.date.show_time,
                format: d.date.format.clone().unwrap_or_else(|| ctx.date_format.clone()),
                disabled: d.disabled,
            }
        }
        FieldType::Select => Control::Select {
            options: d.options.clone(),
            selected: value.as_text().filter(|s| !s.is_empty()).map(str::to_string),
            placeholder: d.placeholder.clone(),
            disabled: d.disabled,
        },
        FieldType::Custom => {
            let renderer = ctx.custom.get(&d.name)?;
            Control::Custom {
                props: renderer(d, value)?,
            }
        }
        FieldType::Unknown => return None,
    };

    Some(RenderedField {
        name: d.name.clone(),
        label: match d.field_type {
            FieldType::Checkbox => None,
            _ => d.label.clone(),
        },
        required_marker: d.required && d.label.is_some() && d.field_type != FieldType::Checkbox,
        description: d.description.clone(),
        control,
        a11y: accessibility(d),
        error: None,
    })
}

fn accessibility(d: &FieldDescriptor) -> Accessibility {
    let input_id = d.input_id();
    let aria_label = match d.field_type {
        FieldType::Phone => Some("Phone number input with country selection".to_string()),
        FieldType::Date => Some(format!(
            "Select {}",
            d.label.as_deref().unwrap_or("date")
        )),
        _ => None,
    };

    Accessibility {
        label_for: (d.field_type != FieldType::Checkbox && d.label.is_some())
            .then(|| input_id.clone()),
        input_id,
        described_by: d.description_id(),
        aria_required: d.required,
        aria_label,
        autocomplete: autocomplete_for(&d.name),
    }
}

/// Browser autofill token for well-known field names
pub fn autocomplete_for(field: &str) -> &'static str {
    match field {
        "name" | "emergencyContactName" => "name",
        "email" => "email",
        "phone" | "emergencyContactNumber" => "tel",
        "address" => "street-address",
        "birthDate" => "bday",
        _ => "off",
    }
}

fn text_of(value: &FieldValue) -> String {
    value.as_text().unwrap_or_default().to_string()
}

fn date_of(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Date(d) => Some(*d),
        FieldValue::Text(s) => parse_date(s),
        _ => None,
    }
}

/// Submit button state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitControl {
    pub label: String,
    pub loading_text: String,
    pub disabled: bool,
    pub busy: bool,
    pub described_by: Option<String>,
}

/// Submit button for the given status: disabled and busy while submitting
pub fn submit_control(status: &SubmitStatus, label: impl Into<String>) -> SubmitControl {
    let busy = matches!(status, SubmitStatus::Submitting);
    SubmitControl {
        label: label.into(),
        loading_text: "Processing...".into(),
        disabled: busy,
        busy,
        described_by: busy.then(|| "loading-description".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepulse_common::ManualClock;
    use chrono::{Duration, TimeZone};

    fn ctx() -> (Arc<ManualClock>, RenderContext) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
        ));
        let ctx = RenderContext::new(clock.clone());
        (clock, ctx)
    }

    #[test]
    fn test_text_input_wiring() {
        let (_, ctx) = ctx();
        let d = FieldDescriptor::new("email", FieldType::Text)
            .label("Email Address")
            .description("We never share it")
            .required();

        let r = render(&d, &"jane@x.com".into(), &ctx).unwrap();
        assert!(matches!(&r.control, Control::TextInput { value, .. } if value == "jane@x.com"));
        assert_eq!(r.a11y.input_id, "email-input");
        assert_eq!(r.a11y.label_for.as_deref(), Some("email-input"));
        assert_eq!(r.a11y.described_by.as_deref(), Some("email-description"));
        assert!(r.a11y.aria_required);
        assert_eq!(r.a11y.autocomplete, "email");
        assert!(r.required_marker);
    }

    #[test]
    fn test_checkbox_label_is_inline() {
        let (_, ctx) = ctx();
        let d = FieldDescriptor::new("privacyConsent", FieldType::Checkbox)
            .label("I agree to the privacy policy");

        let r = render(&d, &FieldValue::Empty, &ctx).unwrap();
        assert_eq!(r.label, None);
        assert_eq!(r.a11y.label_for, None);
        assert!(matches!(
            r.control,
            Control::Checkbox { checked: false, label: Some(_), .. }
        ));
    }

    #[test]
    fn test_unknown_renders_nothing() {
        let (_, ctx) = ctx();
        let d = FieldDescriptor::new("signature", FieldType::Unknown);
        assert!(render(&d, &FieldValue::Empty, &ctx).is_none());
    }

    #[test]
    fn test_custom_without_renderer_renders_nothing() {
        let (_, ctx) = ctx();
        let d = FieldDescriptor::new("gender", FieldType::Custom);
        assert!(render(&d, &FieldValue::Empty, &ctx).is_none());

        let renderer: CustomRenderer =
            Arc::new(|_: &FieldDescriptor, v: &FieldValue| {
                Some(serde_json::json!({ "radio": v.as_text() }))
            });
        let ctx = ctx.with_custom("gender", renderer);
        let r = render(&d, &"Other".into(), &ctx).unwrap();
        assert_eq!(
            r.control,
            Control::Custom { props: serde_json::json!({ "radio": "Other" }) }
        );
    }

    #[test]
    fn test_date_bounds_follow_clock() {
        let (clock, ctx) = ctx();
        let d = FieldDescriptor::new("birthDate", FieldType::Date).not_after_now();

        let first = render(&d, &"1990-01-01".into(), &ctx).unwrap();
        clock.advance(Duration::days(1));
        let second = render(&d, &"1990-01-01".into(), &ctx).unwrap();

        match (first.control, second.control) {
            (
                Control::DatePicker { max: Some(a), min: None, selected: Some(s), .. },
                Control::DatePicker { max: Some(b), .. },
            ) => {
                assert_eq!(b - a, Duration::days(1));
                assert_eq!(s, Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap());
            }
            other => panic!("unexpected controls: {other:?}"),
        }
        assert_eq!(second.a11y.autocomplete, "bday");
    }

    #[test]
    fn test_phone_region_default_and_override() {
        let (_, ctx) = ctx();
        let d = FieldDescriptor::new("phone", FieldType::Phone);
        let r = render(&d, &"+447700900123".into(), &ctx).unwrap();
        assert!(matches!(
            &r.control,
            Control::PhoneInput { default_region, international: true, .. } if default_region.as_str() == "US"
        ));

        let d = d.region(Region::new("GB").unwrap());
        let r = render(&d, &FieldValue::Empty, &ctx).unwrap();
        assert!(matches!(
            &r.control,
            Control::PhoneInput { default_region, .. } if default_region.as_str() == "GB"
        ));
    }

    #[test]
    fn test_textarea_rows() {
        let (_, ctx) = ctx();
        let rows = |name: &str| match render(
            &FieldDescriptor::new(name, FieldType::TextArea),
            &FieldValue::Empty,
            &ctx,
        )
        .map(|r| r.control)
        {
            Some(Control::TextArea { rows, .. }) => rows,
            _ => 0,
        };
        assert_eq!(rows("pastMedicalHistory"), 4);
        assert_eq!(rows("allergies"), 3);
    }

    #[test]
    fn test_change_event_keyed_by_name() {
        let (_, ctx) = ctx();
        let d = FieldDescriptor::new("name", FieldType::Text);
        let r = render(&d, &FieldValue::Empty, &ctx).unwrap();
        assert_eq!(r.change("Jane"), ChangeEvent::new("name", "Jane"));
    }

    #[test]
    fn test_submit_control_disabled_while_submitting() {
        let idle = submit_control(&SubmitStatus::Idle, "Get Started");
        let busy = submit_control(&SubmitStatus::Submitting, "Get Started");
        assert!(!idle.disabled && !idle.busy);
        assert!(busy.disabled && busy.busy);
        assert_eq!(busy.described_by.as_deref(), Some("loading-description"));
    }
}
