//! Form controller and submit lifecycle
//!
//! ```text
//!            submit() [invalid]
//!          ┌───────────────┐
//!          ▼               │
//!   ┌──► Idle ──submit()──►┴─[valid]──► Submitting ──ok──► Succeeded ──► navigate
//!   │                                       │
//!   │                                       └──err──► Failed (sanitized message)
//!   └──────────── submit() from Failed / Succeeded ─────────┘
//! ```
//!
//! The state lives behind a mutex that is never held across an await, so
//! `submit(&self)` may be polled concurrently: a call made while another is
//! in flight returns [`SubmitOutcome::Ignored`] without touching the action.

use crate::catalogue::FormDefinition;
use crate::error::{FailureKind, FormError, Result, SubmissionError, SubmissionFailure};
use crate::field::FieldDescriptor;
use crate::render::{render, submit_control, ChangeEvent, RenderContext, RenderedField, SubmitControl};
use async_trait::async_trait;
use carepulse_common::{Clock, FieldValue, Record, ResourceId};
use carepulse_validation::{FieldErrorList, SchemaId, ValidatedRecord, ValidationSchema};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

/// Backend call that persists a validated record
#[async_trait]
pub trait SubmissionAction: Send + Sync {
    async fn create_resource(
        &self,
        record: &ValidatedRecord,
    ) -> std::result::Result<ResourceId, SubmissionError>;
}

/// Route change after a successful submission
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Submission status of one form instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Succeeded { id: ResourceId },
    Failed { failure: SubmissionFailure },
}

/// Result of one `submit()` call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent
    Invalid(FieldErrorList),
    /// Another submission was already in flight
    Ignored,
    /// Backend created the resource
    Succeeded(ResourceId),
    /// Backend failed; message is safe to display
    Failed(SubmissionFailure),
}

/// When field changes trigger validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Only on submit; after the first attempt every change revalidates
    #[default]
    OnSubmit,
    /// On every change from the start
    OnChange,
}

#[derive(Debug)]
struct FormState {
    values: Record,
    errors: BTreeMap<String, String>,
    dirty: BTreeSet<String>,
    status: SubmitStatus,
    submit_attempted: bool,
}

/// Owns the state of one form instance
pub struct FormController {
    definition: FormDefinition,
    action: Arc<dyn SubmissionAction>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    mode: ValidationMode,
    initial: Record,
    state: Mutex<FormState>,
}

impl FormController {
    /// Build a controller for `definition`.
    ///
    /// Fails if a descriptor or default names a field the schema does not
    /// know, or if two descriptors share a name.
    pub fn new(
        definition: FormDefinition,
        action: Arc<dyn SubmissionAction>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let schema = definition.schema.schema();

        let mut seen = HashSet::new();
        for field in &definition.fields {
            ensure_known(schema, &field.name)?;
            if !seen.insert(field.name.as_str()) {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
        }
        for name in definition.defaults.keys() {
            ensure_known(schema, name)?;
        }

        let initial: Record = definition
            .defaults
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            state: Mutex::new(FormState {
                values: initial.clone(),
                errors: BTreeMap::new(),
                dirty: BTreeSet::new(),
                status: SubmitStatus::Idle,
                submit_attempted: false,
            }),
            definition,
            action,
            navigator,
            clock,
            mode: ValidationMode::default(),
            initial,
        })
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn schema_id(&self) -> SchemaId {
        self.definition.schema
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    fn schema(&self) -> &'static ValidationSchema {
        self.definition.schema.schema()
    }

    /// Apply a change event from the renderer
    pub fn apply(&self, event: ChangeEvent) -> Result<()> {
        self.set_value(&event.field, event.value)
    }

    /// Set one field. Changes are applied in call order.
    pub fn set_value(&self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let schema = self.schema();
        ensure_known(schema, field)?;
        let value = value.into();

        let mut st = self.state.lock();
        if value.is_empty() {
            st.values.remove(field);
        } else {
            st.values.insert(field.to_string(), value);
        }

        if st.values.get(field) != self.initial.get(field) {
            st.dirty.insert(field.to_string());
        } else {
            st.dirty.remove(field);
        }

        if self.mode == ValidationMode::OnChange || st.submit_attempted {
            let result = schema.validate(&st.values, self.clock.as_ref());
            st.errors = errors_of(&result);
        }
        Ok(())
    }

    /// Current value of `field`
    pub fn value(&self, field: &str) -> FieldValue {
        self.state
            .lock()
            .values
            .get(field)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of all current values
    pub fn values(&self) -> Record {
        self.state.lock().values.clone()
    }

    /// Displayed validation message for `field`
    pub fn error_for(&self, field: &str) -> Option<String> {
        self.state.lock().errors.get(field).cloned()
    }

    /// All displayed validation messages
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.state.lock().errors.clone()
    }

    /// True when `field` differs from its initial value
    pub fn is_dirty(&self, field: &str) -> bool {
        self.state.lock().dirty.contains(field)
    }

    pub fn status(&self) -> SubmitStatus {
        self.state.lock().status.clone()
    }

    /// Sanitized message of the last failed submission
    pub fn submit_error(&self) -> Option<String> {
        match &self.state.lock().status {
            SubmitStatus::Failed { failure } => Some(failure.message.clone()),
            _ => None,
        }
    }

    /// The host must disable the submit trigger while this is true
    pub fn is_submit_disabled(&self) -> bool {
        matches!(self.state.lock().status, SubmitStatus::Submitting)
    }

    /// Submit button for the current status
    pub fn submit_control(&self) -> SubmitControl {
        submit_control(&self.status(), self.definition.submit_label.clone())
    }

    /// Full validation pass over the current values; replaces every
    /// displayed error
    pub fn validate(&self) -> std::result::Result<ValidatedRecord, FieldErrorList> {
        let mut st = self.state.lock();
        let result = self.schema().validate(&st.values, self.clock.as_ref());
        st.errors = errors_of(&result);
        result
    }

    /// Render every descriptor with its current value and error
    pub fn render_fields(&self, ctx: &RenderContext) -> Vec<RenderedField> {
        let (values, errors) = {
            let st = self.state.lock();
            (st.values.clone(), st.errors.clone())
        };
        let empty = FieldValue::Empty;

        self.definition
            .fields
            .iter()
            .filter_map(|d: &FieldDescriptor| {
                let value = values.get(&d.name).unwrap_or(&empty);
                render(d, value, ctx).map(|r| r.with_error(errors.get(&d.name).cloned()))
            })
            .collect()
    }

    /// Validate, then hand the record to the submission action.
    ///
    /// The values are snapshotted when this is called; changes made while
    /// the action runs do not reach the record already sent.
    pub async fn submit(&self) -> SubmitOutcome {
        let record = {
            let mut st = self.state.lock();
            if matches!(st.status, SubmitStatus::Submitting) {
                tracing::debug!(schema = %self.schema_id(), "submit ignored, already submitting");
                return SubmitOutcome::Ignored;
            }
            st.submit_attempted = true;

            match self.schema().validate(&st.values, self.clock.as_ref()) {
                Err(errors) => {
                    st.errors = errors.to_map();
                    st.status = SubmitStatus::Idle;
                    tracing::debug!(
                        schema = %self.schema_id(),
                        invalid = errors.len(),
                        "submit blocked by validation"
                    );
                    return SubmitOutcome::Invalid(errors);
                }
                Ok(record) => {
                    st.errors.clear();
                    st.status = SubmitStatus::Submitting;
                    record
                }
            }
        };

        tracing::debug!(schema = %self.schema_id(), "submitting");
        let in_flight = InFlight {
            state: &self.state,
            schema: self.schema_id(),
            settled: false,
        };
        match self.action.create_resource(&record).await {
            Ok(id) => {
                in_flight.settle(SubmitStatus::Succeeded { id: id.clone() });
                let path = self.definition.redirect.resolve(&id);
                tracing::info!(schema = %self.schema_id(), id = %id, path = %path, "submission succeeded");
                self.navigator.go_to(&path);
                SubmitOutcome::Succeeded(id)
            }
            Err(err) => {
                let failure = SubmissionFailure::from(&err);
                tracing::warn!(
                    schema = %self.schema_id(),
                    kind = ?failure.kind,
                    error = %err,
                    "submission failed"
                );
                in_flight.settle(SubmitStatus::Failed {
                    failure: failure.clone(),
                });
                SubmitOutcome::Failed(failure)
            }
        }
    }

    /// Back to the initial values and Idle. Refused while submitting.
    pub fn reset(&self) -> bool {
        let mut st = self.state.lock();
        if matches!(st.status, SubmitStatus::Submitting) {
            return false;
        }
        st.values = self.initial.clone();
        st.errors.clear();
        st.dirty.clear();
        st.status = SubmitStatus::Idle;
        st.submit_attempted = false;
        true
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("schema", &self.definition.schema)
            .field("mode", &self.mode)
            .field("state", &*self.state.lock())
            .finish()
    }
}

/// Leaves `Submitting` even when the submit future is dropped mid-flight
struct InFlight<'a> {
    state: &'a Mutex<FormState>,
    schema: SchemaId,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, status: SubmitStatus) {
        self.state.lock().status = status;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!(schema = %self.schema, "submission abandoned before it resolved");
        self.state.lock().status = SubmitStatus::Failed {
            failure: SubmissionFailure::from(FailureKind::Unexpected),
        };
    }
}

fn ensure_known(schema: &ValidationSchema, field: &str) -> Result<()> {
    if schema.contains(field) {
        Ok(())
    } else {
        Err(FormError::UnknownField {
            field: field.to_string(),
            schema: schema.id().to_string(),
        })
    }
}

fn errors_of(
    result: &std::result::Result<ValidatedRecord, FieldErrorList>,
) -> BTreeMap<String, String> {
    match result {
        Ok(_) => BTreeMap::new(),
        Err(errors) => errors.to_map(),
    }
}
