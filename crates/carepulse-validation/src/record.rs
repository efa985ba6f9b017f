//! Validated records and typed views over them

use crate::SchemaId;
use carepulse_common::{FieldValue, Record};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Record that passed every rule of its schema.
///
/// Holds only schema fields, already normalized. Serializes as the plain
/// field map.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    schema: SchemaId,
    values: Record,
}

impl ValidatedRecord {
    pub(crate) fn new(schema: SchemaId, values: Record) -> Self {
        Self { schema, values }
    }

    /// Schema the record was validated against
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Raw value of `field`
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text value of `field`
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Boolean value of `field`
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Date value of `field`
    pub fn date(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_date)
    }

    /// Borrow the field map
    pub fn as_record(&self) -> &Record {
        &self.values
    }

    /// Take the field map
    pub fn into_record(self) -> Record {
        self.values
    }
}

impl Serialize for ValidatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Typed view conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypedRecordError {
    /// Record came from a different schema
    #[error("expected a {expected} record, got {actual}")]
    WrongSchema {
        /// Schema the view needs
        expected: &'static str,
        /// Schema the record carries
        actual: SchemaId,
    },

    /// Field absent (only possible for hand-built records)
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

fn required_text(record: &ValidatedRecord, field: &'static str) -> Result<String, TypedRecordError> {
    record
        .text(field)
        .map(str::to_string)
        .ok_or(TypedRecordError::MissingField(field))
}

/// Basic registration: who is signing up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    /// Full legal name
    pub name: String,
    /// Lower-cased email
    pub email: String,
    /// E.164 phone number
    pub phone: String,
}

impl TryFrom<&ValidatedRecord> for NewUser {
    type Error = TypedRecordError;

    fn try_from(record: &ValidatedRecord) -> Result<Self, Self::Error> {
        // The patient schema carries the same identity fields.
        if !matches!(record.schema(), SchemaId::User | SchemaId::Patient) {
            return Err(TypedRecordError::WrongSchema {
                expected: "user",
                actual: record.schema(),
            });
        }
        Ok(Self {
            name: required_text(record, "name")?,
            email: required_text(record, "email")?,
            phone: required_text(record, "phone")?,
        })
    }
}

/// Appointment booking, rescheduling or cancellation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    /// Which appointment schema produced this request
    pub kind: SchemaId,
    /// Selected provider
    pub primary_physician: String,
    /// Requested slot
    pub schedule: Option<DateTime<Utc>>,
    /// Reason for the visit
    pub reason: Option<String>,
    /// Free-form note
    pub note: Option<String>,
    /// Why the appointment is being cancelled
    pub cancellation_reason: Option<String>,
}

impl TryFrom<&ValidatedRecord> for AppointmentRequest {
    type Error = TypedRecordError;

    fn try_from(record: &ValidatedRecord) -> Result<Self, Self::Error> {
        if !record.schema().is_appointment() {
            return Err(TypedRecordError::WrongSchema {
                expected: "appointment",
                actual: record.schema(),
            });
        }
        let text = |f: &str| record.text(f).map(str::to_string);
        Ok(Self {
            kind: record.schema(),
            primary_physician: required_text(record, "primaryPhysician")?,
            schedule: record.date("schedule"),
            reason: text("reason"),
            note: text("note"),
            cancellation_reason: text("cancellationReason"),
        })
    }
}
