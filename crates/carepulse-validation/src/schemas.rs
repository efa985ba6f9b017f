//! The schema set
//!
//! Five variants, each an ordered list of field rules built from the shared
//! fragments. Schemas are built once and shared.

use crate::error::{FieldError, FieldErrorList};
use crate::fragments::{
    bounded_text, consent, contact_phone, email, optional_text, person_name, phone, selection,
    POLICY_NUMBER_RE,
};
use crate::record::ValidatedRecord;
use crate::rule::{Check, FieldRule};
use crate::SchemaId;
use carepulse_common::{Clock, Record};
use chrono::{TimeZone, Utc};
use std::sync::LazyLock;

/// Ordered set of field rules for one form purpose
#[derive(Debug, Clone)]
pub struct ValidationSchema {
    id: SchemaId,
    rules: Vec<FieldRule>,
}

impl ValidationSchema {
    /// Build schema from rules in display order
    pub fn new(id: SchemaId, rules: Vec<FieldRule>) -> Self {
        Self { id, rules }
    }

    /// Schema identity
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Rules in order
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Rule for `field`
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.name() == field)
    }

    /// True when `field` belongs to this schema
    pub fn contains(&self, field: &str) -> bool {
        self.rule(field).is_some()
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// Run every rule against `record`.
    ///
    /// All fields are evaluated; the error list holds one entry per failing
    /// field. Keys the schema does not know are dropped from the output.
    pub fn validate(
        &self,
        record: &Record,
        clock: &dyn Clock,
    ) -> Result<ValidatedRecord, FieldErrorList> {
        let now = clock.now();
        let mut values = Record::new();
        let mut errors = FieldErrorList::new();

        for rule in &self.rules {
            match rule.apply(record.get(rule.name()), now) {
                Ok(Some(value)) => {
                    values.insert(rule.name().to_string(), value);
                }
                Ok(None) => {}
                Err(message) => errors.push(FieldError::new(rule.name(), message)),
            }
        }

        let dropped = record.keys().filter(|k| !self.contains(k)).count();
        tracing::debug!(
            schema = %self.id,
            fields = self.rules.len(),
            invalid = errors.len(),
            dropped,
            "validation pass"
        );

        if errors.is_empty() {
            Ok(ValidatedRecord::new(self.id, values))
        } else {
            Err(errors)
        }
    }
}

static USER: LazyLock<ValidationSchema> = LazyLock::new(user_schema);
static PATIENT: LazyLock<ValidationSchema> = LazyLock::new(patient_schema);
static CREATE_APPOINTMENT: LazyLock<ValidationSchema> = LazyLock::new(create_appointment_schema);
static SCHEDULE_APPOINTMENT: LazyLock<ValidationSchema> =
    LazyLock::new(schedule_appointment_schema);
static CANCEL_APPOINTMENT: LazyLock<ValidationSchema> = LazyLock::new(cancel_appointment_schema);

/// Shared instance for `id`
pub fn schema(id: SchemaId) -> &'static ValidationSchema {
    match id {
        SchemaId::User => &*USER,
        SchemaId::Patient => &*PATIENT,
        SchemaId::CreateAppointment => &*CREATE_APPOINTMENT,
        SchemaId::ScheduleAppointment => &*SCHEDULE_APPOINTMENT,
        SchemaId::CancelAppointment => &*CANCEL_APPOINTMENT,
    }
}

fn identity_rules() -> [FieldRule; 3] {
    [
        person_name(
            "name",
            "Full name must be at least 2 characters",
            "Full name must be less than 100 characters",
        ),
        email("email"),
        phone("phone"),
    ]
}

fn user_schema() -> ValidationSchema {
    ValidationSchema::new(SchemaId::User, identity_rules().into())
}

fn patient_schema() -> ValidationSchema {
    let earliest_birth = Utc
        .with_ymd_and_hms(1900, 1, 1, 0, 0, 0)
        .single()
        .expect("1900-01-01 is a valid UTC instant");

    let birth_date = FieldRule::date("birthDate")
        .required("Date of birth is required")
        .invalid("Please enter a valid date")
        .check(Check::NotBefore(earliest_birth), "Please enter a valid birth year")
        .check(Check::NotAfterNow, "Birth date cannot be in the future");

    let mut rules: Vec<FieldRule> = identity_rules().into();
    rules.extend([
        birth_date,
        FieldRule::text("gender")
            .required("Please select your gender")
            .invalid("Please select your gender")
            .check(Check::OneOf(&["Male", "Female", "Other"]), "Please select your gender"),
        bounded_text(
            "address",
            (10, "Address must be at least 10 characters"),
            (500, "Address must be less than 500 characters"),
        ),
        bounded_text(
            "occupation",
            (2, "Occupation must be at least 2 characters"),
            (100, "Occupation must be less than 100 characters"),
        ),
        person_name(
            "emergencyContactName",
            "Emergency contact name must be at least 2 characters",
            "Emergency contact name must be less than 100 characters",
        ),
        contact_phone(
            "emergencyContactNumber",
            "Please enter a valid emergency contact number",
        ),
        selection("primaryPhysician", "Please select a primary care physician"),
        bounded_text(
            "insuranceProvider",
            (2, "Insurance provider name must be at least 2 characters"),
            (100, "Insurance provider name must be less than 100 characters"),
        ),
        bounded_text(
            "insurancePolicyNumber",
            (2, "Policy number must be at least 2 characters"),
            (50, "Policy number must be less than 50 characters"),
        )
        .pattern(
            &POLICY_NUMBER_RE,
            "Policy number can only contain letters, numbers, and hyphens",
        ),
        optional_text(
            "allergies",
            1000,
            "Allergies description must be less than 1000 characters",
        ),
        optional_text(
            "currentMedication",
            1000,
            "Current medications must be less than 1000 characters",
        ),
        optional_text(
            "familyMedicalHistory",
            2000,
            "Family medical history must be less than 2000 characters",
        ),
        optional_text(
            "pastMedicalHistory",
            2000,
            "Past medical history must be less than 2000 characters",
        ),
        FieldRule::text("identificationType").optional(),
        FieldRule::text("identificationNumber").optional(),
        FieldRule::files("identificationDocument").optional(),
        consent(
            "treatmentConsent",
            "Treatment consent is required to proceed",
            "You must consent to treatment to proceed with registration",
        ),
        consent(
            "disclosureConsent",
            "Information disclosure consent is required",
            "You must consent to information disclosure to proceed",
        ),
        consent(
            "privacyConsent",
            "Privacy policy consent is required",
            "You must acknowledge our privacy policy to proceed",
        ),
    ]);

    ValidationSchema::new(SchemaId::Patient, rules)
}

fn create_appointment_schema() -> ValidationSchema {
    ValidationSchema::new(
        SchemaId::CreateAppointment,
        vec![
            selection("primaryPhysician", "Please select a healthcare provider"),
            FieldRule::date("schedule")
                .required("Please select an appointment date and time")
                .invalid("Please enter a valid date and time")
                .check(Check::AfterNow, "Appointment must be scheduled for a future date"),
            bounded_text(
                "reason",
                (
                    10,
                    "Please provide at least 10 characters describing your appointment reason",
                ),
                (500, "Appointment reason must be less than 500 characters"),
            )
            .required("Please provide a reason for your appointment"),
            optional_text("note", 1000, "Additional notes must be less than 1000 characters"),
            FieldRule::text("cancellationReason").optional(),
        ],
    )
}

fn schedule_appointment_schema() -> ValidationSchema {
    ValidationSchema::new(
        SchemaId::ScheduleAppointment,
        vec![
            selection("primaryPhysician", "Please select a healthcare provider"),
            FieldRule::date("schedule").optional(),
            optional_text("reason", 500, "Reason must be less than 500 characters"),
            optional_text("note", 1000, "Notes must be less than 1000 characters"),
            FieldRule::text("cancellationReason").optional(),
        ],
    )
}

fn cancel_appointment_schema() -> ValidationSchema {
    ValidationSchema::new(
        SchemaId::CancelAppointment,
        vec![
            selection("primaryPhysician", "Healthcare provider is required"),
            FieldRule::date("schedule")
                .required("Please select an appointment date and time")
                .invalid("Please enter a valid date and time"),
            FieldRule::text("reason").optional(),
            FieldRule::text("note").optional(),
            bounded_text(
                "cancellationReason",
                (
                    10,
                    "Please provide at least 10 characters explaining the cancellation",
                ),
                (500, "Cancellation reason must be less than 500 characters"),
            )
            .required("Cancellation reason is required"),
        ],
    )
}
