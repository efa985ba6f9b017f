//! CarePulse Validation - Declarative intake and appointment schemas
//!
//! Each form purpose has a schema: an ordered list of field rules. Running a
//! schema over a raw [`Record`] yields either a normalized
//! [`ValidatedRecord`] or a [`FieldErrorList`] naming every invalid field.
//!
//! ## Schemas
//! - `user`: landing form (name, email, phone)
//! - `patient`: full registration profile
//! - `create` / `schedule` / `cancel`: appointment variants, picked with
//!   [`appointment_schema`]
//!
//! ## Semantics
//! - Every field is evaluated; errors are never short-circuited across fields
//! - Within a field the first failing rule wins
//! - "Now" is read from the supplied [`Clock`] on every pass

#![warn(clippy::all)]

pub mod error;
pub mod fragments;
pub mod record;
pub mod rule;
pub mod schemas;

pub use error::*;
pub use record::*;
pub use rule::{Check, FieldRule, Presence, ValueKind};
pub use schemas::{schema, ValidationSchema};

use carepulse_common::{Clock, Record};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Form purpose, selecting the schema variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaId {
    /// Landing form
    User,
    /// Full patient registration
    Patient,
    /// New appointment (must be in the future)
    #[serde(rename = "create")]
    CreateAppointment,
    /// Reschedule / admin scheduling (relaxed)
    #[serde(rename = "schedule")]
    ScheduleAppointment,
    /// Cancellation (reason required)
    #[serde(rename = "cancel")]
    CancelAppointment,
}

impl SchemaId {
    /// All variants
    pub const ALL: [SchemaId; 5] = [
        SchemaId::User,
        SchemaId::Patient,
        SchemaId::CreateAppointment,
        SchemaId::ScheduleAppointment,
        SchemaId::CancelAppointment,
    ];

    /// Short name used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaId::User => "user",
            SchemaId::Patient => "patient",
            SchemaId::CreateAppointment => "create",
            SchemaId::ScheduleAppointment => "schedule",
            SchemaId::CancelAppointment => "cancel",
        }
    }

    /// True for the three appointment variants
    pub fn is_appointment(&self) -> bool {
        matches!(
            self,
            SchemaId::CreateAppointment | SchemaId::ScheduleAppointment | SchemaId::CancelAppointment
        )
    }

    /// Shared schema instance
    pub fn schema(&self) -> &'static ValidationSchema {
        schemas::schema(*self)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown schema: {s}"))
    }
}

/// Pick the appointment schema for a form-purpose discriminant.
///
/// `"create"` and `"cancel"` select their variants; anything else falls back
/// to the relaxed schedule schema.
pub fn appointment_schema(discriminant: &str) -> SchemaId {
    match discriminant {
        "create" => SchemaId::CreateAppointment,
        "cancel" => SchemaId::CancelAppointment,
        _ => SchemaId::ScheduleAppointment,
    }
}

/// Validate `record` against the schema `id`, reading "now" from `clock`
pub fn validate(
    id: SchemaId,
    record: &Record,
    clock: &dyn Clock,
) -> Result<ValidatedRecord, FieldErrorList> {
    id.schema().validate(record, clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepulse_common::{record, FieldValue, ManualClock};
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap())
    }

    fn user(name: &str, email: &str, phone: &str) -> Record {
        record([("name", name), ("email", email), ("phone", phone)])
    }

    fn valid_patient() -> Record {
        let mut rec = user("Jane Doe", "jane@example.com", "+15551230000");
        rec.extend(record([
            ("birthDate", FieldValue::from("1990-04-12")),
            ("gender", "Female".into()),
            ("address", "12 Main Street, Springfield".into()),
            ("occupation", "Engineer".into()),
            ("emergencyContactName", "John Doe".into()),
            ("emergencyContactNumber", "+15551239999".into()),
            ("primaryPhysician", "Dr. Green".into()),
            ("insuranceProvider", "BlueCross".into()),
            ("insurancePolicyNumber", "ABC-12345".into()),
            ("treatmentConsent", true.into()),
            ("disclosureConsent", true.into()),
            ("privacyConsent", true.into()),
        ]));
        rec
    }

    #[test]
    fn test_user_schema_normalizes_email() {
        let out = validate(
            SchemaId::User,
            &user("Jane Doe", "  Foo@Example.com ", "+15551234567"),
            &clock(),
        )
        .unwrap();

        assert_eq!(out.text("email"), Some("foo@example.com"));
        assert_eq!(out.text("name"), Some("Jane Doe"));
    }

    #[test]
    fn test_number_for_text_field_is_a_field_error() {
        let mut rec = user("Jane Doe", "jane@example.com", "");
        rec.insert(
            "phone".into(),
            FieldValue::Other(serde_json::json!(15551230000u64)),
        );

        let errors = validate(SchemaId::User, &rec, &clock()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("phone"), Some("Expected text"));
    }

    #[test]
    fn test_all_fields_reported() {
        let errors = validate(SchemaId::User, &user("J", "nope", "5551234567"), &clock())
            .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some("Full name must be at least 2 characters"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(
            errors.get("phone"),
            Some("Please enter a valid international phone number starting with +")
        );
        let order: Vec<_> = errors.fields().collect();
        assert_eq!(order, ["name", "email", "phone"]);
    }

    #[test]
    fn test_missing_fields_use_required_message() {
        let errors = validate(SchemaId::User, &Record::new(), &clock()).unwrap_err();
        assert!(errors.iter().all(|e| e.message == "Required"));
    }

    #[test]
    fn test_name_with_digit_fails_charset() {
        let errors = validate(SchemaId::User, &user("Jane 2", "a@b.co", "+15551234567"), &clock())
            .unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some("Name can only contain letters, spaces, hyphens, and apostrophes")
        );
    }

    #[test]
    fn test_phone_examples() {
        let c = clock();
        let ok = |p: &str| validate(SchemaId::User, &user("Jane", "a@b.co", p), &c).is_ok();
        assert!(ok("+15551234567"));
        assert!(!ok("5551234567"));
        assert!(!ok("+123"));
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let mut rec = user("Jane", "a@b.co", "+15551234567");
        rec.insert("isAdmin".into(), true.into());

        let out = validate(SchemaId::User, &rec, &clock()).unwrap();
        assert!(out.get("isAdmin").is_none());
        assert_eq!(out.as_record().len(), 3);
    }

    #[test]
    fn test_patient_valid() {
        let out = validate(SchemaId::Patient, &valid_patient(), &clock()).unwrap();
        assert_eq!(
            out.date("birthDate"),
            Some(Utc.with_ymd_and_hms(1990, 4, 12, 0, 0, 0).unwrap())
        );
        assert!(out.get("allergies").is_none());
    }

    #[test]
    fn test_birth_date_bounds() {
        let c = clock();
        let check = |d: &str| {
            let mut rec = valid_patient();
            rec.insert("birthDate".into(), d.into());
            validate(SchemaId::Patient, &rec, &c)
                .err()
                .and_then(|e| e.get("birthDate").map(str::to_string))
        };

        assert_eq!(check("2024-06-15"), None);
        assert_eq!(check("2024-06-16").as_deref(), Some("Birth date cannot be in the future"));
        assert_eq!(check("1899-12-31").as_deref(), Some("Please enter a valid birth year"));
        assert_eq!(check("1900-01-01"), None);
        assert_eq!(check("12/31/1990").as_deref(), Some("Please enter a valid date"));
    }

    #[test]
    fn test_now_is_read_at_validation_time() {
        let c = clock();
        let mut rec = valid_patient();
        rec.insert("birthDate".into(), "2024-06-15".into());
        assert!(validate(SchemaId::Patient, &rec, &c).is_ok());

        // Clock moved backwards after the form was loaded
        c.advance(Duration::days(-2));
        let errors = validate(SchemaId::Patient, &rec, &c).unwrap_err();
        assert_eq!(errors.get("birthDate"), Some("Birth date cannot be in the future"));
    }

    #[test]
    fn test_consent_messages() {
        let c = clock();
        let consent_error = |v: Option<bool>| {
            let mut rec = valid_patient();
            match v {
                Some(b) => rec.insert("treatmentConsent".into(), b.into()),
                None => rec.remove("treatmentConsent"),
            };
            validate(SchemaId::Patient, &rec, &c)
                .err()
                .and_then(|e| e.get("treatmentConsent").map(str::to_string))
        };

        assert_eq!(
            consent_error(Some(false)).as_deref(),
            Some("You must consent to treatment to proceed with registration")
        );
        assert_eq!(
            consent_error(None).as_deref(),
            Some("Treatment consent is required to proceed")
        );
        assert_eq!(consent_error(Some(true)), None);
    }

    #[test]
    fn test_optional_medical_bounds() {
        let c = clock();
        let mut rec = valid_patient();
        rec.insert("allergies".into(), "a".repeat(1000).into());
        rec.insert("pastMedicalHistory".into(), "b".repeat(2001).into());

        let errors = validate(SchemaId::Patient, &rec, &c).unwrap_err();
        assert!(!errors.contains("allergies"));
        assert_eq!(
            errors.get("pastMedicalHistory"),
            Some("Past medical history must be less than 2000 characters")
        );
    }

    #[test]
    fn test_policy_number_and_gender() {
        let mut rec = valid_patient();
        rec.insert("insurancePolicyNumber".into(), "AB 12".into());
        rec.insert("gender".into(), "Unknown".into());

        let errors = validate(SchemaId::Patient, &rec, &clock()).unwrap_err();
        assert_eq!(
            errors.get("insurancePolicyNumber"),
            Some("Policy number can only contain letters, numbers, and hyphens")
        );
        assert_eq!(errors.get("gender"), Some("Please select your gender"));
    }

    #[test]
    fn test_create_appointment_must_be_future() {
        let c = clock();
        let at = |offset: Duration| {
            let rec = record([
                ("primaryPhysician", FieldValue::from("Dr. Green")),
                ("schedule", FieldValue::Date(c.now() + offset)),
                ("reason", "Annual check-up visit".into()),
            ]);
            validate(appointment_schema("create"), &rec, &c)
        };

        assert!(at(Duration::minutes(1)).is_ok());
        assert_eq!(
            at(Duration::minutes(-1)).unwrap_err().get("schedule"),
            Some("Appointment must be scheduled for a future date")
        );
    }

    #[test]
    fn test_cancel_requires_reason() {
        let rec = record([
            ("primaryPhysician", "Dr. Green"),
            ("schedule", "2020-01-01T09:00"),
        ]);
        let errors = validate(appointment_schema("cancel"), &rec, &clock()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("cancellationReason"), Some("Cancellation reason is required"));
    }

    #[test]
    fn test_cancel_reason_bounds() {
        let with_reason = |reason: &str| {
            let rec = record([
                ("primaryPhysician", "Dr. Green"),
                ("schedule", "2020-01-01T09:00"),
                ("cancellationReason", reason),
            ]);
            validate(appointment_schema("cancel"), &rec, &clock())
        };

        assert_eq!(
            with_reason("Too short").unwrap_err().get("cancellationReason"),
            Some("Please provide at least 10 characters explaining the cancellation")
        );
        assert_eq!(
            with_reason(&"x".repeat(501)).unwrap_err().get("cancellationReason"),
            Some("Cancellation reason must be less than 500 characters")
        );
        assert!(with_reason(&"x".repeat(500)).is_ok());

        // padding does not count toward the minimum
        assert_eq!(
            with_reason("   Too short   ").unwrap_err().get("cancellationReason"),
            Some("Please provide at least 10 characters explaining the cancellation")
        );
        let out = with_reason("   Conflict!!   ").unwrap();
        assert_eq!(out.text("cancellationReason"), Some("Conflict!!"));
    }

    #[test]
    fn test_schedule_is_relaxed_default() {
        assert_eq!(appointment_schema("reschedule"), SchemaId::ScheduleAppointment);
        assert_eq!(appointment_schema(""), SchemaId::ScheduleAppointment);

        let rec = record([("primaryPhysician", "Dr. Green")]);
        assert!(validate(appointment_schema("schedule"), &rec, &clock()).is_ok());

        let errors = validate(appointment_schema("schedule"), &Record::new(), &clock()).unwrap_err();
        assert_eq!(errors.get("primaryPhysician"), Some("Please select a healthcare provider"));
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let c = clock();
        let first = validate(SchemaId::Patient, &valid_patient(), &c).unwrap();
        let second = validate(SchemaId::Patient, first.as_record(), &c).unwrap();
        assert_eq!(first, second);

        let bad = user(" J ", "x", "1");
        let e1 = validate(SchemaId::User, &bad, &c).unwrap_err();
        let e2 = validate(SchemaId::User, &bad, &c).unwrap_err();
        assert_eq!(e1, e2);
    }

    #[test]
    fn test_typed_views() {
        let c = clock();
        let out = validate(SchemaId::User, &user("Jane Doe", "JANE@X.com", "+15551230000"), &c)
            .unwrap();
        let new_user = NewUser::try_from(&out).unwrap();
        assert_eq!(new_user.email, "jane@x.com");
        assert!(AppointmentRequest::try_from(&out).is_err());

        let rec = record([("primaryPhysician", "Dr. Green"), ("reason", "Follow up")]);
        let appt = validate(SchemaId::ScheduleAppointment, &rec, &c).unwrap();
        let req = AppointmentRequest::try_from(&appt).unwrap();
        assert_eq!(req.reason.as_deref(), Some("Follow up"));
        assert_eq!(req.schedule, None);
    }

    #[test]
    fn test_schema_id_parse() {
        assert_eq!("Patient".parse::<SchemaId>().unwrap(), SchemaId::Patient);
        assert_eq!("cancel".parse::<SchemaId>().unwrap(), SchemaId::CancelAppointment);
        assert!("other".parse::<SchemaId>().is_err());
        assert_eq!(serde_json::to_string(&SchemaId::CreateAppointment).unwrap(), "\"create\"");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn names_in_charset_pass(name in "[A-Za-z][A-Za-z \\-'.]{0,98}[A-Za-z]") {
                let out = validate(SchemaId::User, &user(&name, "a@b.co", "+15551234567"), &clock());
                prop_assert!(out.is_ok());
            }

            #[test]
            fn names_with_digit_fail(prefix in "[A-Za-z]{1,20}", digit in 0u8..10, suffix in "[A-Za-z]{1,20}") {
                let name = format!("{prefix}{digit}{suffix}");
                let errors = validate(SchemaId::User, &user(&name, "a@b.co", "+15551234567"), &clock())
                    .unwrap_err();
                prop_assert_eq!(
                    errors.get("name"),
                    Some("Name can only contain letters, spaces, hyphens, and apostrophes")
                );
            }

            #[test]
            fn e164_phones_pass(digits in "[0-9]{10,15}") {
                let phone = format!("+{digits}");
                prop_assert!(validate(SchemaId::User, &user("Jane", "a@b.co", &phone), &clock()).is_ok());
            }

            #[test]
            fn email_is_lowercased(local in "[A-Za-z]{1,10}", domain in "[A-Za-z]{1,10}") {
                let email = format!("{local}@{domain}.COM");
                let out = validate(SchemaId::User, &user("Jane", &email, "+15551234567"), &clock()).unwrap();
                let expected = email.to_lowercase();
                prop_assert_eq!(out.text("email"), Some(expected.as_str()));
            }
        }
    }
}
