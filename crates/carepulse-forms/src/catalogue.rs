//! The application's forms
//!
//! Each [`FormDefinition`] ties a schema to the descriptors shown for it, the
//! initial values, and the route to follow once the backend returns an id.

use crate::field::{FieldDescriptor, FieldType};
use carepulse_common::{FieldValue, Record, ResourceId};
use carepulse_validation::{appointment_schema, SchemaId};
use serde::Serialize;

/// Physicians offered by the provider selects
pub const PHYSICIANS: [&str; 9] = [
    "Dr. John Green",
    "Dr. Leila Cameron",
    "Dr. David Livingston",
    "Dr. Evan Peter",
    "Dr. Jane Powell",
    "Dr. Alex Ramirez",
    "Dr. Jasmine Lee",
    "Dr. Alyana Cruz",
    "Dr. Hardik Sharma",
];

/// Accepted identification documents
pub const IDENTIFICATION_TYPES: [&str; 11] = [
    "Birth Certificate",
    "Driver's License",
    "Medical Insurance Card/Policy",
    "Military ID Card",
    "National Identity Card",
    "Passport",
    "Resident Alien Card (Green Card)",
    "Social Security Card",
    "State ID Card",
    "Student ID Card",
    "Voter ID Card",
];

/// Path template with an `{id}` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectRoute(String);

impl RedirectRoute {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Concrete path for a created resource
    pub fn resolve(&self, id: &ResourceId) -> String {
        self.0.replace("{id}", id.as_str())
    }

    pub fn template(&self) -> &str {
        &self.0
    }
}

/// Schema + descriptors + initial values + redirect of one form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub schema: SchemaId,
    pub fields: Vec<FieldDescriptor>,
    pub defaults: Record,
    pub redirect: RedirectRoute,
    pub submit_label: String,
}

impl FormDefinition {
    pub fn new(schema: SchemaId, redirect: RedirectRoute) -> Self {
        Self {
            schema,
            fields: Vec::new(),
            defaults: Record::new(),
            redirect,
            submit_label: "Submit".into(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Seed an initial value (e.g. an existing appointment being cancelled)
    pub fn default_value(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.defaults.insert(field.into(), value.into());
        self
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    /// Descriptor for `name`
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Landing form: basic contact details, then on to registration
pub fn landing_form() -> FormDefinition {
    FormDefinition::new(SchemaId::User, RedirectRoute::new("/patients/{id}/register"))
        .field(
            FieldDescriptor::new("name", FieldType::Text)
                .label("Full Legal Name")
                .placeholder("Enter your full name as it appears on ID")
                .icon("/assets/icons/user.svg", "User profile icon")
                .required(),
        )
        .field(
            FieldDescriptor::new("email", FieldType::Text)
                .label("Email Address")
                .placeholder("your.email@example.com")
                .icon("/assets/icons/email.svg", "Email address icon")
                .required(),
        )
        .field(
            FieldDescriptor::new("phone", FieldType::Phone)
                .label("Phone Number")
                .placeholder("+1 (555) 123-4567")
                .required(),
        )
        .default_value("name", "")
        .default_value("email", "")
        .default_value("phone", "")
        .submit_label("Begin Registration Process")
}

/// Full patient registration
pub fn registration_form() -> FormDefinition {
    let text = |name: &str, label: &str, placeholder: &str| {
        FieldDescriptor::new(name, FieldType::Text)
            .label(label)
            .placeholder(placeholder)
            .required()
    };
    let area = |name: &str, label: &str, placeholder: &str| {
        FieldDescriptor::new(name, FieldType::TextArea)
            .label(label)
            .placeholder(placeholder)
    };
    let consent = |name: &str, label: &str| {
        FieldDescriptor::new(name, FieldType::Checkbox)
            .label(label)
            .required()
    };

    FormDefinition::new(
        SchemaId::Patient,
        RedirectRoute::new("/patients/{id}/new-appointment"),
    )
    // Personal information
    .field(
        text("name", "Full name", "John Doe")
            .icon("/assets/icons/user.svg", "User profile icon"),
    )
    .field(
        text("email", "Email address", "johndoe@gmail.com")
            .icon("/assets/icons/email.svg", "Email address icon"),
    )
    .field(
        FieldDescriptor::new("phone", FieldType::Phone)
            .label("Phone Number")
            .placeholder("(555) 123-4567")
            .required(),
    )
    .field(
        FieldDescriptor::new("birthDate", FieldType::Date)
            .label("Date of birth")
            .not_after_now()
            .required(),
    )
    .field(
        FieldDescriptor::new("gender", FieldType::Custom)
            .label("Gender")
            .options(["Male", "Female", "Other"])
            .required(),
    )
    .field(text("address", "Address", "14 street, New york, NY - 5101"))
    .field(text("occupation", "Occupation", "Software Engineer"))
    .field(text(
        "emergencyContactName",
        "Emergency contact name",
        "Guardian's name",
    ))
    .field(
        FieldDescriptor::new("emergencyContactNumber", FieldType::Phone)
            .label("Emergency contact number")
            .placeholder("(555) 123-4567")
            .required(),
    )
    // Medical information
    .field(
        FieldDescriptor::new("primaryPhysician", FieldType::Select)
            .label("Primary care physician")
            .placeholder("Select a physician")
            .options(PHYSICIANS)
            .required(),
    )
    .field(text("insuranceProvider", "Insurance provider", "BlueCross BlueShield"))
    .field(text("insurancePolicyNumber", "Insurance policy number", "ABC123456789"))
    .field(area("allergies", "Allergies (if any)", "Peanuts, Penicillin, Pollen"))
    .field(area(
        "currentMedication",
        "Current medications",
        "Ibuprofen 200mg, Levothyroxine 50mcg",
    ))
    .field(area(
        "familyMedicalHistory",
        "Family medical history (if relevant)",
        "Mother had brain cancer, Father has hypertension",
    ))
    .field(area(
        "pastMedicalHistory",
        "Past medical history",
        "Appendectomy in 2015, Asthma diagnosis in childhood",
    ))
    // Identification
    .field(
        FieldDescriptor::new("identificationType", FieldType::Select)
            .label("Identification Type")
            .placeholder("Select identification type")
            .options(IDENTIFICATION_TYPES),
    )
    .field(
        FieldDescriptor::new("identificationNumber", FieldType::Text)
            .label("Identification Number")
            .placeholder("123456789"),
    )
    .field(
        FieldDescriptor::new("identificationDocument", FieldType::Custom)
            .label("Scanned Copy of Identification Document"),
    )
    // Consent and privacy
    .field(consent(
        "treatmentConsent",
        "I consent to receive treatment for my health condition.",
    ))
    .field(consent(
        "disclosureConsent",
        "I consent to the use and disclosure of my health information for treatment purposes.",
    ))
    .field(consent(
        "privacyConsent",
        "I acknowledge that I have reviewed and agree to the privacy policy",
    ))
    .default_value("gender", "Male")
    .default_value("identificationType", IDENTIFICATION_TYPES[0])
    .default_value("treatmentConsent", false)
    .default_value("disclosureConsent", false)
    .default_value("privacyConsent", false)
    .submit_label("Submit and Continue")
}

/// Appointment form for a purpose discriminant (`create`, `cancel`, other)
pub fn appointment_form(kind: &str) -> FormDefinition {
    let schema = appointment_schema(kind);
    let form = FormDefinition::new(
        schema,
        RedirectRoute::new("/patients/new-appointment/success?appointmentId={id}"),
    );

    let provider = FieldDescriptor::new("primaryPhysician", FieldType::Select)
        .label("Doctor")
        .placeholder("Select a doctor")
        .options(PHYSICIANS)
        .required();
    let schedule = FieldDescriptor::new("schedule", FieldType::Date)
        .label("Expected appointment date")
        .show_time()
        .date_format("MM/dd/yyyy  -  h:mm aa");

    match schema {
        SchemaId::CancelAppointment => form
            .field(
                FieldDescriptor::new("cancellationReason", FieldType::TextArea)
                    .label("Reason for cancellation")
                    .placeholder("Urgent meeting came up")
                    .required(),
            )
            .submit_label("Cancel Appointment"),
        SchemaId::CreateAppointment => form
            .field(provider)
            .field(schedule.not_before_now().required())
            .field(
                FieldDescriptor::new("reason", FieldType::TextArea)
                    .label("Appointment reason")
                    .placeholder("Annual monthly check-up")
                    .required(),
            )
            .field(
                FieldDescriptor::new("note", FieldType::TextArea)
                    .label("Comments/notes")
                    .placeholder("Prefer afternoon appointments, if possible"),
            )
            .submit_label("Create Appointment"),
        _ => form
            .field(provider)
            .field(schedule)
            .field(
                FieldDescriptor::new("reason", FieldType::TextArea)
                    .label("Appointment reason"),
            )
            .field(FieldDescriptor::new("note", FieldType::TextArea).label("Comments/notes"))
            .submit_label("Schedule Appointment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fields_in_schema(form: &FormDefinition) {
        let schema = form.schema.schema();
        for f in &form.fields {
            assert!(schema.contains(&f.name), "{} not in {}", f.name, form.schema);
        }
        for k in form.defaults.keys() {
            assert!(schema.contains(k), "default {k} not in {}", form.schema);
        }
    }

    #[test]
    fn test_every_form_matches_its_schema() {
        assert_fields_in_schema(&landing_form());
        assert_fields_in_schema(&registration_form());
        for kind in ["create", "cancel", "reschedule"] {
            assert_fields_in_schema(&appointment_form(kind));
        }
    }

    #[test]
    fn test_registration_covers_patient_schema() {
        let form = registration_form();
        let names: Vec<_> = form.fields.iter().map(|f| f.name.as_str()).collect();
        let expected: Vec<_> = SchemaId::Patient.schema().field_names().collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_redirect_routes() {
        let id = ResourceId::new("abc123").unwrap();
        assert_eq!(landing_form().redirect.resolve(&id), "/patients/abc123/register");
        assert_eq!(
            appointment_form("create").redirect.resolve(&id),
            "/patients/new-appointment/success?appointmentId=abc123"
        );
    }

    #[test]
    fn test_appointment_kinds() {
        assert_eq!(appointment_form("create").schema, SchemaId::CreateAppointment);
        assert_eq!(appointment_form("cancel").schema, SchemaId::CancelAppointment);
        assert_eq!(appointment_form("").schema, SchemaId::ScheduleAppointment);
        assert!(appointment_form("create")
            .descriptor("schedule")
            .is_some_and(|d| d.date.min.is_some() && d.date.show_time));
    }
}
