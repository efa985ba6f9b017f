//! CLI Commands

pub mod config;
pub mod render;
pub mod submit;
pub mod validate;

use crate::{FormArgs, FormKind};
use anyhow::Context;
use async_trait::async_trait;
use carepulse_common::{Record, ResourceId};
use carepulse_forms::{
    appointment_form, landing_form, registration_form, FormDefinition, Navigator,
    SubmissionAction, SubmissionError,
};
use carepulse_validation::{SchemaId, ValidatedRecord};
use std::io::Read;
use std::path::Path;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Read a record from a JSON or YAML file, or stdin
pub fn read_record(file: Option<&Path>) -> anyhow::Result<Record> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if content.trim().is_empty() {
        return Ok(Record::new());
    }
    // YAML is a superset of JSON
    serde_yaml::from_str(&content).context("record must be a map of field name to value")
}

pub fn definition(args: &FormArgs) -> FormDefinition {
    match args.form {
        FormKind::Landing => landing_form(),
        FormKind::Register => registration_form(),
        FormKind::Appointment => appointment_form(&args.kind),
    }
}

/// Posts validated records to the backend
pub struct HttpSubmissionAction {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSubmissionAction {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn path_for(schema: SchemaId) -> &'static str {
        match schema {
            SchemaId::User => "/users",
            SchemaId::Patient => "/patients",
            SchemaId::CreateAppointment | SchemaId::ScheduleAppointment => "/appointments",
            SchemaId::CancelAppointment => "/appointments/cancel",
        }
    }
}

#[async_trait]
impl SubmissionAction for HttpSubmissionAction {
    async fn create_resource(
        &self,
        record: &ValidatedRecord,
    ) -> Result<ResourceId, SubmissionError> {
        let url = format!("{}{}", self.base_url, Self::path_for(record.schema()));
        let resp = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| SubmissionError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;
        resource_id(&json)
    }
}

/// Created id from `data.id`, `$id` or `id`
fn resource_id(json: &serde_json::Value) -> Result<ResourceId, SubmissionError> {
    let id = json
        .get("data")
        .and_then(|d| d.get("id"))
        .or_else(|| json.get("$id"))
        .or_else(|| json.get("id"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| SubmissionError::InvalidResponse("no id in response".into()))?;
    ResourceId::new(id).map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
}

/// Prints the route the UI would follow
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn go_to(&self, path: &str) {
        println!("Next: {}", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepulse_common::FieldValue;
    use serde_json::json;

    #[test]
    fn test_resource_id_shapes() {
        assert_eq!(resource_id(&json!({"data": {"id": "u1"}})).unwrap().as_str(), "u1");
        assert_eq!(resource_id(&json!({"$id": "65f1"})).unwrap().as_str(), "65f1");
        assert!(matches!(
            resource_id(&json!({"ok": true})),
            Err(SubmissionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_read_record_yaml() {
        let dir = std::env::temp_dir().join(format!("carepulse-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("jane.yaml");
        std::fs::write(&path, "name: Jane Doe\ntreatmentConsent: true\n").unwrap();

        let record = read_record(Some(&path)).unwrap();
        assert_eq!(record["name"], FieldValue::from("Jane Doe"));
        assert_eq!(record["treatmentConsent"], FieldValue::Bool(true));
    }

    #[test]
    fn test_unquoted_phone_reaches_validation() {
        let dir = std::env::temp_dir().join(format!("carepulse-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("draft.yaml");
        std::fs::write(&path, "name: Jane Doe\nemail: jane@example.com\nphone: +15551230000\n")
            .unwrap();

        let record = read_record(Some(&path)).unwrap();
        assert!(matches!(record["phone"], FieldValue::Other(_)));

        let errors = carepulse_validation::validate(
            SchemaId::User,
            &record,
            &carepulse_common::SystemClock,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("phone"), Some("Expected text"));
    }
}
