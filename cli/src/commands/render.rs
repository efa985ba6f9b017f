//! Render command

use super::{definition, read_record, HttpSubmissionAction, PrintNavigator, DEFAULT_API_URL};
use crate::output::OutputFormat;
use crate::FormArgs;
use carepulse_common::{FieldValue, SystemClock};
use carepulse_forms::boundary::Rendered;
use carepulse_forms::render::CustomRenderer;
use carepulse_forms::{
    ErrorBoundary, FieldDescriptor, FormController, FormError, FormsConfig, RenderContext,
    RenderedField,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
struct FieldRow {
    field: String,
    control: String,
    required: bool,
    label: String,
    error: String,
}

impl From<&RenderedField> for FieldRow {
    fn from(r: &RenderedField) -> Self {
        let control = serde_json::to_value(&r.control)
            .ok()
            .and_then(|v| v.get("control").and_then(|c| c.as_str()).map(str::to_string))
            .unwrap_or_default();
        Self {
            field: r.name.clone(),
            control,
            required: r.a11y.aria_required,
            label: r.label.clone().unwrap_or_default(),
            error: r.error.clone().unwrap_or_default(),
        }
    }
}

pub fn handle(args: &FormArgs, settings: &FormsConfig, format: OutputFormat) -> anyhow::Result<()> {
    let record = read_record(args.file.as_deref())?;
    let clock = Arc::new(SystemClock);
    let api_url = settings.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
    let form = FormController::new(
        definition(args),
        Arc::new(HttpSubmissionAction::new(api_url)),
        Arc::new(PrintNavigator),
        clock.clone(),
    )?;
    let ctx = with_widgets(settings.render_context(clock));

    let mut boundary = ErrorBoundary::new(settings.diagnostics);
    let fields = match boundary.render(|| -> Result<_, FormError> {
        let has_values = !record.is_empty();
        for (field, value) in record {
            form.set_value(&field, value)?;
        }
        if has_values {
            let _ = form.validate();
        }
        Ok(form.render_fields(&ctx))
    }) {
        Rendered::Content(fields) => fields,
        Rendered::Fallback(screen) => {
            format.print(&screen);
            anyhow::bail!(screen.title);
        }
    };

    match format {
        OutputFormat::Table => {
            let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();
            format.print_rows(&rows);
        }
        _ => format.print(&fields),
    }
    format.print(&form.submit_control());
    Ok(())
}

/// Host widgets for the custom fields of the catalogue
fn with_widgets(ctx: RenderContext) -> RenderContext {
    let radio: CustomRenderer = Arc::new(|d: &FieldDescriptor, v: &FieldValue| {
        Some(json!({
            "widget": "radioGroup",
            "options": d.options,
            "selected": v.as_text(),
        }))
    });
    let uploader: CustomRenderer = Arc::new(|_: &FieldDescriptor, v: &FieldValue| {
        Some(json!({
            "widget": "fileUploader",
            "files": v.as_files().unwrap_or_default(),
        }))
    });
    ctx.with_custom("gender", radio)
        .with_custom("identificationDocument", uploader)
}
