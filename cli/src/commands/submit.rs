//! Submit command

use super::{definition, read_record, HttpSubmissionAction, PrintNavigator, DEFAULT_API_URL};
use crate::output::{ErrorRow, OutputFormat};
use crate::FormArgs;
use anyhow::bail;
use carepulse_common::SystemClock;
use carepulse_forms::{FormController, FormsConfig, SubmitOutcome};
use colored::Colorize;
use std::sync::Arc;

pub async fn handle(
    args: &FormArgs,
    settings: &FormsConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let record = read_record(args.file.as_deref())?;
    let api_url = settings.api_url.as_deref().unwrap_or(DEFAULT_API_URL);

    let form = FormController::new(
        definition(args),
        Arc::new(HttpSubmissionAction::new(api_url)),
        Arc::new(PrintNavigator),
        Arc::new(SystemClock),
    )?;
    for (field, value) in record {
        form.set_value(&field, value)?;
    }

    tracing::debug!(api_url, schema = %form.schema_id(), "submitting form");
    match form.submit().await {
        SubmitOutcome::Succeeded(id) => {
            println!("{} Created {}", "✓".green(), id.as_str().bold());
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            eprintln!("{} {}", "✗".red(), errors);
            format.print_rows(&ErrorRow::rows(&errors));
            Err(errors.into())
        }
        SubmitOutcome::Failed(failure) => {
            eprintln!("{} {}", "✗".red(), failure.message);
            bail!("submission failed ({:?})", failure.kind)
        }
        SubmitOutcome::Ignored => bail!("a submission is already in progress"),
    }
}
