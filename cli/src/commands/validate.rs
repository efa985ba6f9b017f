//! Validate command

use super::read_record;
use crate::output::{ErrorRow, OutputFormat};
use anyhow::anyhow;
use carepulse_common::SystemClock;
use carepulse_validation::{validate, SchemaId};
use colored::Colorize;
use std::path::Path;

pub fn handle(schema: &str, file: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let id: SchemaId = schema.parse().map_err(|e: String| anyhow!(e))?;
    let record = read_record(file)?;

    match validate(id, &record, &SystemClock) {
        Ok(valid) => {
            eprintln!("{} {} record is valid", "✓".green(), id);
            format.print(&valid);
            Ok(())
        }
        Err(errors) => {
            eprintln!("{} {}", "✗".red(), errors);
            format.print_rows(&ErrorRow::rows(&errors));
            Err(errors.into())
        }
    }
}
