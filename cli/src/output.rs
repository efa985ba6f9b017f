//! Output formatting

use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print a single document; tables fall back to JSON
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
        }
    }

    /// Print rows, as a table or as a serialized list
    pub fn print_rows<T: Serialize + Tabled>(&self, rows: &[T]) {
        match self {
            OutputFormat::Table => println!("{}", Table::new(rows)),
            _ => self.print(&rows),
        }
    }
}

/// One invalid field
#[derive(Debug, Serialize, Tabled)]
pub struct ErrorRow {
    pub field: String,
    pub message: String,
}

impl ErrorRow {
    pub fn rows(errors: &carepulse_validation::FieldErrorList) -> Vec<Self> {
        errors
            .iter()
            .map(|e| Self {
                field: e.field.clone(),
                message: e.message.clone(),
            })
            .collect()
    }
}
