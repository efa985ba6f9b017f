//! CarePulse CLI
//!
//! Command-line front end for the CarePulse intake forms.
//!
//! # Usage
//!
//! ```bash
//! carepulse validate --schema user -f jane.json
//! carepulse render --form register -f draft.yaml --format table
//! carepulse submit --form appointment --kind create -f slot.json
//! carepulse config set default_phone_region GB
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "carepulse")]
#[command(author = "CarePulse")]
#[command(version)]
#[command(about = "CarePulse intake command line interface", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CAREPULSE_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    format: output::OutputFormat,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a record against a schema
    Validate {
        /// user, patient, create, schedule or cancel
        #[arg(long, short)]
        schema: String,
        /// JSON or YAML record; stdin when omitted
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Render a form's fields with their current values
    Render {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Validate and submit a form to the backend
    Submit {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(clap::Args)]
struct FormArgs {
    /// Which form
    #[arg(long, value_enum)]
    form: FormKind,
    /// Appointment purpose (create, cancel, anything else schedules)
    #[arg(long, default_value = "schedule")]
    kind: String,
    /// JSON or YAML values; stdin when omitted
    #[arg(long, short)]
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormKind {
    Landing,
    Register,
    Appointment,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = config::load(cli.profile.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config not readable, using defaults");
        Default::default()
    });
    if cli.api_url.is_some() {
        settings.api_url = cli.api_url;
    }

    match cli.command {
        Commands::Validate { schema, file } => {
            commands::validate::handle(&schema, file.as_deref(), cli.format)
        }
        Commands::Render { form } => commands::render::handle(&form, &settings, cli.format),
        Commands::Submit { form } => commands::submit::handle(&form, &settings, cli.format).await,
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()),
    }
}
