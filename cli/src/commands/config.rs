//! Config commands

use crate::config;
use crate::ConfigCommands;
use anyhow::bail;
use carepulse_common::Region;

const KEYS: [&str; 5] = [
    "default_phone_region",
    "date_format",
    "diagnostics",
    "debounce_ms",
    "api_url",
];

pub fn handle(action: ConfigCommands, profile: Option<&str>) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Init => {
            let path = config::save(&Default::default(), profile)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut settings = config::load(profile)?;
            match key.as_str() {
                "default_phone_region" => settings.default_phone_region = Region::new(value)?,
                "date_format" => settings.date_format = value,
                "diagnostics" => settings.diagnostics = value.parse()?,
                "debounce_ms" => settings.debounce_ms = value.parse()?,
                "api_url" => settings.api_url = Some(value),
                _ => bail!("Unknown config key: {} (expected one of {})", key, KEYS.join(", ")),
            }
            config::save(&settings, profile)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let settings = config::load(profile)?;
            println!("{}: {}", key, lookup(&settings, &key)?);
        }
        ConfigCommands::List => {
            let settings = config::load(profile)?;
            for key in KEYS {
                println!("{}: {}", key, lookup(&settings, key)?);
            }
        }
    }
    Ok(())
}

fn lookup(settings: &carepulse_forms::FormsConfig, key: &str) -> anyhow::Result<String> {
    Ok(match key {
        "default_phone_region" => settings.default_phone_region.to_string(),
        "date_format" => settings.date_format.clone(),
        "diagnostics" => settings.diagnostics.to_string(),
        "debounce_ms" => settings.debounce_ms.to_string(),
        "api_url" => settings
            .api_url
            .clone()
            .unwrap_or_else(|| "(not set)".into()),
        _ => bail!("Unknown config key: {}", key),
    })
}
