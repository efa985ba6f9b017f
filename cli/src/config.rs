//! CLI Configuration

use anyhow::{anyhow, Context};
use carepulse_forms::FormsConfig;
use std::fs;
use std::path::PathBuf;

pub fn load(profile: Option<&str>) -> anyhow::Result<FormsConfig> {
    let path = config_path(profile)?;
    if path.exists() {
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    } else {
        Ok(FormsConfig::default())
    }
}

pub fn save(config: &FormsConfig, profile: Option<&str>) -> anyhow::Result<PathBuf> {
    let path = config_path(profile)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, toml::to_string_pretty(config)?)?;
    Ok(path)
}

fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
    let filename = match profile {
        Some(p) => format!("config.{}.toml", p),
        None => "config.toml".to_string(),
    };
    Ok(home.join(".carepulse").join(filename))
}
