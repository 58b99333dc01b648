//! Configuration loading.
//!
//! Resolves the config path (custom directory or XDG default), parses the
//! TOML, validates it and reports deprecated fields.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// Returns an error if it was already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Custom configuration directory, if one was set with `--config`.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from the resolved path, or defaults if there is no file.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        // A custom directory is an explicit request, so a missing file there is an error
        if get_custom_config_dir().is_some() {
            anyhow::bail!(
                "Configuration file not found at {}",
                private_path(&config_path)
            );
        }
        return Ok(Config::default());
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific file.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    config.warn_legacy_fields();

    Ok(config)
}

/// Parse and validate configuration text.
pub(crate) fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content)?;
    normalize(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Sort gear lists and trim the timezone name. Values are not checked here.
fn normalize(config: &mut Config) {
    if let Some(ref mut gear) = config.gear {
        for values in [
            gear.apertures.as_mut(),
            gear.shutter_speeds.as_mut(),
            gear.isos.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            values.sort_by(f64::total_cmp);
            values.dedup();
        }
    }

    if let Some(ref mut tz) = config.timezone {
        *tz = tz.trim().to_string();
    }
}
