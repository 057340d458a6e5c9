//! Configuration loading functionality.
//!
//! Handles locating the configuration file, creating a default one on first
//! run, and applying `geo.toml` coordinate overrides.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::validate_config;
use super::{Config, GeoConfig};
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, GEO_FILE_NAME};

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

const DEFAULT_CONFIG: &str = r#"#[Default zone]
timezone = "UTC"          # IANA name used by intervals without their own zone

#[Location]
# Needed only for intervals bounded by "sunrise" or "sunset".
# latitude = 51.5074
# longitude = -0.1278

#[Intervals]
# Root intervals take start/end as HH:MM, HH:MM:SS, "sunrise" or "sunset".
# Child intervals name a root parent and offset from its start or end.
[[interval]]
name = "Night"
start = "22:00"
end = "06:00"

[[interval]]
name = "Wind down"
parent = "Night"
start_ref = "start"
start_offset = -1800      # Seconds relative to the referenced boundary
end_ref = "start"
end_offset = 0
"#;

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the configuration file path.
///
/// Uses the `--config` directory when one was set, otherwise the platform
/// configuration directory.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = CONFIG_DIR.get().and_then(|d| d.clone()) {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Write the commented default configuration to `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory {}", parent.display())
        })?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;

    log_block_start!("Created default configuration at {}", path.display());
    Ok(())
}

/// Load configuration using automatic path detection.
///
/// This function will create a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Load configuration from a specific path.
///
/// This version does NOT create a default config if the path doesn't exist.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    // Before validation so geo.toml values are validated too
    load_geo_override_from_path(&mut config, path);

    validate_config(&config)?;

    log_debug!(
        "Loaded {} interval(s) from {}",
        config.intervals.len(),
        path.display()
    );

    Ok(config)
}

/// Apply coordinates from a `geo.toml` next to `config_path`, if present.
///
/// The file is optional; unreadable or malformed files are reported and
/// ignored.
pub(crate) fn load_geo_override_from_path(config: &mut Config, config_path: &Path) {
    let Some(geo_path) = config_path.parent().map(|p| p.join(GEO_FILE_NAME)) else {
        return;
    };

    if !geo_path.exists() {
        return;
    }

    match fs::read_to_string(&geo_path) {
        Ok(content) => match toml::from_str::<GeoConfig>(&content) {
            Ok(geo_config) => {
                if let Some(lat) = geo_config.latitude {
                    config.latitude = Some(lat);
                }
                if let Some(lon) = geo_config.longitude {
                    config.longitude = Some(lon);
                }
            }
            Err(e) => {
                log_warning!("Failed to parse geo.toml: {e}. Using coordinates from main config.");
            }
        },
        Err(e) => {
            log_warning!("Failed to read geo.toml: {e}. Using coordinates from main config.");
        }
    }
}
