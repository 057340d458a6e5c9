//! Configuration for a set of intervals.
//!
//! The configuration lives in `tzwindow.toml`, searched for in:
//! 1. The directory passed with `--config <dir>`
//! 2. **XDG_CONFIG_HOME**/tzwindow/tzwindow.toml
//!
//! A default file with one example interval is written on first load.
//!
//! ```toml
//! timezone = "Europe/London"   # Default zone for root intervals (IANA name)
//! latitude = 51.5074           # Needed only for sunrise/sunset boundaries
//! longitude = -0.1278
//!
//! [[interval]]
//! name = "Night"
//! start = "22:00"              # HH:MM, HH:MM:SS, "sunrise" or "sunset"
//! end = "06:00"
//! timezone = "Europe/Berlin"   # Optional per-interval override
//! start_offset = 0             # Signed seconds
//! end_offset = 0
//!
//! [[interval]]
//! name = "Wind down"
//! parent = "Night"             # Must name a root interval
//! start_ref = "start"          # "start" or "end" of the parent
//! start_offset = -1800
//! end_ref = "start"
//! end_offset = 0
//! ```
//!
//! Coordinates may also be kept in a separate `geo.toml` next to the main
//! file, which overrides the values in `tzwindow.toml`.
//!
//! Raw entries are deserialized as-is and converted into typed
//! [`IntervalConfig`]s by [`validation`], so parse errors for times,
//! references and zones surface once, at load time.

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::constants::DEFAULT_TIMEZONE;
use crate::interval::IntervalConfig;
use crate::solar::GeoSolar;

pub use loading::{
    create_default_config, get_config_path, load, load_from_path, set_config_dir,
};
pub use validation::{build_interval_config, validate_config};

/// Optional `geo.toml` holding coordinates apart from the main file.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GeoConfig {
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
}

/// One `[[interval]]` table as written in the file.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntervalEntry {
    pub name: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub timezone: Option<String>,
    pub parent: Option<String>,
    pub start_ref: Option<String>,
    pub end_ref: Option<String>,
    #[serde(default)]
    pub start_offset: i64,
    #[serde(default)]
    pub end_offset: i64,
}

impl IntervalEntry {
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }
}

/// The whole configuration file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, rename = "interval")]
    pub intervals: Vec<IntervalEntry>,
}

impl Config {
    /// Load the configuration from the default or `--config` location.
    pub fn load() -> Result<Self> {
        loading::load()
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse configuration")?;
        validate_config(&config)?;
        Ok(config)
    }

    /// The zone used by root intervals without an override.
    pub fn default_timezone(&self) -> Result<Tz> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown timezone '{name}'"))
    }

    /// The solar resolver for the configured coordinates, if any.
    pub fn solar(&self) -> Result<Option<GeoSolar>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoSolar::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    /// Typed configurations for every interval, in file order.
    pub fn interval_configs(&self) -> Result<Vec<IntervalConfig>> {
        self.intervals.iter().map(build_interval_config).collect()
    }
}

#[cfg(test)]
mod tests;
