//! Command-line command handlers for tzwindow.
//!
//! Each command is implemented in its own submodule. Both commands start
//! from the same loaded configuration, built here.

pub mod simulate;
pub mod status;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::schedule::IntervalSet;
use crate::solar::GeoSolar;
use crate::time_spec::SolarEventSource;

/// Everything a command needs to evaluate intervals.
pub struct Session {
    pub config: Config,
    pub intervals: IntervalSet,
    pub solar: Option<GeoSolar>,
}

impl Session {
    /// Load the configuration and build the interval set it describes.
    pub fn load() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let intervals = IntervalSet::from_config(&config)?;
        let solar = config.solar()?;
        Ok(Self {
            config,
            intervals,
            solar,
        })
    }
}

/// The solar capability handed to root intervals, when coordinates exist.
pub fn solar_source(solar: Option<&GeoSolar>) -> Option<&dyn SolarEventSource> {
    solar.map(|s| s as &dyn SolarEventSource)
}
