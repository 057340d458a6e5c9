//! The parent window record consumed by child intervals.
//!
//! Parents publish their computed state as an attribute map (see
//! [`crate::attributes`]). A child only needs the two UTC boundaries and the
//! zone name, so the map is parsed once into a [`ParentWindow`] and
//! timestamps that fail to parse are rejected here instead of reaching the
//! calculation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::constants::DEFAULT_TIMEZONE_LABEL;

/// A parent's already-resolved window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParentWindow {
    #[serde(rename = "start_time_utc")]
    pub start_utc: DateTime<Utc>,
    #[serde(rename = "end_time_utc")]
    pub end_utc: DateTime<Utc>,
    #[serde(rename = "timezone", default)]
    pub timezone_name: Option<String>,
}

impl ParentWindow {
    pub fn new(start_utc: DateTime<Utc>, end_utc: DateTime<Utc>) -> Self {
        Self {
            start_utc,
            end_utc,
            timezone_name: None,
        }
    }

    pub fn with_timezone(mut self, name: impl Into<String>) -> Self {
        self.timezone_name = Some(name.into());
        self
    }

    /// Parse a parent's published attribute map.
    ///
    /// Requires `start_time_utc` and `end_time_utc` as ISO-8601 timestamps
    /// with an offset; other keys are ignored. The placeholder zone label
    /// published for an unresolved zone is treated as no zone.
    pub fn from_attributes(attributes: &serde_json::Value) -> Result<Self> {
        let mut window = Self::deserialize(attributes)
            .context("Parent attributes do not contain a valid UTC window")?;
        if window.timezone_name.as_deref() == Some(DEFAULT_TIMEZONE_LABEL) {
            window.timezone_name = None;
        }
        Ok(window)
    }
}
