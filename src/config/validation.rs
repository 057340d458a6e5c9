//! Configuration validation functionality.
//!
//! Rejects configurations that could never produce a window: malformed
//! times, unknown zones, dangling or nested parents and out-of-range
//! coordinates. Also converts raw entries into typed interval configs.

use anyhow::{Context, Result};
use chrono::Duration;
use chrono_tz::Tz;
use std::collections::HashSet;

use super::{Config, IntervalEntry};
use crate::constants::MAX_OFFSET_DAYS;
use crate::interval::{IntervalConfig, IntervalMode};
use crate::time_spec::TimeSpec;
use crate::window::{ChildConfig, Reference, RootConfig};

/// Comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(name) = config.timezone.as_deref() {
        validate_timezone(name).context("Invalid default timezone")?;
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if config.latitude.is_some() != config.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be specified together");
    }

    let mut names = HashSet::new();
    for entry in &config.intervals {
        if entry.name.trim().is_empty() {
            anyhow::bail!("Every interval needs a non-empty name");
        }
        if !names.insert(entry.name.as_str()) {
            anyhow::bail!("Duplicate interval name '{}'", entry.name);
        }
    }

    let roots: HashSet<&str> = config
        .intervals
        .iter()
        .filter(|e| !e.is_child())
        .map(|e| e.name.as_str())
        .collect();

    for entry in &config.intervals {
        let interval = build_interval_config(entry)
            .with_context(|| format!("Invalid interval '{}'", entry.name))?;

        match &interval.mode {
            IntervalMode::Root(root) => {
                if root.uses_solar_events() && config.latitude.is_none() {
                    anyhow::bail!(
                        "Interval '{}' uses sunrise/sunset but no latitude/longitude is configured",
                        entry.name
                    );
                }
            }
            IntervalMode::Child(child) => {
                if child.parent == entry.name {
                    anyhow::bail!("Interval '{}' cannot be its own parent", entry.name);
                }
                if !roots.contains(child.parent.as_str()) {
                    anyhow::bail!(
                        "Interval '{}' references parent '{}', which is not a root interval",
                        entry.name,
                        child.parent
                    );
                }
            }
        }
    }

    Ok(())
}

fn validate_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow::anyhow!("Unknown timezone '{name}'. Use an IANA name like 'Europe/London'"))
}

fn parse_spec(value: Option<&str>, field: &str) -> Result<TimeSpec> {
    let value = value.with_context(|| format!("Root interval requires '{field}'"))?;
    value
        .parse()
        .with_context(|| format!("Invalid {field} time '{value}'"))
}

fn parse_reference(value: Option<&str>, default: Reference, field: &str) -> Result<Reference> {
    match value {
        Some(v) => v.parse().with_context(|| format!("Invalid {field}")),
        None => Ok(default),
    }
}

fn parse_offset(seconds: i64, field: &str) -> Result<Duration> {
    let limit = Duration::days(MAX_OFFSET_DAYS);
    match Duration::try_seconds(seconds) {
        Some(offset) if offset.abs() <= limit => Ok(offset),
        _ => anyhow::bail!(
            "{field} of {seconds}s is out of range (at most {} seconds either way)",
            limit.num_seconds()
        ),
    }
}

/// Convert one raw entry into its typed configuration.
pub fn build_interval_config(entry: &IntervalEntry) -> Result<IntervalConfig> {
    let start_offset = parse_offset(entry.start_offset, "start_offset")?;
    let end_offset = parse_offset(entry.end_offset, "end_offset")?;

    match entry.parent.as_deref() {
        Some(parent) => {
            if entry.start.is_some() || entry.end.is_some() || entry.timezone.is_some() {
                anyhow::bail!("Child intervals take start_ref/end_ref, not start, end or timezone");
            }

            let child = ChildConfig::new(parent)
                .with_start(
                    parse_reference(entry.start_ref.as_deref(), Reference::ParentStart, "start_ref")?,
                    start_offset,
                )
                .with_end(
                    parse_reference(entry.end_ref.as_deref(), Reference::ParentEnd, "end_ref")?,
                    end_offset,
                );
            Ok(IntervalConfig::child(entry.name.clone(), child))
        }
        None => {
            if entry.start_ref.is_some() || entry.end_ref.is_some() {
                anyhow::bail!("start_ref and end_ref are only valid on child intervals");
            }

            let mut root = RootConfig::new(
                parse_spec(entry.start.as_deref(), "start")?,
                parse_spec(entry.end.as_deref(), "end")?,
            )
            .with_offsets(start_offset, end_offset);

            if let Some(tz) = entry.timezone.as_deref() {
                validate_timezone(tz)?;
                root = root.with_timezone(tz);
            }
            Ok(IntervalConfig::root(entry.name.clone(), root))
        }
    }
}
