//! Time source abstraction for supporting both real-time and simulated time.
//!
//! `status` reads the clock once; `simulate` steps a [`SimulatedTimeSource`]
//! from wake-up to wake-up without sleeping, so a year of transitions can be
//! replayed instantly.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::cell::Cell;

use crate::time_spec::local_to_utc;

/// Format accepted for `--at` and simulation bounds.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for abstracting time operations
pub trait TimeSource {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, used for `status --at`.
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Fast-forward clock between a start and an end instant.
pub struct SimulatedTimeSource {
    current: Cell<DateTime<Utc>>,
    end_time: DateTime<Utc>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        if end_time <= start_time {
            anyhow::bail!("Simulation end {end_time} must be after start {start_time}");
        }
        Ok(Self {
            current: Cell::new(start_time),
            end_time,
        })
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Jump forward to `target`, capped at the end time. Never moves backward.
    pub fn advance_to(&self, target: DateTime<Utc>) {
        let next = target.min(self.end_time).max(self.current.get());
        self.current.set(next);
    }

    /// Check if the simulation has reached its end time
    pub fn is_ended(&self) -> bool {
        self.current.get() >= self.end_time
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as wall-clock
/// time in `tz`.
///
/// Ambiguous and skipped local times follow the same rules as interval
/// boundaries.
pub fn parse_datetime_in_tz(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)
        .with_context(|| format!("Invalid datetime '{s}'. Use YYYY-MM-DD HH:MM:SS"))?;
    Ok(local_to_utc(tz, naive))
}
