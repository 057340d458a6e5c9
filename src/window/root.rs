//! Root window calculation from clock times and solar events.
//!
//! A root window is configured as a pair of [`TimeSpec`]s in a timezone. For
//! any calendar date the pair resolves to one concrete window; when the end
//! resolves at or before the start (e.g. `22:00` to `06:00`) the end moves
//! forward by a day so the window spans midnight.
//!
//! Because a window anchored on one date can still be running on the next
//! date, picking the right occurrence for an instant takes two steps:
//! 1. Starting from the instant's local date, advance day by day until the
//!    candidate has not yet ended (bounded by [`MAX_FORWARD_SEARCH_DAYS`]).
//! 2. If the instant is still before that candidate, check whether the
//!    previous date's window is the one currently running.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use super::Window;
use crate::constants::{MAX_FORWARD_SEARCH_DAYS, MIDNIGHT_CROSSING_HOURS};
use crate::time_spec::{SolarEventSource, TimeSpec, resolve};

/// Configuration of a root window.
#[derive(Debug, Clone, PartialEq)]
pub struct RootConfig {
    pub start: TimeSpec,
    pub end: TimeSpec,
    /// IANA zone name overriding the host's default zone.
    pub timezone: Option<String>,
    pub start_offset: Duration,
    pub end_offset: Duration,
}

impl RootConfig {
    pub fn new(start: TimeSpec, end: TimeSpec) -> Self {
        Self {
            start,
            end,
            timezone: None,
            start_offset: Duration::zero(),
            end_offset: Duration::zero(),
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_offsets(mut self, start_offset: Duration, end_offset: Duration) -> Self {
        self.start_offset = start_offset;
        self.end_offset = end_offset;
        self
    }

    /// Whether either boundary depends on a solar event.
    pub fn uses_solar_events(&self) -> bool {
        self.start.is_solar() || self.end.is_solar()
    }

    /// Pick the zone to calculate in and the name to publish for it.
    ///
    /// An override that does not name a known zone falls back to `default`
    /// for the calculation while its configured name is still published.
    pub fn resolve_timezone(&self, default: Tz) -> (Tz, String) {
        match self.timezone.as_deref() {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => (tz, name.to_string()),
                Err(_) => {
                    log_warning!("Unknown timezone '{name}', falling back to {default}");
                    (default, name.to_string())
                }
            },
            None => (default, default.name().to_string()),
        }
    }

    /// Resolve the window anchored on `date`, offsets and midnight crossing
    /// applied.
    pub fn window_for(
        &self,
        date: NaiveDate,
        tz: Tz,
        solar: Option<&dyn SolarEventSource>,
    ) -> Result<Window> {
        let start = resolve(&self.start, date, tz, solar)
            .with_context(|| format!("Failed to resolve start '{}' on {date}", self.start))?;
        let start = start
            .checked_add_signed(self.start_offset)
            .with_context(|| format!("Start offset moves {start} out of range"))?;
        let end = resolve(&self.end, date, tz, solar)
            .with_context(|| format!("Failed to resolve end '{}' on {date}", self.end))?;
        let mut end = end
            .checked_add_signed(self.end_offset)
            .with_context(|| format!("End offset moves {end} out of range"))?;

        if end <= start {
            end = end
                .checked_add_signed(Duration::hours(MIDNIGHT_CROSSING_HOURS))
                .with_context(|| format!("End {end} cannot cross midnight"))?;
        }

        Ok(Window { start, end })
    }
}

/// Find the window occurrence that contains `now`, or the next one after it.
///
/// Fails when a boundary cannot be resolved, or when no occurrence ending
/// after `now` is found within [`MAX_FORWARD_SEARCH_DAYS`] of its local date.
pub fn compute_root_window(
    now: DateTime<Utc>,
    tz: Tz,
    config: &RootConfig,
    solar: Option<&dyn SolarEventSource>,
) -> Result<Window> {
    let mut reference = now.with_timezone(&tz).date_naive();
    let mut window = config.window_for(reference, tz, solar)?;

    let mut advances = 0;
    while now >= window.end {
        if advances == MAX_FORWARD_SEARCH_DAYS {
            anyhow::bail!(
                "No window ending after {now} within {MAX_FORWARD_SEARCH_DAYS} days \
                 (last candidate {} to {})",
                window.start,
                window.end
            );
        }
        reference = reference
            .succ_opt()
            .ok_or_else(|| anyhow::anyhow!("Date out of range after {reference}"))?;
        window = config.window_for(reference, tz, solar)?;
        advances += 1;
    }

    if now < window.start {
        let previous_date = reference
            .pred_opt()
            .ok_or_else(|| anyhow::anyhow!("Date out of range before {reference}"))?;
        let previous = config.window_for(previous_date, tz, solar)?;
        if previous.contains(now) {
            window = previous;
        }
    }

    Ok(window)
}
