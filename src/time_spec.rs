//! Time specifications and their resolution to UTC instants.
//!
//! A window boundary is configured either as a wall-clock time (`HH:MM` or
//! `HH:MM:SS`) or as a solar event (`sunrise` / `sunset`). Clock times are
//! combined with a calendar date in the window's timezone; solar events are
//! delegated to a [`SolarEventSource`] supplied by the caller for each
//! resolution.

use anyhow::{Context, Result};
use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

use crate::constants::{SPEC_SUNRISE, SPEC_SUNSET};

/// A solar event a boundary can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEvent {
    Sunrise,
    Sunset,
}

impl SolarEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SolarEvent::Sunrise => SPEC_SUNRISE,
            SolarEvent::Sunset => SPEC_SUNSET,
        }
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves solar events to UTC instants for a calendar date.
///
/// Returning `None` means the event does not occur on that date at the
/// resolver's location (polar day or night). Closures of the shape
/// `Fn(SolarEvent, NaiveDate) -> Option<DateTime<Utc>>` implement this trait,
/// which keeps test doubles and host adapters short.
#[cfg_attr(test, mockall::automock)]
pub trait SolarEventSource {
    fn event_time(&self, event: SolarEvent, date: NaiveDate) -> Option<DateTime<Utc>>;
}

impl<F> SolarEventSource for F
where
    F: Fn(SolarEvent, NaiveDate) -> Option<DateTime<Utc>>,
{
    fn event_time(&self, event: SolarEvent, date: NaiveDate) -> Option<DateTime<Utc>> {
        self(event, date)
    }
}

/// A parsed boundary specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    /// Anchored to a solar event on the reference date.
    Solar(SolarEvent),
    /// A wall-clock time in the window's timezone.
    Clock(NaiveTime),
}

impl TimeSpec {
    pub fn is_solar(&self) -> bool {
        matches!(self, TimeSpec::Solar(_))
    }
}

impl FromStr for TimeSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            SPEC_SUNRISE => return Ok(TimeSpec::Solar(SolarEvent::Sunrise)),
            SPEC_SUNSET => return Ok(TimeSpec::Solar(SolarEvent::Sunset)),
            _ => {}
        }

        let fields = s
            .split(':')
            .map(|field| field.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Invalid time '{s}': fields must be integers"))?;

        let time = match fields.as_slice() {
            [hour, minute] => NaiveTime::from_hms_opt(*hour, *minute, 0),
            [hour, minute, second] => NaiveTime::from_hms_opt(*hour, *minute, *second),
            _ => anyhow::bail!(
                "Invalid time format '{s}': expected HH:MM, HH:MM:SS, 'sunrise' or 'sunset'"
            ),
        };

        time.map(TimeSpec::Clock)
            .ok_or_else(|| anyhow::anyhow!("Invalid time '{s}': field out of range"))
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpec::Solar(event) => write!(f, "{event}"),
            TimeSpec::Clock(time) => write!(f, "{}", time.format("%H:%M:%S")),
        }
    }
}

/// Resolve a boundary specification to a UTC instant for `date`.
///
/// Clock times are read as wall-clock time on `date` in `tz`. Solar specs
/// require `solar` and fail when it is absent or reports no event.
pub fn resolve(
    spec: &TimeSpec,
    date: NaiveDate,
    tz: Tz,
    solar: Option<&dyn SolarEventSource>,
) -> Result<DateTime<Utc>> {
    match spec {
        TimeSpec::Solar(event) => {
            let source = solar.ok_or_else(|| {
                anyhow::anyhow!("No solar event source available to resolve {event}")
            })?;
            source
                .event_time(*event, date)
                .ok_or_else(|| anyhow::anyhow!("Could not calculate {event} for {date}"))
        }
        TimeSpec::Clock(time) => Ok(local_to_utc(tz, date.and_time(*time))),
    }
}

/// Convert a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times that
/// fall into a gap (clocks going forward) are read with the offset in force
/// before the gap.
pub fn local_to_utc(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = tz
                .offset_from_utc_datetime(&(naive - Duration::days(1)))
                .fix();
            let utc_naive = naive - Duration::seconds(i64::from(before_gap.local_minus_utc()));
            Utc.from_utc_datetime(&utc_naive)
        }
    }
}
