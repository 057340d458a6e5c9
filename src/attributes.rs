//! Published attributes of an interval.
//!
//! The attribute record is what a host exposes for an interval: the three
//! computed instants in UTC and projected into a display zone, plus the
//! interval's relationship and zone. Child intervals read their parent's
//! record back through [`crate::parent::ParentWindow::from_attributes`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::constants::DEFAULT_TIMEZONE_LABEL;
use crate::interval::Interval;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowAttributes {
    pub start_time_local: String,
    pub end_time_local: String,
    pub next_update_local: String,
    pub start_time_utc: String,
    pub end_time_utc: String,
    pub next_update_utc: String,
    pub is_child: bool,
    pub parent_entity: Option<String>,
    pub timezone: String,
}

fn local_iso(instant: DateTime<Utc>, display_tz: Tz) -> String {
    instant.with_timezone(&display_tz).to_rfc3339()
}

impl WindowAttributes {
    /// Build the record for `interval`, with local fields in `display_tz`.
    ///
    /// Returns `None` until the interval has been computed at least once.
    pub fn from_interval(interval: &Interval, display_tz: Tz) -> Option<Self> {
        let computed = interval.computed()?;
        let start = computed.window.start;
        let end = computed.window.end;
        let next = computed.next_transition_utc;

        Some(Self {
            start_time_local: local_iso(start, display_tz),
            end_time_local: local_iso(end, display_tz),
            next_update_local: local_iso(next, display_tz),
            start_time_utc: start.to_rfc3339(),
            end_time_utc: end.to_rfc3339(),
            next_update_utc: next.to_rfc3339(),
            is_child: interval.is_child(),
            parent_entity: interval.parent_reference().map(str::to_string),
            timezone: interval
                .resolved_timezone_name()
                .unwrap_or(DEFAULT_TIMEZONE_LABEL)
                .to_string(),
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
