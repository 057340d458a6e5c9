//! A configured set of intervals evaluated together.
//!
//! Roots are always evaluated before children so a child sees its parent's
//! freshly published window. One interval failing never stops the others;
//! each update reports its own [`UpdateOutcome`].

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::{HashMap, HashSet};

use crate::attributes::WindowAttributes;
use crate::config::Config;
use crate::interval::{Interval, UpdateContext};
use crate::parent::ParentWindow;
use crate::time_spec::SolarEventSource;

/// Result of updating one interval.
#[derive(Debug)]
pub struct UpdateOutcome {
    pub name: String,
    pub error: Option<anyhow::Error>,
}

impl UpdateOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct IntervalSet {
    intervals: Vec<Interval>,
    default_timezone: Tz,
}

impl IntervalSet {
    pub fn new(intervals: Vec<Interval>, default_timezone: Tz) -> Self {
        Self {
            intervals,
            default_timezone,
        }
    }

    /// Build the set described by a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let intervals = config
            .interval_configs()?
            .into_iter()
            .map(Interval::new)
            .collect();
        Ok(Self::new(intervals, config.default_timezone()?))
    }

    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Interval> {
        self.intervals.iter().find(|i| i.name() == name)
    }

    /// Re-evaluate every interval at `now`.
    pub fn update_all(
        &mut self,
        now: DateTime<Utc>,
        solar: Option<&dyn SolarEventSource>,
    ) -> Vec<UpdateOutcome> {
        self.update_where(now, solar, |_| true)
    }

    /// Re-evaluate intervals whose next transition has been reached, plus the
    /// children of any root that was re-evaluated.
    ///
    /// Intervals that have never been computed are always due.
    pub fn update_due(
        &mut self,
        now: DateTime<Utc>,
        solar: Option<&dyn SolarEventSource>,
    ) -> Vec<UpdateOutcome> {
        self.update_where(now, solar, |interval| {
            interval.next_transition_utc().is_none_or(|next| next <= now)
        })
    }

    fn update_where(
        &mut self,
        now: DateTime<Utc>,
        solar: Option<&dyn SolarEventSource>,
        is_due: impl Fn(&Interval) -> bool,
    ) -> Vec<UpdateOutcome> {
        let mut outcomes = Vec::new();
        let mut refreshed_roots = HashSet::new();

        for interval in self.intervals.iter_mut().filter(|i| !i.is_child()) {
            if !is_due(interval) {
                continue;
            }
            let mut ctx = UpdateContext::new(now, self.default_timezone);
            if let Some(solar) = solar {
                ctx = ctx.with_solar(solar);
            }
            refreshed_roots.insert(interval.name().to_string());
            outcomes.push(apply_update(interval, &ctx));
        }

        let published: HashMap<String, ParentWindow> = self
            .intervals
            .iter()
            .filter(|i| !i.is_child())
            .filter_map(|i| Some((i.name().to_string(), i.published_window()?)))
            .collect();

        for interval in self.intervals.iter_mut().filter(|i| i.is_child()) {
            let parent_name = interval.parent_reference().unwrap_or_default();
            if !is_due(interval) && !refreshed_roots.contains(parent_name) {
                continue;
            }
            let mut ctx = UpdateContext::new(now, self.default_timezone);
            if let Some(parent) = published.get(parent_name) {
                ctx = ctx.with_parent(parent);
            }
            outcomes.push(apply_update(interval, &ctx));
        }

        outcomes
    }

    /// Earliest instant at which any interval needs re-evaluating.
    pub fn next_wakeup(&self) -> Option<DateTime<Utc>> {
        self.intervals
            .iter()
            .filter_map(Interval::next_transition_utc)
            .min()
    }

    /// Earliest transition strictly after `now`.
    ///
    /// Unlike [`next_wakeup`](Self::next_wakeup) this skips stale transitions
    /// left behind by intervals whose latest update failed.
    pub fn next_wakeup_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.intervals
            .iter()
            .filter_map(Interval::next_transition_utc)
            .filter(|next| *next > now)
            .min()
    }

    /// Names of the intervals active at `now`.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<&str> {
        self.intervals
            .iter()
            .filter(|i| i.is_active(now))
            .map(Interval::name)
            .collect()
    }

    /// Published attributes of every computed interval, keyed by name.
    pub fn attributes(&self, display_tz: Tz) -> Vec<(&str, WindowAttributes)> {
        self.intervals
            .iter()
            .filter_map(|i| Some((i.name(), WindowAttributes::from_interval(i, display_tz)?)))
            .collect()
    }
}

fn apply_update(interval: &mut Interval, ctx: &UpdateContext<'_>) -> UpdateOutcome {
    let error = match interval.update(ctx) {
        Ok(_) => None,
        Err(e) => {
            log_debug!("{e:#}");
            Some(e)
        }
    };
    UpdateOutcome {
        name: interval.name().to_string(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalConfig;
    use crate::window::{ChildConfig, Reference, RootConfig};
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn work_and_break() -> IntervalSet {
        IntervalSet::new(
            vec![
                // Child listed first to show ordering does not matter
                Interval::new(IntervalConfig::child(
                    "Break",
                    ChildConfig::new("Work")
                        .with_start(Reference::ParentStart, Duration::hours(3))
                        .with_end(Reference::ParentStart, Duration::hours(4)),
                )),
                Interval::new(IntervalConfig::root(
                    "Work",
                    RootConfig::new("09:00".parse().unwrap(), "17:00".parse().unwrap()),
                )),
            ],
            chrono_tz::UTC,
        )
    }

    #[test]
    fn test_update_all_evaluates_roots_before_children() {
        let mut set = work_and_break();
        let now = utc(2024, 1, 1, 12, 30);
        let outcomes = set.update_all(now, None);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(UpdateOutcome::is_ok));
        assert_eq!(outcomes[0].name, "Work");
        assert_eq!(set.active_at(now), vec!["Break", "Work"]);
        assert_eq!(
            set.get("Break").unwrap().resolved_start_utc(),
            Some(utc(2024, 1, 1, 12, 0))
        );
    }

    #[test]
    fn test_next_wakeup_is_earliest_transition() {
        let mut set = work_and_break();
        assert_eq!(set.next_wakeup(), None);

        set.update_all(utc(2024, 1, 1, 10, 0), None);
        // Work ends at 17:00, Break starts at 12:00
        assert_eq!(set.next_wakeup(), Some(utc(2024, 1, 1, 12, 0)));
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut set = IntervalSet::new(
            vec![
                Interval::new(IntervalConfig::root(
                    "Daylight",
                    RootConfig::new("sunrise".parse().unwrap(), "sunset".parse().unwrap()),
                )),
                Interval::new(IntervalConfig::root(
                    "Work",
                    RootConfig::new("09:00".parse().unwrap(), "17:00".parse().unwrap()),
                )),
                Interval::new(IntervalConfig::child("Shade", ChildConfig::new("Daylight"))),
            ],
            chrono_tz::UTC,
        );

        let outcomes = set.update_all(utc(2024, 1, 1, 10, 0), None);
        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(failed, vec!["Daylight", "Shade"]);
        assert!(set.get("Work").unwrap().is_active(utc(2024, 1, 1, 10, 0)));
    }

    #[test]
    fn test_update_due_only_touches_due_intervals() {
        let mut set = work_and_break();
        set.update_all(utc(2024, 1, 1, 10, 0), None);

        // Nothing is due before 12:00
        assert!(set.update_due(utc(2024, 1, 1, 11, 0), None).is_empty());

        let outcomes = set.update_due(utc(2024, 1, 1, 12, 0), None);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].name, "Break");
        assert!(outcomes[0].is_ok());
        assert_eq!(set.next_wakeup(), Some(utc(2024, 1, 1, 13, 0)));
    }

    #[test]
    fn test_children_follow_refreshed_parent() {
        let mut set = work_and_break();
        set.update_all(utc(2024, 1, 1, 10, 0), None);

        // At 17:00 Work rolls to the next day and Break follows it
        let outcomes = set.update_due(utc(2024, 1, 1, 17, 0), None);
        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Break"]);
        assert_eq!(
            set.get("Break").unwrap().resolved_start_utc(),
            Some(utc(2024, 1, 2, 12, 0))
        );
    }

    #[test]
    fn test_attributes_skip_uncomputed() {
        let mut set = work_and_break();
        assert!(set.attributes(chrono_tz::UTC).is_empty());
        set.update_all(utc(2024, 1, 1, 10, 0), None);
        let attrs = set.attributes(chrono_tz::UTC);
        assert_eq!(attrs.len(), 2);
        assert!(attrs.iter().any(|(name, a)| *name == "Break" && a.is_child));
    }
}
