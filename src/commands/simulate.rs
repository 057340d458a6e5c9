//! Implementation of the simulate command for replaying transitions.
//!
//! A [`SimulatedTimeSource`] jumps straight from one wake-up to the next, so
//! the intervals are evaluated exactly when a real host would re-evaluate
//! them. Every time an interval becomes active or inactive, a [`Flip`] is
//! recorded.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::{Session, solar_source};
use crate::constants::MAX_SIMULATION_STEPS;
use crate::schedule::IntervalSet;
use crate::time_source::{SimulatedTimeSource, TimeSource, parse_datetime_in_tz};
use crate::time_spec::SolarEventSource;

/// One interval changing state during a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flip {
    pub at: DateTime<Utc>,
    pub name: String,
    pub active: bool,
}

/// Handle the simulate command.
///
/// # Arguments
/// * `start_time` - Start time in format "YYYY-MM-DD HH:MM:SS"
/// * `end_time` - End time in format "YYYY-MM-DD HH:MM:SS"
pub fn handle_simulate_command(start_time: &str, end_time: &str) -> Result<()> {
    let mut session = Session::load()?;
    let tz = session.intervals.default_timezone();

    let start = parse_datetime_in_tz(start_time, tz).context("Invalid start time")?;
    let end = parse_datetime_in_tz(end_time, tz).context("Invalid end time")?;
    let source = SimulatedTimeSource::new(start, end)?;

    log_version!();
    log_block_start!(
        "Simulating {} to {} ({tz})",
        start.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S"),
        end.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S")
    );

    let flips = run_simulation(
        &mut session.intervals,
        &source,
        solar_source(session.solar.as_ref()),
    )?;

    for flip in &flips {
        log_decorated!(
            "{}  {} {}",
            flip.at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z"),
            flip.name,
            if flip.active { "started" } else { "ended" }
        );
    }

    log_block_start!("{} transition(s)", flips.len());
    log_end!();
    Ok(())
}

/// Step `intervals` through every wake-up until `source` reaches its end.
///
/// Flips at the very start time describe the initial state: every interval
/// already active at the start is reported as starting there.
pub fn run_simulation(
    intervals: &mut IntervalSet,
    source: &SimulatedTimeSource,
    solar: Option<&dyn SolarEventSource>,
) -> Result<Vec<Flip>> {
    let mut flips = Vec::new();
    let mut active: HashSet<String> = HashSet::new();
    let mut reported_failures: HashSet<String> = HashSet::new();

    for _ in 0..MAX_SIMULATION_STEPS {
        let now = source.now();

        for outcome in intervals.update_due(now, solar) {
            match outcome.error {
                // Report each failing interval once
                Some(e) if reported_failures.insert(outcome.name.clone()) => {
                    log_warning!("{e:#}");
                }
                Some(_) => {}
                None => {
                    reported_failures.remove(&outcome.name);
                }
            }
        }

        let now_active: HashSet<String> = intervals
            .active_at(now)
            .into_iter()
            .map(str::to_string)
            .collect();

        // Keep configuration order in the report
        for interval in intervals.iter() {
            let name = interval.name();
            let was = active.contains(name);
            let is = now_active.contains(name);
            if was != is {
                flips.push(Flip {
                    at: now,
                    name: name.to_string(),
                    active: is,
                });
            }
        }
        active = now_active;

        if source.is_ended() {
            return Ok(flips);
        }

        match intervals.next_wakeup_after(now) {
            Some(next) => source.advance_to(next),
            None => {
                log_debug!("No further transitions after {now}");
                return Ok(flips);
            }
        }
    }

    anyhow::bail!(
        "Simulation stopped after {MAX_SIMULATION_STEPS} steps before reaching {}",
        source.end_time()
    )
}
