//! Status command - evaluate every interval once and display the result.
//!
//! Supports JSON and human-readable output. JSON output is a map from
//! interval name to its published attributes, or to an error message when
//! the interval could not be computed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::{Session, solar_source};
use crate::attributes::WindowAttributes;
use crate::logger::Log;
use crate::schedule::UpdateOutcome;
use crate::time_source::{FixedTimeSource, SystemTimeSource, TimeSource, parse_datetime_in_tz};

/// Handle the status command.
///
/// # Arguments
/// * `at` - Optional "YYYY-MM-DD HH:MM:SS" in the default timezone; now if absent
/// * `json` - Output in JSON format
pub fn handle_status_command(at: Option<&str>, json: bool) -> Result<()> {
    if json {
        // Keep stdout parseable
        Log::set_enabled(false);
    }

    let mut session = Session::load()?;
    let tz = session.intervals.default_timezone();

    let source: Box<dyn TimeSource> = match at {
        Some(value) => Box::new(FixedTimeSource(
            parse_datetime_in_tz(value, tz).context("Invalid --at time")?,
        )),
        None => Box::new(SystemTimeSource),
    };
    let now = source.now();

    let outcomes = session
        .intervals
        .update_all(now, solar_source(session.solar.as_ref()));

    if json {
        println!("{}", render_json(&session, &outcomes, tz)?);
    } else {
        display_human_readable(&session, &outcomes, &status_label(source.as_ref(), tz), now, tz);
    }
    Ok(())
}

/// Build the JSON document for the evaluated intervals.
pub fn render_json(session: &Session, outcomes: &[UpdateOutcome], tz: Tz) -> Result<String> {
    let mut map = serde_json::Map::new();

    for interval in session.intervals.iter() {
        let failure = outcomes
            .iter()
            .find(|o| o.name == interval.name())
            .and_then(|o| o.error.as_ref());

        let value = match (failure, WindowAttributes::from_interval(interval, tz)) {
            (None, Some(attrs)) => attrs.to_json(),
            (Some(e), _) => serde_json::json!({ "error": format!("{e:#}") }),
            (None, None) => serde_json::json!({ "error": "not computed" }),
        };
        map.insert(interval.name().to_string(), value);
    }

    serde_json::to_string_pretty(&map).context("Failed to serialize status")
}

fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Heading for human-readable output; `--at` evaluations are marked.
fn status_label(source: &dyn TimeSource, tz: Tz) -> String {
    let at = format_local(source.now(), tz);
    if source.is_simulated() {
        format!("Status at {at} (fixed time)")
    } else {
        format!("Status at {at}")
    }
}

/// Display interval state in human-readable format.
fn display_human_readable(
    session: &Session,
    outcomes: &[UpdateOutcome],
    label: &str,
    now: DateTime<Utc>,
    tz: Tz,
) {
    log_version!();
    log_block_start!("{label}");

    if session.intervals.is_empty() {
        log_indented!("No intervals configured");
    } else {
        log_indented!("{} interval(s), default zone {tz}", session.intervals.len());
    }
    if let Some(solar) = &session.solar {
        log_indented!(
            "Location: {:.4}, {:.4}",
            solar.latitude(),
            solar.longitude()
        );
    }

    for interval in session.intervals.iter() {
        if let Some(error) = outcomes
            .iter()
            .find(|o| o.name == interval.name())
            .and_then(|o| o.error.as_ref())
        {
            log_pipe!();
            log_error!("{}: {error:#}", interval.name());
            continue;
        }

        let Some(computed) = interval.computed() else {
            continue;
        };

        let state = if interval.is_active(now) {
            "active"
        } else {
            "inactive"
        };
        match interval.parent_reference() {
            Some(parent) => log_block_start!("{} ({state}, follows {parent})", interval.name()),
            None => log_block_start!("{} ({state})", interval.name()),
        }
        log_indented!("Start: {}", format_local(computed.window.start, tz));
        log_indented!("End:   {}", format_local(computed.window.end, tz));
        log_indented!("Next:  {}", format_local(computed.next_transition_utc, tz));
        if let Some(zone) = interval.resolved_timezone_name() {
            log_indented!("Zone:  {zone}");
        }
    }

    if let Some(next) = session.intervals.next_wakeup() {
        log_block_start!("Next wake-up: {}", format_local(next, tz));
    }
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::TimeZone;

    #[test]
    fn test_status_label_marks_fixed_time() {
        let at = Utc.with_ymd_and_hms(2024, 6, 21, 11, 0, 0).unwrap();
        let label = status_label(&FixedTimeSource(at), chrono_tz::Europe::London);
        assert_eq!(label, "Status at 2024-06-21 12:00:00 BST (fixed time)");

        assert!(!status_label(&SystemTimeSource, chrono_tz::UTC).contains("fixed time"));
    }

    #[test]
    fn test_render_json_reports_windows_and_errors() {
        let config = Config::from_toml_str(
            r#"
[[interval]]
name = "Work"
start = "09:00"
end = "17:00"

[[interval]]
name = "Reversed"
parent = "Work"
start_ref = "end"
end_ref = "start"
"#,
        )
        .unwrap();
        let mut session = Session::from_config(config).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let outcomes = session.intervals.update_all(now, None);

        let rendered = render_json(&session, &outcomes, chrono_tz::UTC).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["Work"]["start_time_utc"], "2024-01-01T09:00:00+00:00");
        assert_eq!(value["Work"]["is_child"], false);
        assert!(
            value["Reversed"]["error"]
                .as_str()
                .unwrap()
                .contains("Reversed")
        );
    }
}
