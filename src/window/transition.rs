//! Next transition scheduling.

use chrono::{DateTime, Duration, Utc};

use super::Window;
use crate::constants::FALLBACK_TRANSITION_HOURS;

/// Calculate the next instant at which the active state of `window` changes.
///
/// - Before the window: its start (turns active)
/// - Inside the window: its end (turns inactive)
/// - After the window: the start shifted by a day. Hosts recompute the whole
///   window before relying on this branch, since boundaries move from day to
///   day.
pub fn next_transition(now: DateTime<Utc>, window: &Window) -> DateTime<Utc> {
    if now < window.start {
        window.start
    } else if now < window.end {
        window.end
    } else {
        window.start + Duration::hours(FALLBACK_TRANSITION_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> Window {
        Window {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_before_start_returns_start() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        assert_eq!(next_transition(now, &window()), window().start);
    }

    #[test]
    fn test_inside_returns_end() {
        let w = window();
        assert_eq!(next_transition(w.start, &w), w.end);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(next_transition(now, &w), w.end);
    }

    #[test]
    fn test_after_end_falls_back_to_next_day_start() {
        let w = window();
        assert_eq!(
            next_transition(w.end, &w),
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
        );
    }
}
