//! Window calculation for root and child intervals.
//!
//! - [`root`]: finds the occurrence of a clock/solar window containing or
//!   following an instant, searching forward day by day
//! - [`child`]: derives a window from a parent's resolved boundaries
//! - [`transition`]: the next instant at which the active state flips
//!
//! All calculators return a [`Window`], a half-open `[start, end)` range of
//! UTC instants with `end > start`.

pub mod child;
pub mod root;
pub mod transition;

pub use child::{ChildConfig, Reference, compute_child_window};
pub use root::{RootConfig, compute_root_window};
pub use transition::next_transition;

use chrono::{DateTime, Utc};

/// A resolved half-open window `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Whether `now` lies inside the window. The start instant is inside,
    /// the end instant is not.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }
}
