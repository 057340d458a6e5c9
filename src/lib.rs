//! # tzwindow
//!
//! Timezone-aware time-of-day windows.
//!
//! An interval is either a **root**, whose boundaries come from clock times
//! or sunrise/sunset in a timezone, or a **child**, whose boundaries are
//! offsets from a root's resolved boundaries. Every update produces a
//! half-open `[start, end)` window in UTC plus the next instant at which the
//! window needs recalculating.
//!
//! ## Architecture
//!
//! - **Core Logic**: `time_spec`, `window` and `interval` resolve specs,
//!   compute root and child windows and hold per-interval state
//! - **Host**: `schedule` evaluates a configured set of intervals, roots
//!   before children, and reports the next wake-up
//! - **Publishing**: `attributes` and `parent` produce and consume the
//!   attribute record a child reads from its parent
//! - **Configuration**: `config` for TOML-based settings
//! - **Commands**: `commands` for the `status` and `simulate` CLI commands
//! - **Infrastructure**: `solar` for sunrise/sunset, `time_source`, logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod attributes;
pub mod commands;
pub mod config;
pub mod constants;
pub mod interval;
pub mod parent;
pub mod schedule;
pub mod solar;
pub mod time_source;
pub mod time_spec;
pub mod window;

pub use attributes::WindowAttributes;
pub use interval::{ComputedWindow, Interval, IntervalConfig, IntervalMode, UpdateContext};
pub use parent::ParentWindow;
pub use schedule::{IntervalSet, UpdateOutcome};
pub use time_spec::{SolarEvent, SolarEventSource, TimeSpec};
pub use window::{ChildConfig, Reference, RootConfig, Window};
