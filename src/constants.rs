//! Application-wide constants.

// # Window Resolution

/// Maximum number of calendar days the root calculator advances past the
/// current local date while looking for an occurrence that has not ended.
pub const MAX_FORWARD_SEARCH_DAYS: u32 = 365;

/// Hours added to a window's end when it would otherwise not follow its start.
pub const MIDNIGHT_CROSSING_HOURS: i64 = 24;

/// Hours added to a past window's start to produce the fallback transition.
pub const FALLBACK_TRANSITION_HOURS: i64 = 24;

/// Largest boundary offset, in days either way, accepted from configuration.
pub const MAX_OFFSET_DAYS: i64 = 366;

// # Time Specifications

pub const SPEC_SUNRISE: &str = "sunrise";
pub const SPEC_SUNSET: &str = "sunset";

// # Child References

pub const REF_START: &str = "start";
pub const REF_END: &str = "end";

// # Published Attributes

/// Timezone label published when no zone has been resolved.
pub const DEFAULT_TIMEZONE_LABEL: &str = "Default (System)";

// # Configuration

pub const CONFIG_DIR_NAME: &str = "tzwindow";
pub const CONFIG_FILE_NAME: &str = "tzwindow.toml";
pub const GEO_FILE_NAME: &str = "geo.toml";
pub const DEFAULT_TIMEZONE: &str = "UTC";

// # Simulation

/// Upper bound on evaluation steps in one `simulate` run.
pub const MAX_SIMULATION_STEPS: usize = 100_000;

// # Exit Codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
