//! Structured logging with box-drawing output.
//!
//! Every line is written through [`write_output`] with a prefix that ties it
//! to the current block:
//!
//! - `log_version!` opens the output with `┏ tzwindow vX.Y.Z ━━╸`
//! - `log_block_start!` starts a new block (`┃` spacer, then `┣ message`)
//! - `log_decorated!` continues a block (`┣ message`)
//! - `log_indented!` nests details under the last message (`┃   message`)
//! - `log_pipe!` inserts an empty `┃` spacer
//! - `log_end!` closes the output with `╹`
//! - `log_info!`, `log_warning!`, `log_error!`, `log_debug!` carry a colored
//!   `[LEVEL]` tag; `log_debug!` only prints when debug output is enabled
//!
//! Logging can be switched off entirely, which the `--json` output and the
//! test suites rely on to keep stdout clean.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Runtime switches for the logging macros.
pub struct Log;

impl Log {
    /// Enable or disable all log output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug_enabled(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug_enabled() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }
}

/// Write already formatted text to stdout and flush it.
pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

/// Format one log line from a prefix and a message.
///
/// Multi-line prefixes (such as the block start spacer) are passed through
/// unchanged; the message always ends the line.
pub fn format_line(prefix: &str, message: &str) -> String {
    format!("{prefix}{message}\n")
}

#[doc(hidden)]
pub fn emit(prefix: &str, message: std::fmt::Arguments<'_>) {
    if Log::is_enabled() {
        write_output(&format_line(prefix, &message.to_string()));
    }
}

/// Log a decorated message as part of the current block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::logger::emit("┣ ", format_args!($($arg)+))
    };
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::logger::emit("┃   ", format_args!($($arg)+))
    };
}

/// Log an empty spacer line.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit("┃", format_args!(""))
    };
}

/// Start a new block of related messages.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::logger::emit("┃\n┣ ", format_args!($($arg)+))
    };
}

/// Log the version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit(
            "┏ ",
            format_args!("tzwindow v{} ━━╸", env!("CARGO_PKG_VERSION")),
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit("╹", format_args!(""))
    };
}

/// Log an informational message with a green tag.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::logger::emit("┣[\x1b[32mINFO\x1b[0m] ", format_args!($($arg)+))
    };
}

/// Log a warning with a yellow tag.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::logger::emit("┣[\x1b[33mWARNING\x1b[0m] ", format_args!($($arg)+))
    };
}

/// Log an error with a red tag.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::logger::emit("┣[\x1b[31mERROR\x1b[0m] ", format_args!($($arg)+))
    };
}

/// Log a debug message; silent unless debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        if $crate::logger::Log::is_debug_enabled() {
            $crate::logger::emit("┣[\x1b[32mDEBUG\x1b[0m] ", format_args!($($arg)+))
        }
    };
}
