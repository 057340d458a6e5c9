//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the `status` and
//! `simulate` commands along with the standard help, version, config and
//! debug flags.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Evaluate all intervals once and print their state
    Status {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// Evaluate at this local time instead of now
        at: Option<String>,
        json: bool,
    },
    /// Replay transitions between two local times
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        start_time: String,
        end_time: String,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or incomplete arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name. With no command, `status` is
    /// assumed. Help and version take precedence over everything else.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut json = false;
        let mut at: Option<String> = None;
        let mut config_dir: Option<String> = None;
        let mut command: Option<String> = None;
        let mut positional: Vec<String> = Vec::new();
        let mut unknown_arg_found = false;

        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => display_help = true,
                "-V" | "-v" | "--version" => display_version = true,
                "-d" | "--debug" => debug_enabled = true,
                "--json" => json = true,
                "-c" | "--config" => match iter.next() {
                    Some(dir) => config_dir = Some(dir),
                    None => {
                        log_warning!("Missing directory after {arg}");
                        unknown_arg_found = true;
                    }
                },
                "--at" => match iter.next() {
                    Some(value) => at = Some(value),
                    None => {
                        log_warning!("Missing time after --at");
                        unknown_arg_found = true;
                    }
                },
                "status" | "simulate" if command.is_none() => command = Some(arg),
                other if other.starts_with('-') => {
                    log_warning!("Unknown argument: {other}");
                    unknown_arg_found = true;
                }
                _ => positional.push(arg),
            }
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help {
            CliAction::ShowHelp
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else {
            match command.as_deref() {
                None | Some("status") if positional.is_empty() => CliAction::Status {
                    debug_enabled,
                    config_dir,
                    at,
                    json,
                },
                Some("simulate") if positional.len() == 2 && at.is_none() && !json => {
                    let mut positional = positional.into_iter();
                    match (positional.next(), positional.next()) {
                        (Some(start_time), Some(end_time)) => CliAction::Simulate {
                            debug_enabled,
                            config_dir,
                            start_time,
                            end_time,
                        },
                        _ => CliAction::ShowHelpDueToError,
                    }
                }
                Some("simulate") => {
                    log_warning!("simulate takes exactly two times: <start> <end>");
                    CliAction::ShowHelpDueToError
                }
                _ => {
                    log_warning!("Unexpected arguments: {}", positional.join(" "));
                    CliAction::ShowHelpDueToError
                }
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    log_end!();
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("tzwindow [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("status [--at <time>] [--json]");
    log_indented!("                       Show every interval's window (default)");
    log_indented!("simulate <start> <end> Replay every transition between two times");
    log_block_start!("Times use the format \"YYYY-MM-DD HH:MM:SS\" in the default timezone");
    log_end!();
}
