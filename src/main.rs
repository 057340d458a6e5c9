//! Main application entry point.
//!
//! Parses the command line, applies the global switches (debug output and
//! the configuration directory) and dispatches to a command handler in
//! [`tzwindow::commands`]. Errors are printed with their full context chain
//! and turn into a non-zero exit code.

use anyhow::Result;

use tzwindow::args::{self, CliAction, ParsedArgs};
use tzwindow::commands;
use tzwindow::config;
use tzwindow::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use tzwindow::logger::Log;
use tzwindow::{log_end, log_error, log_pipe};

fn apply_global_flags(debug_enabled: bool, config_dir: Option<String>) -> Result<()> {
    Log::set_debug_enabled(debug_enabled);
    config::set_config_dir(config_dir)
}

fn run(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(EXIT_SUCCESS)
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(EXIT_SUCCESS)
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(EXIT_FAILURE)
        }
        CliAction::Status {
            debug_enabled,
            config_dir,
            at,
            json,
        } => {
            apply_global_flags(debug_enabled, config_dir)?;
            commands::status::handle_status_command(at.as_deref(), json)?;
            Ok(EXIT_SUCCESS)
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            start_time,
            end_time,
        } => {
            apply_global_flags(debug_enabled, config_dir)?;
            commands::simulate::handle_simulate_command(&start_time, &end_time)?;
            Ok(EXIT_SUCCESS)
        }
    }
}

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match run(parsed_args.action) {
        Ok(code) => code,
        Err(e) => {
            // Errors must be visible even when JSON output silenced the logger
            Log::set_enabled(true);
            log_pipe!();
            log_error!("{e:#}");
            log_end!();
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}
