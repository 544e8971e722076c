//! Application entry point.
//!
//! Parses the command line, then either prints information (`--help`,
//! `--version`, `--list-themes`, `--print-config`), evaluates and applies once,
//! or hands over to the daemon loop. This is the only place where errors turn
//! into process exit codes.

#[macro_use]
extern crate audamo;

use audamo::applier::Applier;
use audamo::args::{self, CliAction, ParsedArgs, RunOptions};
use audamo::assets::InstalledAssets;
use audamo::backend::GnomeBackend;
use audamo::config::{self, Config};
use audamo::constants::*;
use audamo::daemon::Daemon;
use audamo::error::Error;
use audamo::geo::GeoServices;
use audamo::logger::Log;
use audamo::signals::setup_signal_handler;
use audamo::state::StateMarker;

fn main() -> anyhow::Result<()> {
    let parsed = match ParsedArgs::parse(std::env::args()) {
        Ok(parsed) => parsed,
        Err(e) => exit_with(&e),
    };

    match parsed.action {
        CliAction::ShowHelp => args::display_help(),
        CliAction::ShowVersion => {
            log_version!();
            log_end!();
        }
        CliAction::ListThemes => {
            log_version!();
            InstalledAssets::discover().log_listing();
            log_end!();
        }
        CliAction::PrintConfig {
            debug_enabled,
            config_path,
        } => {
            Log::set_debug(debug_enabled);
            log_version!();
            let path = config::get_config_path(config_path.as_deref())
                .unwrap_or_else(|e| exit_with(&e));
            let config = Config::load_from_path(&path).unwrap_or_else(|e| exit_with(&e));
            config.log_config(&path);
            log_end!();
        }
        CliAction::Run(options) => {
            let code = run(options)?;
            std::process::exit(code);
        }
    }

    Ok(())
}

/// Evaluate once or run the daemon; returns the exit code.
fn run(options: RunOptions) -> anyhow::Result<i32> {
    Log::set_debug(options.debug_enabled);
    log_version!();

    // Keep the guard alive so the mirror is flushed on exit
    let _log_guard = match Log::start_file_mirror(LOG_FILE_PATH) {
        Ok(guard) => Some(guard),
        Err(e) => {
            log_warning!("Could not open log file {LOG_FILE_PATH}: {e:#}");
            None
        }
    };

    let config_path = match config::get_config_path(options.config_path.as_deref()) {
        Ok(path) => path,
        Err(e) => return Ok(report_fatal(&e)),
    };
    log_block_start!("Using configuration {}", config_path.display());

    let applier = Applier::new(Box::new(GnomeBackend::new()), StateMarker::default());
    let mut daemon = Daemon::new(
        config_path,
        options.overrides,
        GeoServices::system(),
        applier,
    );

    if options.daemon {
        let signal_state = setup_signal_handler()?;
        daemon.run(&signal_state);
        log_end!();
        return Ok(EXIT_SUCCESS);
    }

    match daemon.tick() {
        Ok((theme, _)) => {
            log_block_start!("{} theme applied", theme.display_name());
            log_end!();
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report_fatal(&e)),
    }
}

/// Log a fatal error and return its exit code.
fn report_fatal(error: &Error) -> i32 {
    log_error_exit!("{}: {error}", error.kind());
    error.exit_code()
}

/// Log a fatal error and exit with its code.
fn exit_with(error: &Error) -> ! {
    std::process::exit(report_fatal(error))
}
