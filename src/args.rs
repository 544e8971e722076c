//! Command-line argument parsing.
//!
//! Flags may appear in any order. `--help` and `--version` win over everything
//! else; any other problem (unknown flag, missing or malformed value,
//! conflicting flags) is an [`Error::Argument`].

use chrono::NaiveTime;
use std::path::PathBuf;

use crate::config::validation::{parse_time_of_day, validate_window};
use crate::decision::{Overrides, Theme};
use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// Settings for an evaluation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub daemon: bool,
    pub config_path: Option<PathBuf>,
    pub overrides: Overrides,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// Evaluate once, or keep evaluating with `--daemon`.
    Run(RunOptions),
    /// Print installed themes, icon themes and cursor themes.
    ListThemes,
    /// Print the resolved configuration.
    PrintConfig {
        debug_enabled: bool,
        config_path: Option<PathBuf>,
    },
    ShowHelp,
    ShowVersion,
}

/// Result of parsing command-line arguments.
#[derive(Debug)]
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse `args`, whose first item is the program name.
    pub fn parse<I, S>(args: I) -> Result<ParsedArgs>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return Ok(ParsedArgs {
                action: CliAction::ShowHelp,
            });
        }
        if args_vec.iter().any(|arg| arg == "--version" || arg == "-v") {
            return Ok(ParsedArgs {
                action: CliAction::ShowVersion,
            });
        }

        let mut options = RunOptions::default();
        let mut light = false;
        let mut dark = false;
        let mut list_themes = false;
        let mut print_config = false;

        let mut iter = args_vec.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--light" | "-l" => light = true,
                "--dark" | "-d" => dark = true,
                "--daemon" => options.daemon = true,
                "--debug" => options.debug_enabled = true,
                "--list-themes" => list_themes = true,
                "--print-config" => print_config = true,
                "--config" | "-c" => {
                    let path = next_value(&mut iter, arg)?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--time" => {
                    let sunrise = parse_time_arg(next_value(&mut iter, arg)?, "sunrise")?;
                    let sunset = parse_time_arg(next_value(&mut iter, arg)?, "sunset")?;
                    validate_window(sunrise, sunset)
                        .map_err(|msg| Error::Argument(format!("--time: {msg}")))?;
                    options.overrides.time_window = Some((sunrise, sunset));
                }
                "--location" => {
                    let latitude = parse_coordinate_arg(next_value(&mut iter, arg)?, "latitude")?;
                    let longitude =
                        parse_coordinate_arg(next_value(&mut iter, arg)?, "longitude")?;
                    options.overrides.location = Some(Coordinates::new(latitude, longitude));
                }
                other => {
                    return Err(Error::Argument(format!("Unknown argument: {other}")));
                }
            }
        }

        options.overrides.force = match (light, dark) {
            (true, true) => {
                return Err(Error::Argument(
                    "Cannot use --light and --dark together".to_string(),
                ));
            }
            (true, false) => Some(Theme::Light),
            (false, true) => Some(Theme::Dark),
            (false, false) => None,
        };

        let action = match (list_themes, print_config) {
            (true, true) => {
                return Err(Error::Argument(
                    "Cannot use --list-themes and --print-config together".to_string(),
                ));
            }
            (true, false) => CliAction::ListThemes,
            (false, true) => CliAction::PrintConfig {
                debug_enabled: options.debug_enabled,
                config_path: options.config_path,
            },
            (false, false) => CliAction::Run(options),
        };

        Ok(ParsedArgs { action })
    }
}

fn next_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| Error::Argument(format!("Missing value for {flag}")))
}

fn parse_time_arg(value: &str, what: &str) -> Result<NaiveTime> {
    parse_time_of_day(value).ok_or_else(|| {
        Error::Argument(format!(
            "Invalid {what} time '{value}' (expected HH:MM, e.g. 07:30)"
        ))
    })
}

fn parse_coordinate_arg(value: &str, what: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Argument(format!("Invalid {what} '{value}' (expected a number)")))
}

/// Print usage.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: audamo [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-l, --light                  Switch to the light theme");
    log_indented!("-d, --dark                   Switch to the dark theme");
    log_indented!("    --time SUNRISE SUNSET    Use this daytime window (HH:MM HH:MM)");
    log_indented!("    --location LAT LON       Use sunrise/sunset at these coordinates");
    log_indented!("    --daemon                 Keep running and re-evaluate every 10 minutes");
    log_indented!("-c, --config PATH            Use this configuration file");
    log_indented!("    --list-themes            List installed themes, icons and cursors");
    log_indented!("    --print-config           Show the resolved configuration");
    log_indented!("    --debug                  Show debug output");
    log_indented!("-v, --version                Show version information");
    log_indented!("-h, --help                   Show this help");
    log_pipe!();
    log_info!("Without options the theme is chosen from the configuration file.");
    log_indented!("A running daemon re-evaluates immediately on SIGUSR2.");
    log_indented!("The applied theme is recorded in /tmp/audamo_current-theme.");
    log_end!();
}
