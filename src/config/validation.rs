//! Configuration validation.
//!
//! Converts the raw file structure into a [`Config`], rejecting anything that
//! would otherwise surface later as an untyped string: unknown modes, unparsable
//! or inverted times, half-specified or non-numeric coordinates.

use chrono::NaiveTime;
use std::path::PathBuf;

use super::{Config, Mode, RawConfig, RawCoordinate, RawThemeSettings, ThemeSettings};
use crate::constants::*;
use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// Validate a raw configuration into its typed form.
pub(crate) fn validate_config(raw: RawConfig) -> Result<Config> {
    let general = raw.general;

    let mode: Mode = general
        .mode
        .as_deref()
        .unwrap_or(DEFAULT_MODE)
        .parse()
        .map_err(Error::Config)?;

    let sunrise = parse_config_time("sunrise", general.sunrise.as_deref(), DEFAULT_SUNRISE)?;
    let sunset = parse_config_time("sunset", general.sunset.as_deref(), DEFAULT_SUNSET)?;
    // Only time mode reads these; location mode leaves them as inert defaults
    if mode == Mode::Time {
        validate_window(sunrise, sunset).map_err(Error::Config)?;
    }

    let latitude = parse_coordinate("latitude", general.latitude)?;
    let longitude = parse_coordinate("longitude", general.longitude)?;
    let location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
        (None, None) => None,
        _ => {
            return Err(Error::Config(
                "latitude and longitude must be set together (leave both empty for automatic detection)"
                    .to_string(),
            ));
        }
    };

    let custom_script = general
        .custom_script_path
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(expand_home);

    Ok(Config {
        mode,
        sunrise,
        sunset,
        location,
        light: theme_settings(raw.light),
        dark: theme_settings(raw.dark),
        custom_script,
    })
}

/// Parse a time of day written as `HH:MM` (or `HH:MM:SS`).
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// A daytime window must start before it ends on the same day.
pub fn validate_window(sunrise: NaiveTime, sunset: NaiveTime) -> std::result::Result<(), String> {
    if sunset <= sunrise {
        return Err(format!(
            "sunset ({}) must be later than sunrise ({}); windows crossing midnight are not supported",
            sunset.format("%H:%M"),
            sunrise.format("%H:%M")
        ));
    }
    Ok(())
}

fn parse_config_time(field: &str, value: Option<&str>, default: &str) -> Result<NaiveTime> {
    let value = value.unwrap_or(default);
    parse_time_of_day(value).ok_or_else(|| {
        Error::Config(format!(
            "Invalid {field} time '{value}'. Expected HH:MM (e.g. 07:30)"
        ))
    })
}

fn parse_coordinate(field: &str, value: Option<RawCoordinate>) -> Result<Option<f64>> {
    match value {
        None => Ok(None),
        Some(RawCoordinate::Number(n)) => Ok(Some(n)),
        Some(RawCoordinate::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| Error::Config(format!("Invalid {field} '{text}': not a number")))
        }
    }
}

fn theme_settings(raw: RawThemeSettings) -> ThemeSettings {
    fn non_empty(value: Option<String>) -> Option<String> {
        value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    ThemeSettings {
        theme: non_empty(raw.theme),
        icon: non_empty(raw.icon),
        cursor: non_empty(raw.cursor),
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
