//! Configuration system for audamo.
//!
//! The configuration file is TOML with three tables. `[general]` selects how the
//! day/night boundary is found, `[light]` and `[dark]` name the assets applied for
//! each theme:
//!
//! ```toml
//! [general]
//! mode = "location"        # "time" or "location"
//! sunrise = "07:00"        # HH:MM, used in time mode
//! sunset = "19:00"         # HH:MM, used in time mode
//! latitude = ""            # empty = detect via IP geolocation
//! longitude = ""
//! custom-script-path = ""  # optional, called as `<script> light|dark`
//!
//! [light]
//! theme = "Adwaita"
//! icon = "Adwaita"
//! cursor = ""              # empty = leave unchanged
//!
//! [dark]
//! theme = "Adwaita-dark"
//! icon = "Adwaita"
//! cursor = ""
//! ```
//!
//! The file is parsed into a raw, loosely typed structure and validated exactly
//! once into [`Config`]. Everything downstream works with the validated value and
//! never re-checks strings. A fresh `Config` is loaded for every evaluation so
//! edits take effect without restarting the daemon.

pub mod loading;
pub mod validation;

use chrono::NaiveTime;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::decision::Theme;
use crate::geo::Coordinates;

pub use loading::{get_config_path, load_from_path};

/// How the day/night window is determined when no override is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fixed sunrise/sunset times from the configuration.
    Time,
    /// Sunrise/sunset computed for the configured or detected location.
    Location,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Time => "time",
            Mode::Location => "location",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Mode::Time),
            "location" => Ok(Mode::Location),
            other => Err(format!(
                "Invalid mode '{other}'. Must be one of: time, location"
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assets applied for one theme. `None` leaves the setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSettings {
    pub theme: Option<String>,
    pub icon: Option<String>,
    pub cursor: Option<String>,
}

/// Validated configuration snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    /// Fixed coordinates, or `None` to detect the location automatically.
    pub location: Option<Coordinates>,
    pub light: ThemeSettings,
    pub dark: ThemeSettings,
    pub custom_script: Option<PathBuf>,
}

impl Config {
    /// Load and validate the file at `path`.
    pub fn load_from_path(path: &Path) -> crate::error::Result<Self> {
        load_from_path(path)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        loading::parse_config(content)
    }

    pub fn settings_for(&self, theme: Theme) -> &ThemeSettings {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }

    /// Print the resolved configuration (`--print-config`).
    pub fn log_config(&self, source: &Path) {
        log_block_start!("Loaded configuration from {}", source.display());
        log_indented!("Mode: {}", self.mode);

        match self.mode {
            Mode::Time => {
                log_indented!("Sunrise: {}", self.sunrise.format("%H:%M"));
                log_indented!("Sunset: {}", self.sunset.format("%H:%M"));
            }
            Mode::Location => match self.location {
                Some(coords) => log_indented!("Location: {coords}"),
                None => log_indented!("Location: automatic (IP geolocation)"),
            },
        }

        for theme in [Theme::Light, Theme::Dark] {
            let settings = self.settings_for(theme);
            log_decorated!("{} theme", theme.display_name());
            log_indented!("Theme: {}", settings.theme.as_deref().unwrap_or("(unchanged)"));
            log_indented!("Icons: {}", settings.icon.as_deref().unwrap_or("(unchanged)"));
            log_indented!("Cursor: {}", settings.cursor.as_deref().unwrap_or("(unchanged)"));
        }

        if let Some(ref script) = self.custom_script {
            log_decorated!("Custom script: {}", script.display());
        }
    }
}

// # Raw file layout

/// The file as written by the user, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub(crate) general: RawGeneral,
    #[serde(default)]
    pub(crate) light: RawThemeSettings,
    #[serde(default)]
    pub(crate) dark: RawThemeSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct RawGeneral {
    pub(crate) mode: Option<String>,
    pub(crate) sunrise: Option<String>,
    pub(crate) sunset: Option<String>,
    pub(crate) latitude: Option<RawCoordinate>,
    pub(crate) longitude: Option<RawCoordinate>,
    pub(crate) custom_script_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawThemeSettings {
    pub(crate) theme: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) cursor: Option<String>,
}

/// Coordinates may be written as numbers or as strings (`""` = automatic).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCoordinate {
    Number(f64),
    Text(String),
}
