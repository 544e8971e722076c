//! Application-wide constants and defaults.

use std::time::Duration;

// # Application identity

pub const APP_NAME: &str = "audamo";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const SYSTEM_CONFIG_PATH: &str = "/usr/share/audamo/config.toml";
pub const LOG_FILE_PATH: &str = "/tmp/audamo.log";

// # Configuration defaults

pub const DEFAULT_MODE: &str = "time";
pub const DEFAULT_SUNRISE: &str = "07:00";
pub const DEFAULT_SUNSET: &str = "19:00";

// # Daemon

/// Time between two evaluations in daemon mode.
pub const DAEMON_POLL_INTERVAL: Duration = Duration::from_secs(10 * 60);

// # Geolocation

pub const GEOLOCATION_URL: &str = "https://ipinfo.io/json";
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

// # State

pub const STATE_MARKER_PATH: &str = "/tmp/audamo_current-theme";

// # GNOME settings schemas

pub const GNOME_INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
pub const GNOME_WM_SCHEMA: &str = "org.gnome.desktop.wm.preferences";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ARGUMENT_ERROR: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_LOCATION_UNAVAILABLE: i32 = 3;
pub const EXIT_SOLAR_ERROR: i32 = 4;
pub const EXIT_CUSTOM_SCRIPT_ERROR: i32 = 5;
pub const EXIT_APPLY_ERROR: i32 = 6;
