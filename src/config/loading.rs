//! Configuration loading.
//!
//! Resolves which file to read and turns its contents into a validated
//! [`Config`]. All failures are reported as [`Error::Config`].

use std::fs;
use std::path::{Path, PathBuf};

use super::validation::validate_config;
use super::{Config, RawConfig};
use crate::constants::*;
use crate::error::{Error, Result};

/// Determine the configuration file to use.
///
/// An explicit path (from `--config`) must exist. Otherwise the user file at
/// `$XDG_CONFIG_HOME/audamo/config.toml` is preferred, then the system-wide
/// file shipped by packages.
pub fn get_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let user_path = user_config_path();
    if let Some(ref path) = user_path
        && path.is_file()
    {
        return Ok(path.clone());
    }

    let system_path = PathBuf::from(SYSTEM_CONFIG_PATH);
    if system_path.is_file() {
        if let Some(ref path) = user_path {
            log_pipe!();
            log_warning!("No config file found at {}", path.display());
            log_indented!("Using system config at {}", system_path.display());
        }
        return Ok(system_path);
    }

    Err(Error::Config(format!(
        "No configuration file found (looked in {} and {})",
        user_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "$XDG_CONFIG_HOME".to_string()),
        SYSTEM_CONFIG_PATH
    )))
}

/// `$XDG_CONFIG_HOME/audamo/config.toml`, if a config directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from a specific path. Never creates files.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config from {}: {e}",
            path.display()
        ))
    })?;

    parse_config(&content).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Parse and validate configuration text.
pub(crate) fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e.message())))?;

    validate_config(raw)
}
