//! GNOME backend driving `gsettings`.

use anyhow::{Context, Result, bail};
use std::process::Command;

use super::{AppearanceBackend, Setting};
use crate::constants::*;
use crate::decision::Theme;

/// Changes appearance through `gsettings set`.
pub struct GnomeBackend {
    program: String,
}

impl GnomeBackend {
    pub fn new() -> Self {
        Self {
            program: "gsettings".to_string(),
        }
    }

    /// Use a different executable in place of `gsettings`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn set(&self, schema: &str, key: &str, value: &str) -> Result<()> {
        log_debug!("{} set {schema} {key} {value}", self.program);

        let output = Command::new(&self.program)
            .args(["set", schema, key, value])
            .output()
            .with_context(|| format!("could not run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} set {schema} {key} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

impl Default for GnomeBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// The `gsettings` writes performed for one setting, in order.
pub(crate) fn commands_for(
    setting: Setting,
    value: &str,
    theme: Theme,
) -> Vec<(&'static str, &'static str, String)> {
    match setting {
        Setting::Theme => vec![
            (GNOME_INTERFACE_SCHEMA, "gtk-theme", value.to_string()),
            (GNOME_WM_SCHEMA, "theme", value.to_string()),
            (
                GNOME_INTERFACE_SCHEMA,
                "color-scheme",
                format!("prefer-{}", theme.label()),
            ),
        ],
        Setting::Icon => vec![(GNOME_INTERFACE_SCHEMA, "icon-theme", value.to_string())],
        Setting::Cursor => vec![(GNOME_INTERFACE_SCHEMA, "cursor-theme", value.to_string())],
    }
}

impl AppearanceBackend for GnomeBackend {
    fn apply_setting(&mut self, setting: Setting, value: &str, theme: Theme) -> Result<()> {
        for (schema, key, value) in commands_for(setting, value, theme) {
            self.set(schema, key, &value)?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "GNOME"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_sets_gtk_wm_and_color_scheme() {
        let commands = commands_for(Setting::Theme, "Adwaita-dark", Theme::Dark);
        assert_eq!(
            commands,
            vec![
                (GNOME_INTERFACE_SCHEMA, "gtk-theme", "Adwaita-dark".to_string()),
                (GNOME_WM_SCHEMA, "theme", "Adwaita-dark".to_string()),
                (GNOME_INTERFACE_SCHEMA, "color-scheme", "prefer-dark".to_string()),
            ]
        );
    }

    #[test]
    fn test_icon_and_cursor_keys() {
        assert_eq!(
            commands_for(Setting::Icon, "Papirus", Theme::Light),
            vec![(GNOME_INTERFACE_SCHEMA, "icon-theme", "Papirus".to_string())]
        );
        assert_eq!(
            commands_for(Setting::Cursor, "Bibata", Theme::Light),
            vec![(GNOME_INTERFACE_SCHEMA, "cursor-theme", "Bibata".to_string())]
        );
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let mut backend = GnomeBackend::with_program("/nonexistent/audamo-gsettings");
        let result = backend.apply_setting(Setting::Icon, "Adwaita", Theme::Light);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_status() {
        // `false` ignores its arguments and exits 1
        let mut backend = GnomeBackend::with_program("false");
        let err = backend
            .apply_setting(Setting::Cursor, "Bibata", Theme::Dark)
            .unwrap_err();
        assert!(err.to_string().contains("cursor-theme"), "{err}");
    }
}
