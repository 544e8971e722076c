//! Theme applier.
//!
//! Applying a theme is a short sequence of independent steps:
//!
//! 1. GTK theme, icon theme and cursor theme, in that order, through the
//!    [`AppearanceBackend`]. Unset values are skipped. A failing step is logged
//!    and the remaining steps still run.
//! 2. The custom script, if one is configured. Its failure is returned.
//! 3. The state marker, written only when nothing above returned an error.
//!
//! Applying the same theme twice issues the same calls again; the desktop
//! treats repeated writes of an unchanged value as no-ops.

pub mod script;

use crate::assets::{AssetDirs, InstalledAssets};
use crate::backend::{AppearanceBackend, Setting};
use crate::config::Config;
use crate::decision::Theme;
use crate::error::{Error, Result};
use crate::state::StateMarker;

pub use script::run_custom_script;

/// Outcome of the setting steps of one apply.
#[derive(Debug)]
pub struct ApplyReport {
    pub theme: Theme,
    pub applied: Vec<Setting>,
    pub skipped: Vec<Setting>,
    /// Steps that failed, as [`Error::ApplyStep`].
    pub failed: Vec<Error>,
    pub marker_written: bool,
}

impl ApplyReport {
    fn new(theme: Theme) -> Self {
        Self {
            theme,
            applied: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            marker_written: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Applier {
    backend: Box<dyn AppearanceBackend>,
    marker: StateMarker,
    asset_dirs: Option<AssetDirs>,
}

impl Applier {
    /// Applier checking names against the system's installed assets.
    pub fn new(backend: Box<dyn AppearanceBackend>, marker: StateMarker) -> Self {
        Self {
            backend,
            marker,
            asset_dirs: Some(AssetDirs::system()),
        }
    }

    /// Look for installed assets in `dirs` instead of the system locations.
    pub fn with_asset_dirs(mut self, dirs: AssetDirs) -> Self {
        self.asset_dirs = Some(dirs);
        self
    }

    /// Apply names without checking whether they are installed.
    pub fn without_asset_check(mut self) -> Self {
        self.asset_dirs = None;
        self
    }

    /// Apply `theme` using the settings `config` holds for it.
    ///
    /// Returns the custom script's error if it fails; setting failures only
    /// show up in the report.
    pub fn apply(&mut self, theme: Theme, config: &Config) -> Result<ApplyReport> {
        let settings = config.settings_for(theme);
        let mut report = ApplyReport::new(theme);

        log_block_start!(
            "Applying {} theme via {}",
            theme.label(),
            self.backend.backend_name()
        );

        // Rescanned every time so newly installed themes are picked up
        let installed = self.asset_dirs.as_ref().map(InstalledAssets::scan);

        for setting in Setting::ALL {
            let value = match setting {
                Setting::Theme => settings.theme.as_deref(),
                Setting::Icon => settings.icon.as_deref(),
                Setting::Cursor => settings.cursor.as_deref(),
            };
            let Some(value) = value else {
                log_debug!("No {setting} configured, leaving it unchanged");
                report.skipped.push(setting);
                continue;
            };

            if let Some(ref installed) = installed
                && !installed.contains(setting, value)
            {
                log_warning!("{setting} '{value}' is not installed; applying it anyway");
            }

            match self.backend.apply_setting(setting, value, theme) {
                Ok(()) => {
                    log_indented!("Set {setting} to {value}");
                    report.applied.push(setting);
                }
                Err(e) => {
                    let err = Error::ApplyStep {
                        setting: setting.name(),
                        value: value.to_string(),
                        reason: format!("{e:#}"),
                    };
                    log_error!("{err}");
                    report.failed.push(err);
                }
            }
        }

        if let Some(ref script) = config.custom_script {
            run_custom_script(script, theme)?;
        }

        match self.marker.write(theme) {
            Ok(()) => report.marker_written = true,
            Err(e) => log_warning!("Could not record current theme: {e:#}"),
        }

        Ok(report)
    }
}
