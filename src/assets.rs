//! Discovery of installed GTK themes, icon themes and cursor themes.
//!
//! Searched: `$XDG_DATA_HOME` (or `~/.local/share`) and every entry of
//! `$XDG_DATA_DIRS` (default `/usr/local/share:/usr/share`), each with its
//! `themes/` and `icons/` subdirectories, plus the legacy `~/.themes` and
//! `~/.icons`. A directory under a theme root counts as a theme, a directory
//! under an icon root as an icon theme, and as a cursor theme too when it has a
//! `cursors/` subdirectory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::Setting;

/// Directories holding themes and icon themes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDirs {
    pub theme_dirs: Vec<PathBuf>,
    pub icon_dirs: Vec<PathBuf>,
}

impl AssetDirs {
    /// The standard XDG locations plus the legacy home directories.
    pub fn system() -> Self {
        let mut data_dirs = Vec::new();
        if let Some(data_home) = dirs::data_dir() {
            data_dirs.push(data_home);
        }
        let xdg_data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        data_dirs.extend(
            xdg_data_dirs
                .split(':')
                .filter(|entry| !entry.is_empty())
                .map(PathBuf::from),
        );

        let mut dirs = Self {
            theme_dirs: data_dirs.iter().map(|dir| dir.join("themes")).collect(),
            icon_dirs: data_dirs.iter().map(|dir| dir.join("icons")).collect(),
        };
        if let Some(home) = dirs::home_dir() {
            dirs.theme_dirs.push(home.join(".themes"));
            dirs.icon_dirs.push(home.join(".icons"));
        }
        dirs
    }
}

/// Installed asset names, sorted and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledAssets {
    pub themes: Vec<String>,
    pub icons: Vec<String>,
    pub cursors: Vec<String>,
}

impl InstalledAssets {
    /// Scan the standard locations.
    pub fn discover() -> Self {
        Self::scan(&AssetDirs::system())
    }

    pub fn scan(dirs: &AssetDirs) -> Self {
        let mut themes = BTreeSet::new();
        let mut icons = BTreeSet::new();
        let mut cursors = BTreeSet::new();

        for dir in &dirs.theme_dirs {
            themes.extend(subdirectories(dir));
        }
        for dir in &dirs.icon_dirs {
            for name in subdirectories(dir) {
                if dir.join(&name).join("cursors").is_dir() {
                    cursors.insert(name.clone());
                }
                icons.insert(name);
            }
        }

        Self {
            themes: themes.into_iter().collect(),
            icons: icons.into_iter().collect(),
            cursors: cursors.into_iter().collect(),
        }
    }

    /// Installed names for `setting`.
    pub fn names(&self, setting: Setting) -> &[String] {
        match setting {
            Setting::Theme => &self.themes,
            Setting::Icon => &self.icons,
            Setting::Cursor => &self.cursors,
        }
    }

    pub fn contains(&self, setting: Setting, name: &str) -> bool {
        self.names(setting).iter().any(|installed| installed == name)
    }

    /// Print everything found (`--list-themes`).
    pub fn log_listing(&self) {
        for (title, names) in [
            ("Themes", &self.themes),
            ("Icon themes", &self.icons),
            ("Cursor themes", &self.cursors),
        ] {
            log_block_start!("{title} ({})", names.len());
            if names.is_empty() {
                log_indented!("(none found)");
            }
            for name in names {
                log_indented!("{name}");
            }
        }
    }
}

fn subdirectories(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}
