//! Last-applied theme marker.
//!
//! A single file holding `light` or `dark`, replaced after every successful
//! apply so shell prompts, status bars and scripts can read the current
//! appearance without asking the desktop. The default location is the fixed
//! `/tmp/audamo_current-theme` that existing prompt and bar snippets read.
//!
//! Concurrent instances are not coordinated: the last writer wins.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::decision::Theme;

/// Location of the marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMarker {
    path: PathBuf,
}

impl StateMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(STATE_MARKER_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the marker with `theme`'s label.
    ///
    /// The label is written to a temporary file in the same directory and
    /// renamed over the marker, so readers see either the old or the new
    /// content, never a partial write.
    pub fn write(&self, theme: Theme) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory {}", dir.display()))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        temp.write_all(theme.label().as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        log_debug!("Wrote '{}' to {}", theme.label(), self.path.display());
        Ok(())
    }

    /// Read the last applied theme, `None` if the marker is missing or holds
    /// anything other than a theme label.
    pub fn read(&self) -> Option<Theme> {
        let content = fs::read_to_string(&self.path).ok()?;
        match content.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl Default for StateMarker {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let marker = StateMarker::new(dir.path().join("nested").join("current-theme"));

        assert_eq!(marker.read(), None);
        marker.write(Theme::Dark).unwrap();
        assert_eq!(fs::read_to_string(marker.path()).unwrap(), "dark");
        assert_eq!(marker.read(), Some(Theme::Dark));

        marker.write(Theme::Light).unwrap();
        assert_eq!(marker.read(), Some(Theme::Light));
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let dir = tempdir().unwrap();
        let marker = StateMarker::new(dir.path().join("current-theme"));
        marker.write(Theme::Light).unwrap();
        marker.write(Theme::Dark).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_garbage_content_reads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("current-theme");
        fs::write(&path, "sepia").unwrap();
        assert_eq!(StateMarker::new(path).read(), None);
    }

    #[test]
    #[serial]
    fn test_default_path_ignores_runtime_dir() {
        let original = std::env::var_os("XDG_RUNTIME_DIR");

        unsafe { std::env::set_var("XDG_RUNTIME_DIR", "/run/user/1000") };
        assert_eq!(
            StateMarker::default().path(),
            Path::new("/tmp/audamo_current-theme")
        );

        match original {
            Some(value) => unsafe { std::env::set_var("XDG_RUNTIME_DIR", value) },
            None => unsafe { std::env::remove_var("XDG_RUNTIME_DIR") },
        }
    }
}
