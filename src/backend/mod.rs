//! Desktop appearance backends.
//!
//! A backend knows how to change one appearance setting of the running desktop.
//! The applier decides which settings to change and in which order; the backend
//! only performs a single step and reports whether it worked.
//!
//! - [`gnome::GnomeBackend`]: `gsettings` on the GNOME interface schemas
//! - [`testing::RecordingBackend`]: records calls, behind `testing-support`

use std::fmt;

use crate::decision::Theme;

pub mod gnome;
#[cfg(any(test, feature = "testing-support"))]
pub mod testing;

pub use gnome::GnomeBackend;

/// One appearance setting, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    Theme,
    Icon,
    Cursor,
}

impl Setting {
    pub const ALL: [Setting; 3] = [Setting::Theme, Setting::Icon, Setting::Cursor];

    pub fn name(&self) -> &'static str {
        match self {
            Setting::Theme => "theme",
            Setting::Icon => "icon theme",
            Setting::Cursor => "cursor theme",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies appearance settings to the desktop session.
pub trait AppearanceBackend {
    /// Set `setting` to `value` as part of switching to `theme`.
    ///
    /// The theme is passed along because some desktops track the preferred
    /// color scheme separately from the theme name.
    fn apply_setting(&mut self, setting: Setting, value: &str, theme: Theme) -> anyhow::Result<()>;

    /// Human-readable backend name for log output.
    fn backend_name(&self) -> &'static str;
}
