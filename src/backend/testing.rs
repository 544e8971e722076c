//! In-memory backend for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use super::{AppearanceBackend, Setting};
use crate::decision::Theme;

/// One recorded `apply_setting` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSetting {
    pub setting: Setting,
    pub value: String,
    pub theme: Theme,
}

/// Backend that records every call and fails the settings it is told to.
///
/// Clones share the same log, so a test can keep a handle after moving the
/// backend into an applier.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<AppliedSetting>>>,
    failing: Arc<Mutex<HashSet<Setting>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call for `setting` fail.
    pub fn fail_on(&self, setting: Setting) {
        self.failing.lock().unwrap().insert(setting);
    }

    /// Successful calls in order.
    pub fn calls(&self) -> Vec<AppliedSetting> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl AppearanceBackend for RecordingBackend {
    fn apply_setting(&mut self, setting: Setting, value: &str, theme: Theme) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(&setting) {
            anyhow::bail!("simulated failure for {setting}");
        }
        self.calls.lock().unwrap().push(AppliedSetting {
            setting,
            value: value.to_string(),
            theme,
        });
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}
