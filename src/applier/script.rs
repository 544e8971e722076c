//! User hook run after the appearance settings were applied.

use nix::unistd::{AccessFlags, access};
use std::path::Path;
use std::process::Command;

use crate::decision::Theme;
use crate::error::{Error, Result};

/// Run `script` with the theme label as its only argument.
///
/// The script must exist, be executable by the current user and exit with
/// status 0. Its output is forwarded to the log.
pub fn run_custom_script(script: &Path, theme: Theme) -> Result<()> {
    if !script.exists() {
        return Err(Error::CustomScript(format!(
            "{} does not exist",
            script.display()
        )));
    }
    if !script.is_file() || access(script, AccessFlags::X_OK).is_err() {
        return Err(Error::CustomScript(format!(
            "{} is not executable",
            script.display()
        )));
    }

    log_decorated!("Running custom script {}", script.display());

    let output = Command::new(script)
        .arg(theme.label())
        .output()
        .map_err(|e| Error::CustomScript(format!("could not run {}: {e}", script.display())))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        log_indented!("{line}");
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        log_indented!("{line}");
    }

    if !output.status.success() {
        return Err(Error::CustomScript(format!(
            "{} exited with {}",
            script.display(),
            output.status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn write_script(dir: &Path, name: &str, body: &str, mode: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_script_receives_label() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("received");
        let script = write_script(
            dir.path(),
            "hook.sh",
            &format!("echo \"$1\" > '{}'", out.display()),
            0o755,
        );

        run_custom_script(&script, Theme::Dark).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap().trim(), "dark");
    }

    #[test]
    fn test_missing_script() {
        let result = run_custom_script(Path::new("/nonexistent/audamo-hook.sh"), Theme::Light);
        assert!(matches!(result, Err(Error::CustomScript(msg)) if msg.contains("does not exist")));
    }

    #[test]
    fn test_non_executable_script() {
        let dir = tempdir().unwrap();
        let script = write_script(dir.path(), "hook.sh", "exit 0", 0o644);

        let result = run_custom_script(&script, Theme::Light);
        assert!(matches!(result, Err(Error::CustomScript(msg)) if msg.contains("not executable")));
    }

    #[test]
    fn test_non_zero_exit() {
        let dir = tempdir().unwrap();
        let script = write_script(dir.path(), "hook.sh", "exit 3", 0o755);

        let result = run_custom_script(&script, Theme::Light);
        assert!(matches!(result, Err(Error::CustomScript(_))));
    }
}
