//! Thin wrapper over the system `git` binary.

use crate::error::{ReleaseError, Result};
use std::path::Path;
use std::process::Command;

fn git_cmd(cwd: Option<&Path>) -> Command {
    let mut cmd = Command::new("git");
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd
}

/// Returns the full messages (`%B`) of every commit in `range`.
pub fn log_messages(range: &str, cwd: Option<&Path>) -> Result<String> {
    let output = git_cmd(cwd)
        .args(["log", "--format=%B", range])
        .output()
        .map_err(|e| ReleaseError::Git(format!("failed to run git log: {}", e)))?;

    if !output.status.success() {
        return Err(ReleaseError::Git(format!(
            "git log {} failed: {}",
            range,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Returns the URL of `remote`, or `None` if git or the remote is missing.
pub fn remote_url(remote: &str, cwd: Option<&Path>) -> Option<String> {
    let key = format!("remote.{}.url", remote);
    match git_cmd(cwd).args(["config", "--get", &key]).output() {
        Ok(output) if output.status.success() => {
            let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!url.is_empty()).then_some(url)
        }
        Ok(_) => {
            log::debug!("No {} configured", key);
            None
        }
        Err(e) => {
            log::debug!("Git not available: {}", e);
            None
        }
    }
}
