//! Shared helpers for relkit integration tests.
//!
//! These tests run the real binary against manifests written to temporary
//! directories.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A Home Assistant style manifest without a version field.
#[allow(unused)]
pub const INTEGRATION_MANIFEST: &str = r#"{
  "domain": "demo_alerts",
  "name": "Demo Alerts",
  "codeowners": ["@demo"],
  "config_flow": true,
  "iot_class": "cloud_polling"
}
"#;

/// Writes `content` to `name` inside a fresh temp dir.
#[allow(unused)]
pub fn create_manifest(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    (temp, path)
}

/// Helper to run `relkit set-version`
#[allow(unused)]
pub fn run_set_version(
    cwd: &Path,
    files: &[&Path],
    version: &str,
    extra_args: &[&str],
) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("relkit");
    cmd.arg("set-version");
    for file in files {
        cmd.arg("--file").arg(file);
    }
    cmd.arg("--version")
        .arg(version)
        .args(extra_args)
        .current_dir(cwd);

    cmd.assert()
}

/// Helper to run `relkit notify-issues` with no GitHub token in the environment
#[allow(unused)]
pub fn notify_cmd(cwd: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("relkit");
    cmd.arg("notify-issues")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("GITHUB_AUTH_TOKEN")
        .env_remove("GITHUB_REPOSITORY")
        .current_dir(cwd);
    cmd
}
