//! `relkit set-version`: write a release version into JSON manifests.
//!
//! All writes go through a `Transaction`, so several `--file` arguments are
//! updated together or not at all.

use crate::error::{ReleaseError, Result};
use crate::fs::Transaction;
use crate::manifest::{EditOutcome, upsert_version};

use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "Usage: relkit set-version --file <path> --version <version>";

/// Arguments for the `set-version` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetVersionArgs {
    /// Manifest to update (repeat for several files)
    #[arg(long = "file", value_name = "PATH", required = true)]
    pub files: Vec<PathBuf>,

    /// Version to write, used verbatim (prerelease suffixes included)
    #[arg(long = "version", value_name = "VERSION")]
    pub version: String,

    /// Preview changes without applying them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Only verify that every manifest already holds the version
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,
}

impl SetVersionArgs {
    /// Rejects empty parameters, which clap lets through.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ReleaseError::Usage(USAGE.to_string()));
        }
        if self.files.is_empty() || self.files.iter().any(|f| f.as_os_str().is_empty()) {
            return Err(ReleaseError::Usage(USAGE.to_string()));
        }
        Ok(())
    }
}

pub fn execute(args: SetVersionArgs) -> Result<()> {
    args.validate()?;

    for file in &args.files {
        if !file.is_file() {
            return Err(ReleaseError::FileNotFound(file.clone()));
        }
    }

    let mut txn = Transaction::new(args.dry_run);

    for file in &args.files {
        let before = fs::read_to_string(file)?;

        match upsert_version(&before, &args.version)? {
            EditOutcome::Unchanged => {
                log::info!("{} already at {}", file.display(), args.version);
                println!(
                    "{} {} already at {}",
                    "✓".green(),
                    file.display(),
                    args.version
                );
            }
            EditOutcome::Updated(_) if args.check => {
                return Err(ReleaseError::VersionMismatch {
                    path: file.clone(),
                    expected: args.version.clone(),
                });
            }
            EditOutcome::Updated(after) => {
                txn.update_file(file.clone(), after)?;
            }
            EditOutcome::Unrecognized => {
                return Err(ReleaseError::UnrecognizedFormat(file.clone()));
            }
        }
    }

    if let Err(e) = txn.commit() {
        eprintln!("{} {}", "Error during commit:".red().bold(), e);
        return Err(e);
    }

    let root = std::env::current_dir()?;
    if !txn.is_empty() {
        txn.print_summary(&args.version, &root);
    }

    Ok(())
}
