//! `relkit release-notes`: group parsed commits into a release-note context.

use crate::error::{ReleaseError, Result};
use crate::notes::{CommitRecord, build_context};

use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Arguments for the `release-notes` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ReleaseNotesArgs {
    /// Version being released
    #[arg(long = "version", value_name = "VERSION")]
    pub version: String,

    /// JSON array of parsed commits (reads stdin when omitted)
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

pub fn execute(args: ReleaseNotesArgs) -> Result<()> {
    if args.version.trim().is_empty() {
        return Err(ReleaseError::Usage(
            "Usage: relkit release-notes --version <version> [--input <path>]".to_string(),
        ));
    }

    let raw = match &args.input {
        Some(path) if !path.is_file() => return Err(ReleaseError::FileNotFound(path.clone())),
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let commits: Vec<CommitRecord> = serde_json::from_str(&raw)?;
    log::debug!("Read {} commit record(s)", commits.len());

    let context = build_context(&args.version, &commits, chrono::Utc::now());
    println!("{}", serde_json::to_string_pretty(&context)?);

    Ok(())
}
