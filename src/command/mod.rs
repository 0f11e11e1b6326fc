pub mod notify_issues;
pub mod release_notes;
pub mod set_version;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ReleaseCommand {
    /// Set the "version" field of JSON manifests, preserving their formatting.
    SetVersion(set_version::SetVersionArgs),
    /// Comment on issues closed by the commits of a release.
    NotifyIssues(notify_issues::NotifyIssuesArgs),
    /// Group parsed commits into a release-note context (JSON on stdout).
    ReleaseNotes(release_notes::ReleaseNotesArgs),
}
