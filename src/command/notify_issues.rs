//! `relkit notify-issues`: comment "Included in release ..." on closed issues.
//!
//! Runs after a successful release. Nothing here may fail the release: every
//! problem is reported and the command still succeeds.

use crate::error::Result;
use crate::git;
use crate::notify::{
    GhCli, NotifyPlan, RepoSlug, TOKEN_VARS, comment_body, deliver, extract_issue_refs,
    issues_for_repo, repo_from_remote_url,
};

use clap::Parser;
use colored::Colorize;

/// Arguments for the `notify-issues` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct NotifyIssuesArgs {
    /// Commit range of the release, e.g. `<last-head>..<next-head>`
    #[arg(long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Released version
    #[arg(long = "version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Git tag of the release (defaults to `v<version>`)
    #[arg(long, value_name = "TAG")]
    pub git_tag: Option<String>,

    /// Release channel; `beta` changes the comment wording
    #[arg(long, value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Repository as `owner/repo` (defaults to $GITHUB_REPOSITORY, then the origin remote)
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Print the comments that would be posted without calling GitHub
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

pub fn execute(args: NotifyIssuesArgs) -> Result<()> {
    if let Err(e) = notify(&args) {
        eprintln!("[notify-issues] Fatal: {}", e);
        log::warn!("Issue notification failed; the release is unaffected");
    }
    Ok(())
}

fn notify(args: &NotifyIssuesArgs) -> Result<()> {
    let Some(token) = find_token() else {
        println!("[notify-issues] No GitHub token found; skipping.");
        return Ok(());
    };

    let Some(repo) = resolve_repo(args.repo.as_deref())? else {
        println!("[notify-issues] Could not determine GitHub repo; skipping.");
        return Ok(());
    };

    let (Some(range), Some(version)) = (non_empty(&args.range), non_empty(&args.version)) else {
        println!("[notify-issues] Missing/invalid range or version; skipping.");
        return Ok(());
    };
    // First releases have no previous head
    if range.contains("undefined") {
        println!("[notify-issues] Missing/invalid range or version; skipping.");
        return Ok(());
    }

    let messages = git::log_messages(range, None)?;
    let refs = extract_issue_refs(&messages)?;
    if refs.is_empty() {
        println!("[notify-issues] No issue references found; nothing to do.");
        return Ok(());
    }

    let issues = issues_for_repo(&refs, &repo);
    if issues.is_empty() {
        println!("[notify-issues] Only cross-repo references found; skipping.");
        return Ok(());
    }

    let plan = NotifyPlan {
        body: comment_body(
            version,
            non_empty(&args.git_tag),
            non_empty(&args.channel),
        ),
        repo,
        issues,
    };

    let numbers: Vec<String> = plan.issues.iter().map(u64::to_string).collect();
    println!(
        "[notify-issues] Commenting on issues: {}",
        numbers.join(", ")
    );

    if args.dry_run {
        println!(
            "{} would post {:?} to {} issue(s) in {}",
            "DRY RUN".yellow().bold(),
            plan.body,
            plan.issues.len(),
            plan.repo
        );
        return Ok(());
    }

    let report = deliver(&GhCli::new(token), &plan);
    log::info!(
        "Commented on {}, already present on {}, failed on {}",
        report.commented.len(),
        report.already_present.len(),
        report.failed.len()
    );

    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn find_token() -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.trim().is_empty())
}

/// `--repo`, then `$GITHUB_REPOSITORY`, then the `origin` remote URL.
fn resolve_repo(explicit: Option<&str>) -> Result<Option<RepoSlug>> {
    if let Some(repo) = explicit.and_then(RepoSlug::parse) {
        return Ok(Some(repo));
    }

    if let Some(repo) = std::env::var("GITHUB_REPOSITORY")
        .ok()
        .as_deref()
        .and_then(RepoSlug::parse)
    {
        return Ok(Some(repo));
    }

    match git::remote_url("origin", None) {
        Some(url) => repo_from_remote_url(&url),
        None => Ok(None),
    }
}
