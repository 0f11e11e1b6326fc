//! Release comments on issues closed by the commits of a release.
//!
//! - **`refs`**: Finding `fixes #12`-style references and the target repo
//! - **`github`**: Reading and posting issue comments
//!
//! [`deliver`] is the loop shared by the CLI and tests: it never stops on a
//! single failed issue.

pub mod github;
pub mod refs;

pub use github::{GhCli, IssueComments};
pub use refs::{
    IssueRef, RepoSlug, comment_body, extract_issue_refs, issues_for_repo, repo_from_remote_url,
};

/// Environment variables searched for a GitHub token, in order.
pub const TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_AUTH_TOKEN"];

/// Comments to post for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyPlan {
    pub repo: RepoSlug,
    pub issues: Vec<u64>,
    pub body: String,
}

/// What happened to each issue of a [`NotifyPlan`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub commented: Vec<u64>,
    /// Issues that already carry the comment.
    pub already_present: Vec<u64>,
    pub failed: Vec<(u64, String)>,
}

/// Posts the plan's comment on every issue that does not have it yet.
///
/// A rerun of the same release is harmless: an issue whose recent comments
/// already contain the body is skipped.
pub fn deliver(client: &impl IssueComments, plan: &NotifyPlan) -> NotifyReport {
    let mut report = NotifyReport::default();

    for &issue in &plan.issues {
        let result = client
            .comment_bodies(&plan.repo, issue)
            .and_then(|bodies| {
                if bodies.iter().any(|b| b.contains(&plan.body)) {
                    return Ok(false);
                }
                client.post_comment(&plan.repo, issue, &plan.body)?;
                Ok(true)
            });

        match result {
            Ok(true) => {
                println!("[notify-issues] #{}: commented.", issue);
                report.commented.push(issue);
            }
            Ok(false) => {
                println!(
                    "[notify-issues] #{}: comment already present; skipping.",
                    issue
                );
                report.already_present.push(issue);
            }
            Err(e) => {
                println!("[notify-issues] #{}: failed: {}", issue, e);
                log::warn!("Could not comment on #{}: {}", issue, e);
                report.failed.push((issue, e.to_string()));
            }
        }
    }

    report
}
