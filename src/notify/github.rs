//! Issue comments through the GitHub CLI.
//!
//! The REST calls are delegated to `gh api`, which handles authentication,
//! retries and proxies. The token is handed to `gh` as `GH_TOKEN`.

use super::refs::RepoSlug;
use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::process::Command;

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version: 2022-11-28";
const ACCEPT_HEADER: &str = "Accept: application/vnd.github+json";
const COMMENTS_PER_PAGE: u32 = 50;

/// Read and write access to issue comments.
pub trait IssueComments {
    /// Returns the bodies of the most recent comments on an issue.
    fn comment_bodies(&self, repo: &RepoSlug, issue: u64) -> Result<Vec<String>>;

    /// Posts a new comment on an issue.
    fn post_comment(&self, repo: &RepoSlug, issue: u64, body: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct IssueComment {
    #[serde(default)]
    body: Option<String>,
}

/// [`IssueComments`] backed by the `gh` binary.
pub struct GhCli {
    token: String,
}

impl GhCli {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    fn api(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("gh")
            .arg("api")
            .args(["-H", ACCEPT_HEADER, "-H", API_VERSION_HEADER])
            .args(args)
            .env("GH_TOKEN", &self.token)
            .output()
            .map_err(|e| ReleaseError::GitHub(format!("failed to run gh: {}", e)))?;

        if !output.status.success() {
            return Err(ReleaseError::GitHub(format!(
                "gh api {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl IssueComments for GhCli {
    fn comment_bodies(&self, repo: &RepoSlug, issue: u64) -> Result<Vec<String>> {
        let endpoint = format!(
            "repos/{}/issues/{}/comments?per_page={}",
            repo, issue, COMMENTS_PER_PAGE
        );
        let stdout = self.api(&[&endpoint])?;
        let comments: Vec<IssueComment> = serde_json::from_slice(&stdout)?;
        Ok(comments.into_iter().filter_map(|c| c.body).collect())
    }

    fn post_comment(&self, repo: &RepoSlug, issue: u64, body: &str) -> Result<()> {
        let endpoint = format!("repos/{}/issues/{}/comments", repo, issue);
        let field = format!("body={}", body);
        self.api(&["--method", "POST", &endpoint, "-f", &field])?;
        Ok(())
    }
}
