//! Release-note shaping for already-parsed conventional commits.
//!
//! Produces the context a changelog template renders: commits grouped under
//! section titles, plus a `prerelease` flag derived from the version.

pub mod transform;

pub use transform::{CommitRecord, RELEASE_NOTE_TYPES, section_for, transform_commit};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Commits under one section title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitGroup {
    pub title: String,
    pub commits: Vec<CommitRecord>,
}

/// Template context for one release.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseContext {
    pub version: String,
    pub prerelease: bool,
    pub commit_groups: Vec<CommitGroup>,
}

/// Prerelease versions carry a `-` suffix, e.g. `1.2.3-beta.1`.
pub fn is_prerelease(version: &str) -> bool {
    version.contains('-')
}

/// Transforms, groups and sorts commits for `version`.
///
/// Groups are ordered by title; commits within a group by scope, then
/// subject. Commits without a scope sort first.
pub fn build_context(version: &str, commits: &[CommitRecord], now: DateTime<Utc>) -> ReleaseContext {
    let mut groups: BTreeMap<String, Vec<CommitRecord>> = BTreeMap::new();

    for commit in commits {
        if let Some(out) = transform_commit(commit, now) {
            let title = out.commit_type.clone().unwrap_or_default();
            groups.entry(title).or_default().push(out);
        }
    }

    let commit_groups = groups
        .into_iter()
        .map(|(title, mut commits)| {
            commits.sort_by(|a, b| (&a.scope, &a.subject).cmp(&(&b.scope, &b.subject)));
            CommitGroup { title, commits }
        })
        .collect();

    ReleaseContext {
        version: version.to_string(),
        prerelease: is_prerelease(version),
        commit_groups,
    }
}
