//! Issue references in commit messages.
//!
//! Pure functions with no I/O or side effects.

use crate::error::Result;
use regex::Regex;
use std::fmt;

/// A GitHub repository as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    /// Parses `owner/name`. Anything with more or fewer segments is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let (owner, name) = s.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Compares two slugs the way GitHub does, ignoring ASCII case.
    pub fn matches(&self, other: &RepoSlug) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An issue named after a closing keyword: `#12` or `owner/repo#12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueRef {
    /// `None` for a bare `#12`, which refers to the current repository.
    pub repo: Option<RepoSlug>,
    pub number: u64,
}

/// Extracts the repository from a GitHub remote URL.
///
/// Handles `git@github.com:owner/repo.git` and
/// `https://github.com/owner/repo(.git)`.
pub fn repo_from_remote_url(url: &str) -> Result<Option<RepoSlug>> {
    let pattern = Regex::new(r"(?i)github\.com[:/](.+?)/(.+?)(?:\.git)?/?$")?;
    Ok(pattern.captures(url.trim()).map(|caps| RepoSlug {
        owner: caps[1].to_string(),
        name: caps[2].to_string(),
    }))
}

/// Finds every `fixes #12`-style reference in `text`.
///
/// Recognised keywords: close, closes, closed, fix, fixes, fixed, resolve,
/// resolves, resolved (any case). References are returned in order of first
/// appearance without duplicates.
pub fn extract_issue_refs(text: &str) -> Result<Vec<IssueRef>> {
    let keyword = Regex::new(
        r"(?i)\b(?:close|closes|closed|fix|fixes|fixed|resolve|resolves|resolved)\s+((?:[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+)?#\d+)\b",
    )?;
    let reference = Regex::new(r"^(?:([^/]+)/([^#]+))?#(\d+)$")?;

    let mut refs: Vec<IssueRef> = Vec::new();
    for caps in keyword.captures_iter(text) {
        let Some(parts) = reference.captures(&caps[1]) else {
            continue;
        };
        let Ok(number) = parts[3].parse::<u64>() else {
            log::debug!("Ignoring out-of-range issue number {}", &parts[3]);
            continue;
        };
        let repo = match (parts.get(1), parts.get(2)) {
            (Some(owner), Some(name)) => Some(RepoSlug {
                owner: owner.as_str().to_string(),
                name: name.as_str().to_string(),
            }),
            _ => None,
        };

        let issue = IssueRef { repo, number };
        if !refs.contains(&issue) {
            refs.push(issue);
        }
    }

    Ok(refs)
}

/// Keeps the issue numbers that belong to `repo`.
///
/// Cross-repository references are dropped so a release never writes to a
/// repository it does not own.
pub fn issues_for_repo(refs: &[IssueRef], repo: &RepoSlug) -> Vec<u64> {
    let mut numbers = Vec::new();
    for issue in refs {
        let local = issue.repo.as_ref().is_none_or(|r| r.matches(repo));
        if local && !numbers.contains(&issue.number) {
            numbers.push(issue.number);
        }
    }
    numbers
}

/// Builds the comment posted on each referenced issue.
///
/// The tag defaults to `v<version>`; the `beta` channel (any case) gets its
/// own wording.
pub fn comment_body(version: &str, git_tag: Option<&str>, channel: Option<&str>) -> String {
    let tag = git_tag
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("v{}", version));
    let beta = channel.is_some_and(|c| c.eq_ignore_ascii_case("beta"));

    if beta {
        format!("Included in beta release {}.", tag)
    } else {
        format!("Included in release {}.", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> RepoSlug {
        RepoSlug::parse(s).unwrap()
    }

    #[test]
    fn test_parse_repo_slug() {
        assert_eq!(slug("octo/widgets").to_string(), "octo/widgets");
        assert!(RepoSlug::parse("octo").is_none());
        assert!(RepoSlug::parse("octo/widgets/extra").is_none());
        assert!(RepoSlug::parse("/widgets").is_none());
    }

    #[test]
    fn test_repo_from_remote_url() {
        assert_eq!(
            repo_from_remote_url("git@github.com:octo/widgets.git").unwrap(),
            Some(slug("octo/widgets"))
        );
        assert_eq!(
            repo_from_remote_url("https://github.com/octo/widgets.git").unwrap(),
            Some(slug("octo/widgets"))
        );
        assert_eq!(
            repo_from_remote_url("https://github.com/octo/widgets").unwrap(),
            Some(slug("octo/widgets"))
        );
        assert_eq!(
            repo_from_remote_url("https://gitlab.com/octo/widgets.git").unwrap(),
            None
        );
    }

    #[test]
    fn test_extract_issue_refs() {
        let log = "fix: handle empty feed\n\nFixes #12\n\nfeat: warnings\n\nCloses octo/widgets#7, resolved #12\nrefs #99";
        let refs = extract_issue_refs(log).unwrap();

        assert_eq!(
            refs,
            vec![
                IssueRef {
                    repo: None,
                    number: 12
                },
                IssueRef {
                    repo: Some(slug("octo/widgets")),
                    number: 7
                },
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let refs = extract_issue_refs("RESOLVES #3\nclose #4").unwrap();
        let numbers: Vec<_> = refs.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![3, 4]);
    }

    #[test]
    fn test_keyword_must_be_a_word() {
        assert!(extract_issue_refs("prefix #1\nhotfixes #2").unwrap().is_empty());
    }

    #[test]
    fn test_issues_for_repo_drops_cross_repo_refs() {
        let refs = extract_issue_refs("fixes #1\nfixes other/repo#2\nfixes Octo/Widgets#3\nfixes octo/widgets#1")
            .unwrap();

        assert_eq!(issues_for_repo(&refs, &slug("octo/widgets")), vec![1, 3]);
    }

    #[test]
    fn test_comment_body() {
        assert_eq!(
            comment_body("1.2.0", None, None),
            "Included in release v1.2.0."
        );
        assert_eq!(
            comment_body("1.2.0-beta.1", Some("v1.2.0-beta.1"), Some("Beta")),
            "Included in beta release v1.2.0-beta.1."
        );
        assert_eq!(
            comment_body("1.2.0", Some(""), Some("")),
            "Included in release v1.2.0."
        );
    }
}
