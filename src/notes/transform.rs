//! Per-commit shaping of release-note records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conventional commit type → release-note section title.
///
/// `*` is the fallback for anything not listed.
pub const RELEASE_NOTE_TYPES: &[(&str, &str)] = &[
    ("feat", "New features"),
    ("fix", "Bug fixes"),
    ("docs", "Documentation"),
    ("refactor", "Refactoring"),
    ("chore", "Maintenance"),
    ("*", "Other changes"),
];

const FALLBACK_TYPE: &str = "*";

/// A commit record as produced by a conventional-commits parser.
///
/// Only the fields the transform reads or writes are typed; everything else
/// is carried through in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub commit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_indented: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Maps a raw commit type to its section title.
pub fn section_for(raw_type: Option<&str>) -> &'static str {
    let raw = match raw_type.map(str::trim) {
        Some(t) if !t.is_empty() && t != FALLBACK_TYPE => t.to_lowercase(),
        _ => FALLBACK_TYPE.to_string(),
    };

    let lookup = |key: &str| {
        RELEASE_NOTE_TYPES
            .iter()
            .find(|(t, _)| *t == key)
            .map(|(_, section)| *section)
    };
    lookup(&raw)
        .or_else(|| lookup(FALLBACK_TYPE))
        .unwrap_or("Other changes")
}

/// Returns `true` for merge commits GitHub creates.
pub fn is_merge_commit(header: &str) -> bool {
    let lower = header.to_lowercase();
    lower.starts_with("merge pull request") || lower.starts_with("merge branch")
}

/// Prefixes every line of a trimmed body with two spaces.
///
/// Returns `None` for a blank body.
pub fn indent_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    Some(
        body.lines()
            .map(|line| format!("  {}", line))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Normalizes a commit date to ISO-8601 UTC with milliseconds.
///
/// Accepts RFC 3339 and RFC 2822. Anything else falls back to `now`.
pub fn normalize_date(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let parsed = raw.and_then(|s| {
        let s = s.trim();
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .ok()
    });

    match parsed {
        Some(date) => date.with_timezone(&Utc),
        None => {
            log::debug!("Unparseable commit date {:?}; using now", raw);
            now
        }
    }
    .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shapes one commit for the release notes, or drops it.
///
/// Dropped: GitHub merge commits and commits without a subject.
pub fn transform_commit(commit: &CommitRecord, now: DateTime<Utc>) -> Option<CommitRecord> {
    let header = commit
        .header
        .as_deref()
        .filter(|h| !h.is_empty())
        .or(commit.subject.as_deref())
        .unwrap_or("");
    if is_merge_commit(header) {
        log::debug!("Dropping merge commit: {}", header);
        return None;
    }

    let subject = commit
        .subject
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(commit.header.as_deref())
        .unwrap_or("");
    if subject.trim().is_empty() {
        return None;
    }

    let mut out = commit.clone();
    out.subject = Some(subject.to_string());
    out.hidden = Some(false);
    out.commit_type = Some(section_for(commit.commit_type.as_deref()).to_string());
    if let Some(indented) = commit.body.as_deref().and_then(indent_body) {
        out.body_indented = Some(indented);
    }

    let raw_date = first_date(commit);
    out.committer_date = Some(normalize_date(raw_date.as_deref(), now));

    Some(out)
}

fn first_date(commit: &CommitRecord) -> Option<String> {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|d| !d.is_empty()).map(str::to_string);

    non_empty(&commit.committer_date)
        .or_else(|| non_empty(&commit.author_date))
        .or_else(|| {
            let nested = commit.extra.get("commit")?;
            ["/committer/date", "/author/date"]
                .iter()
                .find_map(|p| nested.pointer(p).and_then(Value::as_str))
                .map(str::to_string)
        })
}
