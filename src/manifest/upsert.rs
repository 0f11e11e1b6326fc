//! Version upsert with a JSON parse as validation oracle.

use super::splice::splice_version;
use crate::error::{ReleaseError, Result};
use serde_json::Value;

/// Result of upserting a version into a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The manifest already holds the requested version.
    Unchanged,
    /// The edited manifest text. Always parses and holds the requested version.
    Updated(String),
    /// The manifest could not be edited and does not hold the version.
    Unrecognized,
}

/// Sets the top-level `"version"` of a manifest, preserving its formatting.
///
/// # Outcomes
///
/// - `Updated(text)` when an edit was made; `text` has been re-parsed and its
///   `version` compared against `version`
/// - `Unchanged` when no edit was needed and the parsed manifest already
///   holds `version`
/// - `Unrecognized` when no edit could be made and the manifest does not hold
///   `version` (including text that is not JSON at all)
///
/// # Errors
///
/// Returns [`ReleaseError::PostconditionFailure`] if an edit was computed but
/// the result is not valid JSON or does not hold `version` at the top level.
pub fn upsert_version(text: &str, version: &str) -> Result<EditOutcome> {
    let spliced = splice_version(text, version)?;

    if spliced == text {
        return match read_version(text) {
            Ok(Some(found)) if found == version => Ok(EditOutcome::Unchanged),
            Ok(found) => {
                log::debug!("Manifest left untouched; current version is {:?}", found);
                Ok(EditOutcome::Unrecognized)
            }
            Err(e) => {
                log::debug!("Manifest left untouched and is not valid JSON: {}", e);
                Ok(EditOutcome::Unrecognized)
            }
        };
    }

    match read_version(&spliced) {
        Ok(Some(found)) if found == version => Ok(EditOutcome::Updated(spliced)),
        Ok(Some(found)) => Err(ReleaseError::PostconditionFailure(format!(
            "top-level version is {:?}, expected {:?}",
            found, version
        ))),
        Ok(None) => Err(ReleaseError::PostconditionFailure(
            "no top-level \"version\" field after edit".to_string(),
        )),
        Err(e) => Err(ReleaseError::PostconditionFailure(e.to_string())),
    }
}

/// Parses `text` as JSON and returns its top-level `version`.
///
/// A string value is returned as-is; other non-null values are returned in
/// their JSON rendering (`1` for a number). Missing or `null` is `None`.
pub fn read_version(text: &str) -> std::result::Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(match value.get("version") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    })
}
