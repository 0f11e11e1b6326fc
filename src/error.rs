//! Error types for relkit.
//!
//! All operations return `Result<T>` which aliases `Result<T, ReleaseError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from release operations.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Missing or empty invocation parameter.
    #[error("{0}")]
    Usage(String),

    /// Named input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Manifest could not be edited and does not already hold the version.
    #[error("Could not update or insert \"version\" field in {} (unexpected format)", .0.display())]
    UnrecognizedFormat(PathBuf),

    /// An edit was computed but does not re-parse to the requested version.
    ///
    /// Indicates a bug in the text surgery; the edit is never written.
    #[error("Edited manifest failed validation: {0}")]
    PostconditionFailure(String),

    /// Manifest already holds a different version (`--check` mode).
    #[error("Version mismatch in {}: expected {expected}", path.display())]
    VersionMismatch { path: PathBuf, expected: String },

    /// Rollback failed after a write error.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// System git invocation failed.
    #[error("Git error: {0}")]
    Git(String),

    /// GitHub request through the `gh` CLI failed.
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReleaseError {
    /// Process exit code for this error.
    ///
    /// Usage problems exit with `2`, everything else with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Usage(_) | ReleaseError::FileNotFound(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for relkit operations.
pub type Result<T> = std::result::Result<T, ReleaseError>;
