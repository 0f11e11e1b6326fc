//! Staged file writes with rollback support.
//!
//! Coordinates manifest updates that must succeed or fail as a unit.
//!
//! ## Execution Guarantees
//!
//! - **Atomicity**: All writes succeed, or the ones already made are restored
//! - **Validation**: Pre-flight checks before any mutation
//! - **Idempotency**: Files with unchanged content are skipped
//!
//! ## Phases
//!
//! 1. **Build**: Stage writes via `update_file()`
//! 2. **Validate**: Check paths exist, are writable, no duplicates
//! 3. **Execute**: Write every staged file
//! 4. **Rollback** (on failure): Restore originals in LIFO order
//!
//! ## Example
//!
//! ```no_run
//! # use relkit::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> relkit::error::Result<()> {
//! let mut txn = Transaction::new(false);
//!
//! txn.update_file(PathBuf::from("manifest.json"), "{\"version\": \"1.0.0\"}".into())?;
//!
//! txn.commit()?; // Writes everything or restores what was written
//! # Ok(())
//! # }
//! ```

use crate::error::{ReleaseError, Result};

use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A staged file write.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub path: PathBuf,
    /// Content read at staging time, restored on rollback.
    pub original: String,
    pub new: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging writes.
    Building,
    /// All writes succeeded.
    Committed,
    /// Manually rolled back after commit.
    RolledBack,
    /// Validation or a write failed.
    Failed,
}

/// Transaction coordinating multiple file writes.
///
/// Must be explicitly committed. If dropped without committing, logs a warning
/// but doesn't roll back (since nothing was written).
///
/// ## Dry-Run Mode
///
/// When `dry_run = true`, writes are staged and reported but never executed.
#[must_use = "Transaction must be committed or rolled back"]
pub struct Transaction {
    updates: Vec<FileUpdate>,
    dry_run: bool,
    state: TransactionState,
    written: Vec<usize>,
}

impl Transaction {
    /// Creates a new transaction.
    pub fn new(dry_run: bool) -> Self {
        Self {
            updates: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            written: Vec::new(),
        }
    }

    /// Validates all staged writes.
    ///
    /// Checks:
    /// - No duplicate paths
    /// - Files still exist
    /// - Files are writable
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for update in &self.updates {
            let path = &update.path;
            if !seen.insert(path) {
                return Err(ReleaseError::Other(anyhow::anyhow!(
                    "Duplicate file operation: {}",
                    path.display()
                )));
            }

            if !path.exists() {
                return Err(ReleaseError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File no longer exists: {}", path.display()),
                )));
            }

            if let Ok(metadata) = fs::metadata(path)
                && metadata.permissions().readonly()
            {
                return Err(ReleaseError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("File is read-only: {}", path.display()),
                )));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns true if successfully committed.
    pub fn is_committed(&self) -> bool {
        self.state == TransactionState::Committed
    }

    /// Returns the staged paths in staging order.
    pub fn paths(&self) -> Vec<&Path> {
        self.updates.iter().map(|u| u.path.as_path()).collect()
    }

    /// Stages a file update.
    ///
    /// Reads current content and compares to `new_content`. If identical,
    /// skips (idempotent). Otherwise stages for commit.
    pub fn update_file(&mut self, path: PathBuf, new_content: String) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(ReleaseError::Other(anyhow::anyhow!(
                "Cannot modify transaction after commit/rollback"
            )));
        }

        log::debug!("Staging update for: {}", path.display());

        let original = fs::read_to_string(&path).map_err(|e| {
            log::error!("Failed to read {}: {}", path.display(), e);
            ReleaseError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        if original == new_content {
            log::debug!("Content unchanged, skipping: {}", path.display());
            return Ok(());
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
        }

        self.updates.push(FileUpdate {
            path,
            original,
            new: new_content,
        });

        Ok(())
    }

    /// Writes all staged files.
    ///
    /// On a failed write, every file already written is restored before the
    /// error is returned.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(ReleaseError::Other(anyhow::anyhow!(
                "Transaction already committed/rolled back"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        if let Err(e) = self.validate() {
            self.state = TransactionState::Failed;
            return Err(e);
        }

        for idx in 0..self.updates.len() {
            let update = &self.updates[idx];
            if let Err(e) = fs::write(&update.path, &update.new) {
                let err = ReleaseError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write {}: {}", update.path.display(), e),
                ));
                self.state = TransactionState::Failed;
                if let Err(rollback_err) = self.restore_written() {
                    log::error!("{}", rollback_err);
                }
                return Err(err);
            }
            self.written.push(idx);
            log::debug!("Updated: {}", update.path.display());
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Manually rolls back a committed transaction.
    ///
    /// Restores originals in LIFO order. Only works on committed transactions.
    pub fn rollback(&mut self) -> Result<()> {
        match self.state {
            TransactionState::Building => Ok(()),
            TransactionState::Committed if self.dry_run => Ok(()),
            TransactionState::Committed => {
                self.restore_written()?;
                self.state = TransactionState::RolledBack;
                log::info!("Rollback completed");
                Ok(())
            }
            TransactionState::Failed => Err(ReleaseError::Other(anyhow::anyhow!(
                "Transaction failed; rollback already attempted"
            ))),
            TransactionState::RolledBack => Err(ReleaseError::Other(anyhow::anyhow!(
                "Transaction already rolled back"
            ))),
        }
    }

    /// Restores written files only.
    fn restore_written(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        for &idx in self.written.iter().rev() {
            if let Some(update) = self.updates.get(idx)
                && let Err(e) = fs::write(&update.path, &update.original)
            {
                errors.push(format!("Failed to restore {}: {}", update.path.display(), e));
            }
        }
        self.written.clear();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReleaseError::RollbackFailed(errors.join("; ")))
        }
    }

    /// Prints the staged files relative to `root`, with forward slashes.
    pub fn print_summary(&self, version: &str, root: &Path) {
        if self.updates.is_empty() {
            println!("{}", "No changes needed".yellow());
            return;
        }

        if self.dry_run {
            println!("{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("{}", "Changes applied:".green().bold());
        }

        let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        for update in &self.updates {
            let path = fs::canonicalize(&update.path).unwrap_or_else(|_| update.path.clone());
            let relative = pathdiff::diff_paths(&path, &root).unwrap_or(path);
            let display = relative.to_string_lossy().replace('\\', "/");
            if self.dry_run {
                println!("   • {} → {}", display.dimmed(), version.cyan());
            } else {
                println!("   {} {} → {}", "✓".green(), display.dimmed(), version.green());
            }
        }

        let count = self.updates.len();
        if self.dry_run {
            println!(
                "{} {} will be modified. Run without {} to apply.",
                count.to_string().cyan().bold(),
                if count > 1 { "files" } else { "file" },
                "--dry-run".cyan()
            );
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.updates.is_empty() && !self.dry_run {
            log::warn!("Transaction dropped without commit");
        }
    }
}
