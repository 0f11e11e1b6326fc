//! File system operations with transaction support.
//!
//! Provides staged file writes that can be committed or rolled back as a
//! unit.

pub mod transaction;

pub use transaction::{FileUpdate, Transaction};
