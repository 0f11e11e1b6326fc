//! Format-preserving edits of JSON manifests.
//!
//! This module sets the top-level `"version"` of a manifest such as a Home
//! Assistant `manifest.json` or a `package.json`. It is split into two
//! concerns:
//!
//! - **`splice`**: Text surgery (replace the value, or insert a property)
//! - **`upsert`**: Classification of the result, using a JSON parse only
//!   as a validation oracle
//!
//! The output bytes always come from the original text, never from a JSON
//! serializer, so whitespace, key order and newline style are kept.

pub mod splice;
pub mod upsert;

pub use splice::splice_version;
pub use upsert::{EditOutcome, read_version, upsert_version};
