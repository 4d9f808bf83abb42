//! Output of the aggregated license manifest.
//!
//! - [`json`]: serializes the manifest and writes the output file.
//! - [`terminal`]: colored summary line and, with `--verbose`, a per-license table.

pub mod json;
pub mod terminal;
