//! License identifier canonicalization and license text lookup.
//!
//! - [`identifier`]: maps license-tools plugin codes and SPDX ids to canonical ids.
//! - [`text`]: resolves a canonical id to its license text (SPDX database,
//!   project templates, or templates bundled with the binary).

pub mod identifier;
pub mod text;

pub use identifier::LicenseIdMap;
pub use text::{ResolveError, TextResolver};
