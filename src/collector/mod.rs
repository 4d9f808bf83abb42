//! External collaborators that produce the raw license metadata.
//!
//! - [`gradle`] runs the Android license task and reads the JSON it writes.
//! - [`node`] enumerates installed npm packages, either by walking
//!   `node_modules` or by running `license-checker`.

pub mod gradle;
pub mod node;
