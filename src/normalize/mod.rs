//! Normalizers from each ecosystem's raw metadata into [`LicenseRecord`](crate::models::LicenseRecord)s.

pub mod android;
pub mod node;
