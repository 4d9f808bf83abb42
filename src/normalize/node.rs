use std::fmt;

use anyhow::{Context, Result};
use tracing::warn;

use crate::license::TextResolver;
use crate::models::{LicenseRecord, PackageMap};

/// A recoverable problem with one package's scanner metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageWarning {
    /// No declared license; the package is left out of the manifest.
    NoLicense(String),
    /// No license file; text comes from the license database instead.
    NoLicenseFile(String),
}

impl fmt::Display for PackageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageWarning::NoLicense(pkg) => write!(f, "{} has no license. Skipping...", pkg),
            PackageWarning::NoLicenseFile(pkg) => {
                write!(f, "{} has no license file. Falling back...", pkg)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeNormalization {
    pub records: Vec<LicenseRecord>,
    pub warnings: Vec<PackageWarning>,
}

impl NodeNormalization {
    fn warn(&mut self, warning: PackageWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Normalize scanner output in map order.
///
/// With a `licenseFile` the text is that file's contents. Without one, every
/// declared license is resolved separately and the texts are joined with a
/// blank line, in declaration order.
pub fn normalize_packages(
    packages: &PackageMap,
    resolver: &TextResolver,
) -> Result<NodeNormalization> {
    let mut out = NodeNormalization::default();

    for (key, entry) in packages {
        let licenses = match &entry.licenses {
            Some(licenses) if !licenses.is_empty() => licenses,
            _ => {
                out.warn(PackageWarning::NoLicense(key.clone()));
                continue;
            }
        };

        let license_text = match &entry.license_file {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read license file {} of {}", path, key))?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            None => {
                out.warn(PackageWarning::NoLicenseFile(key.clone()));
                licenses
                    .ids()
                    .into_iter()
                    .map(|id| resolver.resolve_text(id))
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("no license text for package {}", key))?
                    .join("\n\n")
            }
        };

        out.records.push(LicenseRecord {
            name: key.clone(),
            url: entry.repository.clone(),
            license: licenses.display(),
            copyright_holder: entry.publisher.clone(),
            license_text,
        });
    }

    Ok(out)
}
