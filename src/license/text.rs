use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use super::identifier::{Canonical, LicenseIdMap};

/// Templates for licenses that have no entry in the SPDX license list.
const BUNDLED_TEMPLATES: &[(&str, &str)] = &[
    ("FPL-1.0", include_str!("../../templates/FPL-1.0.txt")),
    (
        "Facebook-Software-License",
        include_str!("../../templates/Facebook-Software-License.txt"),
    ),
    (
        "MOPUB-SDK-License",
        include_str!("../../templates/MOPUB-SDK-License.txt"),
    ),
    (
        "Android-Software-Development-Kit-License",
        include_str!("../../templates/Android-Software-Development-Kit-License.txt"),
    ),
    (
        "Amazon-Software-License",
        include_str!("../../templates/Amazon-Software-License.txt"),
    ),
    (
        "Play-Core-Software-Development-Kit-Terms-of-Service",
        include_str!("../../templates/Play-Core-Software-Development-Kit-Terms-of-Service.txt"),
    ),
    (
        "Pushwoosh-License",
        include_str!("../../templates/Pushwoosh-License.txt"),
    ),
];

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown license identifier `{0}`")]
    UnknownIdentifier(String),

    #[error("no license text for `{id}`: not in the SPDX list and no `{id}.txt` template")]
    MissingTemplate { id: String },

    #[error("failed to read license template {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a resolved license text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Spdx,
    ProjectTemplate,
    BundledTemplate,
}

/// Resolves a license label to its full license text.
///
/// Order: SPDX license database, then `<id>.txt` in the project template
/// directory (if configured), then the templates bundled with this binary.
#[derive(Debug, Clone)]
pub struct TextResolver {
    ids: LicenseIdMap,
    templates_dir: Option<PathBuf>,
}

impl TextResolver {
    pub fn new(ids: LicenseIdMap, templates_dir: Option<PathBuf>) -> Self {
        Self { ids, templates_dir }
    }

    pub fn ids(&self) -> &LicenseIdMap {
        &self.ids
    }

    pub fn resolve_text(&self, license_id: &str) -> Result<String, ResolveError> {
        self.resolve_with_source(license_id).map(|(text, _)| text)
    }

    pub fn resolve_with_source(
        &self,
        license_id: &str,
    ) -> Result<(String, TextSource), ResolveError> {
        let canonical = match self.ids.canonicalize(license_id) {
            Canonical::Found(id) => id,
            Canonical::Unknown => {
                return Err(ResolveError::UnknownIdentifier(license_id.to_string()))
            }
        };

        if let Some(text) = spdx::license_id(canonical).map(|id| id.text()) {
            debug!(license = license_id, canonical, "resolved from SPDX list");
            return Ok((text.to_string(), TextSource::Spdx));
        }

        if let Some(dir) = &self.templates_dir {
            let path = dir.join(format!("{canonical}.txt"));
            if path.is_file() {
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ResolveError::Io { path: path.clone(), source })?;
                debug!(license = license_id, path = %path.display(), "resolved from project template");
                return Ok((text, TextSource::ProjectTemplate));
            }
        }

        BUNDLED_TEMPLATES
            .iter()
            .find(|(id, _)| *id == canonical)
            .map(|(_, text)| {
                debug!(license = license_id, canonical, "resolved from bundled template");
                (text.to_string(), TextSource::BundledTemplate)
            })
            .ok_or_else(|| ResolveError::MissingTemplate { id: canonical.to_string() })
    }
}

impl Default for TextResolver {
    fn default() -> Self {
        Self::new(LicenseIdMap::default(), None)
    }
}
