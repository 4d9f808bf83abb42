use anyhow::{Context, Result};
use tracing::debug;

use crate::license::TextResolver;
use crate::models::{AndroidLibrary, LicenseRecord};

/// Map one license-tools plugin entry to a [`LicenseRecord`].
///
/// `license` keeps the plugin's code verbatim (e.g. `apache2`); only the text
/// lookup goes through canonicalization.
pub fn normalize_android(library: &AndroidLibrary, resolver: &TextResolver) -> Result<LicenseRecord> {
    let name = library.coordinates();
    debug!(
        library = %name,
        display_name = ?library.library_name,
        declared = ?library.license,
        license_url = ?library.license_url,
        copyright = ?library.copyright_statement,
        "normalizing Android library"
    );
    let license_text = resolver
        .resolve_text(&library.normalized_license)
        .with_context(|| format!("no license text for Android library {}", name))?;

    Ok(LicenseRecord {
        name,
        url: library.url.clone(),
        license: library.normalized_license.clone(),
        copyright_holder: library.copyright_holder.clone(),
        license_text,
    })
}

/// Normalize every library in order; the first failure aborts.
pub fn normalize_android_all(
    libraries: &[AndroidLibrary],
    resolver: &TextResolver,
) -> Result<Vec<LicenseRecord>> {
    libraries
        .iter()
        .map(|library| normalize_android(library, resolver))
        .collect()
}
