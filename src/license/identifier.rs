use std::collections::{HashMap, HashSet};

use tracing::warn;

/// Built-in mapping from license-tools plugin codes (and SPDX ids themselves)
/// to canonical identifiers. Ids marked "not in SPDX" resolve to a bundled template.
const BUILTIN: &[(&str, &str)] = &[
    // license-tools plugin codes
    ("apache1_0", "Apache-1.0"),
    ("apache1_1", "Apache-1.1"),
    ("apache2", "Apache-2.0"),
    ("mit", "MIT"),
    ("bsd_2_clauses", "BSD-2-Clause"),
    ("bsd_3_clauses", "BSD-3-Clause"),
    ("bsd_4_clauses", "BSD-4-Clause"),
    ("isc", "ISC"),
    ("mpl1_0", "MPL-1.0"),
    ("mpl2", "MPL-2.0"),
    ("cpl1", "CPL-1.0"),
    ("epl1", "EPL-1.0"),
    ("fpl1", "FPL-1.0"), // not in SPDX
    ("facebook_platform_license", "Facebook-Software-License"), // not in SPDX
    ("cc0", "CC0-1.0"),
    ("cc_by_4_0", "CC-BY-4.0"),
    ("cddl1", "CDDL-1.1"),
    ("lgpl2_1", "LGPL-2.1"),
    ("lgpl3", "LGPL-3.0"),
    ("gpl1", "GPL-1.0"),
    ("gpl2", "GPL-2.0"),
    ("gpl3", "GPL-3.0"),
    ("mopub_sdk_license", "MOPUB-SDK-License"), // not in SPDX
    (
        "android_software_development_kit_license",
        "Android-Software-Development-Kit-License", // not in SPDX
    ),
    ("amazon_software_license", "Amazon-Software-License"), // not in SPDX
    (
        "play_core_software_development_kit_terms_of_service",
        "Play-Core-Software-Development-Kit-Terms-of-Service", // not in SPDX
    ),
    ("pushwoosh_license", "Pushwoosh-License"), // not in SPDX
    ("bsd-2-clause", "BSD-2-Clause"),
    // identity
    ("Apache-1.0", "Apache-1.0"),
    ("Apache-1.1", "Apache-1.1"),
    ("Apache-2.0", "Apache-2.0"),
    ("MIT", "MIT"),
    ("BSD-2-Clause", "BSD-2-Clause"),
    ("BSD-3-Clause", "BSD-3-Clause"),
    ("BSD-4-Clause", "BSD-4-Clause"),
    ("ISC", "ISC"),
    ("MPL-1.0", "MPL-1.0"),
    ("MPL-2.0", "MPL-2.0"),
    ("CPL-1.0", "CPL-1.0"),
    ("EPL-1.0", "EPL-1.0"),
    ("FPL-1.0", "FPL-1.0"),
    ("Facebook-Software-License", "Facebook-Software-License"),
    ("CC0-1.0", "CC0-1.0"),
    ("CC-BY-4.0", "CC-BY-4.0"),
    ("CDDL-1.1", "CDDL-1.1"),
    ("LGPL-2.1", "LGPL-2.1"),
    ("LGPL-3.0", "LGPL-3.0"),
    ("GPL-1.0", "GPL-1.0"),
    ("GPL-2.0", "GPL-2.0"),
    ("GPL-3.0", "GPL-3.0"),
    ("MOPUB-SDK-License", "MOPUB-SDK-License"),
    (
        "Android-Software-Development-Kit-License",
        "Android-Software-Development-Kit-License",
    ),
    ("Amazon-Software-License", "Amazon-Software-License"),
    (
        "Play-Core-Software-Development-Kit-Terms-of-Service",
        "Play-Core-Software-Development-Kit-Terms-of-Service",
    ),
    ("Pushwoosh-License", "Pushwoosh-License"),
];

/// Outcome of [`LicenseIdMap::canonicalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical<'a> {
    Found(&'a str),
    Unknown,
}

impl<'a> Canonical<'a> {
    pub fn id(self) -> Option<&'a str> {
        match self {
            Canonical::Found(id) => Some(id),
            Canonical::Unknown => None,
        }
    }
}

/// Lookup table from raw license labels to canonical (mostly SPDX) identifiers.
///
/// Lookup is exact and case-sensitive. Every canonical id maps to itself, so
/// canonicalizing twice yields the same result as canonicalizing once.
#[derive(Debug, Clone)]
pub struct LicenseIdMap {
    entries: HashMap<String, String>,
}

impl Default for LicenseIdMap {
    fn default() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self { entries }
    }
}

impl LicenseIdMap {
    /// Built-in table extended with project aliases (`raw label -> canonical id`).
    ///
    /// Targets are resolved through the table first, so an alias pointing at a
    /// plugin code or at another alias lands on the final canonical id, and each
    /// target gets an identity entry. An alias whose label is itself a canonical
    /// id would remap that id and is ignored with a warning.
    pub fn with_aliases<'a, I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut map = Self::default();
        let aliases: HashMap<&str, &str> = aliases
            .into_iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect();

        let mut resolved: Vec<(&str, String)> = aliases
            .keys()
            .map(|from| (*from, map.resolve_alias(from, &aliases)))
            .collect();
        resolved.sort_unstable();

        let canonical: HashSet<&str> = map
            .entries
            .values()
            .map(String::as_str)
            .chain(resolved.iter().map(|(_, to)| to.as_str()))
            .collect();
        let conflicting: Vec<&str> = resolved
            .iter()
            .filter(|(from, to)| *from != to.as_str() && canonical.contains(from))
            .map(|(from, _)| *from)
            .collect();

        for (from, to) in &resolved {
            if conflicting.contains(from) {
                warn!("Ignoring license alias {from:?}: it is already a canonical identifier");
                continue;
            }
            map.entries.insert(from.to_string(), to.clone());
            map.entries
                .entry(to.clone())
                .or_insert_with(|| to.clone());
        }
        map
    }

    /// Follow the target of alias `label` through further aliases until it
    /// reaches a built-in entry or a label that is not aliased. A cycle stops
    /// at the first repeated label.
    fn resolve_alias(&self, label: &str, aliases: &HashMap<&str, &str>) -> String {
        let mut seen = HashSet::new();
        let mut current = aliases.get(label).copied().unwrap_or(label);
        loop {
            if let Some(canonical) = self.entries.get(current) {
                return canonical.clone();
            }
            match aliases.get(current) {
                Some(&next) if seen.insert(current) => current = next,
                _ => return current.to_string(),
            }
        }
    }

    pub fn canonicalize(&self, id: &str) -> Canonical<'_> {
        match self.entries.get(id) {
            Some(canonical) => Canonical::Found(canonical.as_str()),
            None => Canonical::Unknown,
        }
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Distinct canonical identifiers in the table.
    #[cfg(test)]
    pub fn canonical_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.values().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
