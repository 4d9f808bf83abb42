use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maven coordinates of an Android library, as reported by the license-tools plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactId {
    pub name: String,
    pub group: String,
    pub version: String,
}

/// One entry of the `libraries` array written by `./gradlew generateLicenseJson`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidLibrary {
    pub artifact_id: ArtifactId,
    /// Plugin license code, e.g. `apache2` or `mit`.
    pub normalized_license: String,
    #[serde(default)]
    pub copyright_statement: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub copyright_holder: Option<String>,
}

impl AndroidLibrary {
    /// `group:artifact:version`
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}",
            self.artifact_id.group, self.artifact_id.name, self.artifact_id.version
        )
    }
}

/// Top-level shape of the Android license JSON.
#[derive(Debug, Deserialize)]
pub struct AndroidLicenseFile {
    pub libraries: Vec<AndroidLibrary>,
}

/// Declared license(s) of an npm package: a single string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Licenses {
    One(String),
    Many(Vec<String>),
}

impl Licenses {
    /// True when no non-blank identifier is declared.
    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Display form: the string itself, or list entries joined with `", "`.
    pub fn display(&self) -> String {
        self.ids().join(", ")
    }

    /// Declared identifiers in order, with blank entries dropped.
    pub fn ids(&self) -> Vec<&str> {
        let ids: Vec<&str> = match self {
            Licenses::One(s) => vec![s.as_str()],
            Licenses::Many(v) => v.iter().map(String::as_str).collect(),
        };
        ids.into_iter().filter(|id| !id.trim().is_empty()).collect()
    }
}

/// License metadata for one installed npm package, as produced by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Licenses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

/// Scanner output keyed by `name@version`, in scanner order.
pub type PackageMap = IndexMap<String, PackageEntry>;

/// A normalized license record; one element of the output manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_holder: Option<String>,
    pub license_text: String,
}

/// Normalized records from both ecosystems, kept apart until serialization.
#[derive(Debug, Default)]
pub struct Manifest {
    pub android: Vec<LicenseRecord>,
    pub node: Vec<LicenseRecord>,
}

impl Manifest {
    /// Android records first, then npm records.
    pub fn records(&self) -> impl Iterator<Item = &LicenseRecord> {
        self.android.iter().chain(self.node.iter())
    }

    pub fn len(&self) -> usize {
        self.android.len() + self.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.android.is_empty() && self.node.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_map_keeps_insertion_order() {
        let json = r#"{
  "zeta@1.0.0": { "licenses": "MIT" },
  "alpha@2.0.0": { "licenses": ["MIT", "Apache-2.0"] },
  "mid@0.1.0": { "publisher": "Bob" }
}"#;
        let map: PackageMap = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta@1.0.0", "alpha@2.0.0", "mid@0.1.0"]);
        assert_eq!(
            map["alpha@2.0.0"].licenses.as_ref().unwrap().display(),
            "MIT, Apache-2.0"
        );
        assert!(map["mid@0.1.0"].licenses.is_none());
    }

    #[test]
    fn test_blank_license_entries_are_dropped() {
        let mixed = Licenses::Many(vec!["MIT".to_string(), "".to_string(), " ".to_string()]);
        assert_eq!(mixed.ids(), vec!["MIT"]);
        assert_eq!(mixed.display(), "MIT");
        assert!(!mixed.is_empty());

        assert!(Licenses::Many(vec!["".to_string(), "  ".to_string()]).is_empty());
        assert!(Licenses::One(String::new()).is_empty());
        assert!(Licenses::Many(Vec::new()).is_empty());
    }

    #[test]
    fn test_android_library_optional_fields() {
        let json = r#"{
  "artifactId": { "name": "lib", "group": "com.g", "version": "1.0" },
  "normalizedLicense": "mit"
}"#;
        let lib: AndroidLibrary = serde_json::from_str(json).unwrap();
        assert_eq!(lib.coordinates(), "com.g:lib:1.0");
        assert!(lib.url.is_none());
    }

    #[test]
    fn test_record_omits_absent_fields() {
        let record = LicenseRecord {
            name: "pkg@1.0.0".to_string(),
            url: None,
            license: "MIT".to_string(),
            copyright_holder: None,
            license_text: "text".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("url").is_none());
        assert!(value.get("copyrightHolder").is_none());
        assert_eq!(value["licenseText"], "text");
    }
}
