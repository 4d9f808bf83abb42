use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{LicenseRecord, Manifest};

/// Serialize the manifest (Android records first) as a 2-space indented JSON array.
pub fn to_json(manifest: &Manifest) -> Result<String> {
    let records: Vec<&LicenseRecord> = manifest.records().collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write the manifest to `output`, replacing any previous file.
pub fn write_manifest(manifest: &Manifest, output: &Path) -> Result<()> {
    let json = to_json(manifest)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn record(name: &str) -> LicenseRecord {
        LicenseRecord {
            name: name.to_string(),
            url: Some(format!("https://example.com/{}", name)),
            license: "MIT".to_string(),
            copyright_holder: Some("Acme".to_string()),
            license_text: "text".to_string(),
        }
    }

    #[test]
    fn test_android_records_first() {
        let manifest = Manifest {
            android: vec![record("com.g:lib:1.0")],
            node: vec![record("pkg@1.0.0"), record("other@2.0.0")],
        };
        let value: Value = serde_json::from_str(&to_json(&manifest).unwrap()).unwrap();
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["com.g:lib:1.0", "pkg@1.0.0", "other@2.0.0"]);
    }

    #[test]
    fn test_two_space_indent_and_field_names() {
        let manifest = Manifest {
            android: vec![record("com.g:lib:1.0")],
            node: vec![],
        };
        let json = to_json(&manifest).unwrap();
        assert!(json.starts_with("[\n  {\n    \"name\": \"com.g:lib:1.0\""));
        assert!(json.contains("\"copyrightHolder\": \"Acme\""));
        assert!(json.contains("\"licenseText\": \"text\""));
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("licenses.json");

        write_manifest(
            &Manifest {
                android: vec![record("a:b:1"), record("a:c:1")],
                node: vec![],
            },
            &output,
        )
        .unwrap();
        write_manifest(&Manifest::default(), &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
    }
}
