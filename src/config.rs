use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{Cli, ScannerKind};

const CONFIG_DIR: &str = ".license-manifest";
const CONFIG_FILE: &str = "config.toml";

/// Optional configuration file, deserialized from `.license-manifest/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub android: AndroidConfig,
    pub node: NodeConfig,
    pub licenses: LicensesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// Gradle task that writes the license JSON.
    pub gradle_task: String,
    /// Read the existing license JSON without running Gradle.
    pub skip_build: bool,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            gradle_task: "generateLicenseJson".to_string(),
            skip_build: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub scanner: ScannerKind,
    /// Command used by the `license-checker` scanner; `--start <project>` is appended.
    pub license_checker_command: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerKind::NodeModules,
            license_checker_command: vec![
                "npx".to_string(),
                "--yes".to_string(),
                "license-checker".to_string(),
                "--json".to_string(),
            ],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LicensesConfig {
    /// Directory holding `<license-id>.txt` templates; relative paths are
    /// resolved against the project directory.
    pub templates_dir: Option<PathBuf>,
    /// Extra `raw label -> canonical id` mappings.
    pub aliases: HashMap<String, String>,
}

/// Load the configuration file, searching in order:
///
/// 1. `config_override`, the path passed via `--config`
/// 2. `<project_path>/.license-manifest/config.toml`
/// 3. `~/.config/license-manifest/config.toml`
/// 4. Built-in [`FileConfig::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(CONFIG_DIR).join(CONFIG_FILE);
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-manifest")
            .join(CONFIG_FILE);
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(FileConfig::default())
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

/// Fully resolved run settings. Built once at startup; nothing downstream
/// consults the working directory or the CLI again.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub android_project_dir: PathBuf,
    pub android_license_file: PathBuf,
    pub output_file: PathBuf,
    pub gradle_task: String,
    pub skip_android_build: bool,
    pub scanner: ScannerKind,
    pub license_checker_command: Vec<String>,
    pub templates_dir: Option<PathBuf>,
    pub aliases: HashMap<String, String>,
}

impl Settings {
    /// Resolve path defaults relative to `project_dir`; CLI flags win over the file.
    pub fn resolve(cli: &Cli, project_dir: PathBuf, file: FileConfig) -> Self {
        let android_project_dir = cli
            .android_project
            .clone()
            .unwrap_or_else(|| project_dir.join("android"));
        let android_license_file = cli.android_license_file.clone().unwrap_or_else(|| {
            android_project_dir
                .join("src")
                .join("main")
                .join("assets")
                .join("licenses.json")
        });
        let output_file = cli
            .output
            .clone()
            .unwrap_or_else(|| project_dir.join("licenses.json"));
        let templates_dir = file
            .licenses
            .templates_dir
            .map(|dir| if dir.is_absolute() { dir } else { project_dir.join(dir) });

        Settings {
            android_project_dir,
            android_license_file,
            output_file,
            gradle_task: file.android.gradle_task,
            skip_android_build: cli.skip_android_build || file.android.skip_build,
            scanner: cli.scanner.unwrap_or(file.node.scanner),
            license_checker_command: file.node.license_checker_command,
            templates_dir,
            aliases: file.licenses.aliases,
            project_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("license-manifest").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_cascade_from_project() {
        let cli = parse(&[]);
        let settings = Settings::resolve(&cli, PathBuf::from("/app"), FileConfig::default());
        assert_eq!(settings.android_project_dir, PathBuf::from("/app/android"));
        assert_eq!(
            settings.android_license_file,
            PathBuf::from("/app/android/src/main/assets/licenses.json")
        );
        assert_eq!(settings.output_file, PathBuf::from("/app/licenses.json"));
        assert_eq!(settings.gradle_task, "generateLicenseJson");
        assert_eq!(settings.scanner, ScannerKind::NodeModules);
        assert!(!settings.skip_android_build);
    }

    #[test]
    fn test_android_project_drives_license_file() {
        let cli = parse(&["--androidProject", "/native"]);
        let settings = Settings::resolve(&cli, PathBuf::from("/app"), FileConfig::default());
        assert_eq!(
            settings.android_license_file,
            PathBuf::from("/native/src/main/assets/licenses.json")
        );
        assert_eq!(settings.output_file, PathBuf::from("/app/licenses.json"));
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_DIR).join(CONFIG_FILE),
            r#"
[android]
gradle_task = "app:generateLicenseJson"

[node]
scanner = "license-checker"

[licenses]
templates_dir = "legal/templates"

[licenses.aliases]
acme_eula = "Acme-EULA"
"#,
        )
        .unwrap();

        let file = load_config(dir.path(), None).unwrap();
        assert_eq!(file.android.gradle_task, "app:generateLicenseJson");
        assert_eq!(file.node.scanner, ScannerKind::LicenseChecker);
        assert_eq!(file.licenses.aliases["acme_eula"], "Acme-EULA");

        let cli = parse(&["--scanner", "node-modules", "--skip-android-build"]);
        let settings = Settings::resolve(&cli, dir.path().to_path_buf(), file);
        assert_eq!(settings.scanner, ScannerKind::NodeModules);
        assert!(settings.skip_android_build);
        assert_eq!(
            settings.templates_dir,
            Some(dir.path().join("legal/templates"))
        );
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[android\n").unwrap();
        assert!(load_config(dir.path(), Some(&path)).is_err());
    }
}
