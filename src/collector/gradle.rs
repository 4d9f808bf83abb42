use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::info;

use crate::models::{AndroidLibrary, AndroidLicenseFile};

fn gradle_wrapper(android_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        android_dir.join("gradlew.bat")
    } else {
        android_dir.join("gradlew")
    }
}

/// Run `gradlew <task>` inside the Android project. Gradle's output goes
/// straight to this process's console.
///
/// The child starts in `android_dir`, so the wrapper path must be absolute.
pub async fn run_license_task(android_dir: &Path, task: &str) -> Result<()> {
    let android_dir = android_dir.canonicalize().with_context(|| {
        format!("Android project directory {} not found", android_dir.display())
    })?;
    let wrapper = gradle_wrapper(&android_dir);
    info!("Generating licenses: {} {}", wrapper.display(), task);

    let status = Command::new(&wrapper)
        .arg(task)
        .current_dir(&android_dir)
        .status()
        .await
        .with_context(|| format!("failed to run {}", wrapper.display()))?;

    if !status.success() {
        bail!(
            "`{} {}` failed in {} ({})",
            wrapper.display(),
            task,
            android_dir.display(),
            status
        );
    }
    Ok(())
}

/// Read the `libraries` array of the license JSON written by the Gradle task.
pub fn read_license_json(path: &Path) -> Result<Vec<AndroidLibrary>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read Android license file {}", path.display()))?;
    let parsed: AndroidLicenseFile = serde_json::from_str(&content)
        .with_context(|| format!("invalid Android license file {}", path.display()))?;
    Ok(parsed.libraries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_license_json() {
        let json = r#"{
  "libraries": [
    {
      "artifactId": { "name": "appcompat", "group": "androidx.appcompat", "version": "1.6.1" },
      "normalizedLicense": "apache2",
      "copyrightStatement": "Copyright &copy; The Android Open Source Project. All rights reserved.",
      "license": "The Apache Software License, Version 2.0",
      "licenseUrl": "https://www.apache.org/licenses/LICENSE-2.0.txt",
      "libraryName": "AppCompat",
      "url": "https://developer.android.com/jetpack/androidx/releases/appcompat",
      "copyrightHolder": "The Android Open Source Project"
    },
    {
      "artifactId": { "name": "okhttp", "group": "com.squareup.okhttp3", "version": "4.12.0" },
      "normalizedLicense": "apache2"
    }
  ]
}"#;
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", json).unwrap();
        let libs = read_license_json(f.path()).unwrap();
        assert_eq!(libs.len(), 2);
        assert_eq!(libs[0].coordinates(), "androidx.appcompat:appcompat:1.6.1");
        assert_eq!(libs[0].library_name.as_deref(), Some("AppCompat"));
        assert_eq!(libs[1].copyright_holder, None);
    }

    #[test]
    fn test_read_license_json_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_license_json(&dir.path().join("licenses.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read Android license file"));
    }

    #[test]
    fn test_read_license_json_without_libraries() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{{\"dependencies\": []}}").unwrap();
        assert!(read_license_json(f.path()).is_err());
    }

    #[cfg(unix)]
    fn fake_wrapper(dir: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("gradlew");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_license_task_in_android_dir() {
        let dir = TempDir::new().unwrap();
        fake_wrapper(dir.path(), "#!/bin/sh\necho \"$1\" > task.txt\n");

        run_license_task(dir.path(), "generateLicenseJson").await.unwrap();
        let written = std::fs::read_to_string(dir.path().join("task.txt")).unwrap();
        assert_eq!(written.trim(), "generateLicenseJson");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_license_task_failure() {
        let dir = TempDir::new().unwrap();
        fake_wrapper(dir.path(), "#!/bin/sh\nexit 3\n");
        assert!(run_license_task(dir.path(), "generateLicenseJson").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_license_task_relative_android_dir() {
        let dir = TempDir::new_in(".").unwrap();
        let android = dir.path().join("android");
        std::fs::create_dir(&android).unwrap();
        fake_wrapper(&android, "#!/bin/sh\necho \"$1\" > task.txt\n");

        let relative = Path::new(".")
            .join(dir.path().file_name().unwrap())
            .join("android");
        assert!(relative.is_relative());
        run_license_task(&relative, "generateLicenseJson").await.unwrap();
        let written = std::fs::read_to_string(android.join("task.txt")).unwrap();
        assert_eq!(written.trim(), "generateLicenseJson");
    }

    #[tokio::test]
    async fn test_run_license_task_missing_android_dir() {
        let dir = TempDir::new().unwrap();
        let err = run_license_task(&dir.path().join("android"), "generateLicenseJson")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Android project directory"));
    }

    #[tokio::test]
    async fn test_run_license_task_missing_wrapper() {
        let dir = TempDir::new().unwrap();
        let err = run_license_task(dir.path(), "generateLicenseJson")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to run"));
    }
}
