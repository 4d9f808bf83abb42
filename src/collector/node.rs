use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::cli::ScannerKind;
use crate::models::{Licenses, PackageEntry, PackageMap};

/// Enumerate installed npm packages of `project_dir` with the chosen scanner.
pub async fn scan_packages(
    kind: ScannerKind,
    project_dir: &Path,
    license_checker_command: &[String],
) -> Result<PackageMap> {
    info!("Reading installed JavaScript packages...");
    match kind {
        ScannerKind::NodeModules => {
            let dir = project_dir.to_path_buf();
            tokio::task::spawn_blocking(move || scan_node_modules(&dir)).await?
        }
        ScannerKind::LicenseChecker => {
            run_license_checker(license_checker_command, project_dir).await
        }
    }
}

/// Run `license-checker --json --start <project>` and parse its output.
pub async fn run_license_checker(command: &[String], project_dir: &Path) -> Result<PackageMap> {
    let (program, args) = command
        .split_first()
        .context("license_checker_command is empty")?;

    let output = Command::new(program)
        .args(args)
        .arg("--start")
        .arg(project_dir)
        .stderr(Stdio::inherit())
        .output()
        .await
        .with_context(|| format!("failed to run {}", program))?;

    if !output.status.success() {
        bail!("`{}` exited with {}", command.join(" "), output.status);
    }

    serde_json::from_slice(&output.stdout)
        .with_context(|| format!("`{}` printed invalid JSON", command.join(" ")))
}

/// Collect license metadata from the project's own `package.json` and from
/// every package under `<project>/node_modules` (scoped and nested installs
/// included). Keys are sorted.
pub fn scan_node_modules(project_dir: &Path) -> Result<PackageMap> {
    let mut walker = NodeModulesWalker::new()?;
    walker.read_package(project_dir)?;
    let root = project_dir.join("node_modules");

    if root.is_dir() {
        walker.walk(&root)?;
    } else {
        warn!("{} not found; no JavaScript packages to report", root.display());
    }

    let mut packages = walker.packages;
    packages.sort_keys();
    Ok(packages)
}

struct NodeModulesWalker {
    license_file_re: Regex,
    shorthand_re: Regex,
    packages: PackageMap,
}

impl NodeModulesWalker {
    fn new() -> Result<Self> {
        Ok(Self {
            license_file_re: Regex::new(r"(?i)^(licen[cs]e|copying)")?,
            shorthand_re: Regex::new(r"^[\w.-]+/[\w.-]+$")?,
            packages: PackageMap::new(),
        })
    }

    fn walk(&mut self, node_modules: &Path) -> Result<()> {
        for dir in sorted_children(node_modules, |p| p.is_dir())? {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // .bin, .cache, .package-lock.json siblings
            if name.starts_with('.') {
                continue;
            }
            if name.starts_with('@') {
                self.walk(&dir)?;
                continue;
            }

            self.read_package(&dir)?;

            let nested = dir.join("node_modules");
            if nested.is_dir() {
                self.walk(&nested)?;
            }
        }
        Ok(())
    }

    fn read_package(&mut self, dir: &Path) -> Result<()> {
        let manifest = dir.join("package.json");
        if !manifest.is_file() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&manifest)
            .with_context(|| format!("failed to read {}", manifest.display()))?;
        let json: Value = match serde_json::from_str(&content) {
            Ok(json) => json,
            Err(e) => {
                warn!("{} is not valid JSON ({}). Skipping...", manifest.display(), e);
                return Ok(());
            }
        };

        let (Some(name), Some(version)) = (
            json.get("name").and_then(Value::as_str),
            json.get("version").and_then(Value::as_str),
        ) else {
            debug!("{} has no name/version", manifest.display());
            return Ok(());
        };

        let key = format!("{}@{}", name, version);
        if self.packages.contains_key(&key) {
            return Ok(());
        }

        let entry = PackageEntry {
            licenses: declared_licenses(&json),
            license_file: self.find_license_file(dir)?,
            publisher: publisher(&json),
            repository: json
                .get("repository")
                .and_then(|r| r.as_str().or_else(|| r.get("url").and_then(Value::as_str)))
                .map(|url| self.normalize_repository(url)),
        };
        self.packages.insert(key, entry);
        Ok(())
    }

    fn find_license_file(&self, dir: &Path) -> Result<Option<String>> {
        let found = sorted_children(dir, |p| p.is_file())?.into_iter().find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.license_file_re.is_match(n))
        });
        Ok(found.map(|p| p.to_string_lossy().into_owned()))
    }

    /// `git+https://github.com/a/b.git` → `https://github.com/a/b`; expands
    /// `a/b` and `github:a/b` shorthands.
    fn normalize_repository(&self, raw: &str) -> String {
        let url = raw.trim();
        let url = url.strip_prefix("git+").unwrap_or(url);
        let url = url.strip_suffix(".git").unwrap_or(url);

        if let Some(rest) = url.strip_prefix("github:") {
            format!("https://github.com/{}", rest)
        } else if let Some(rest) = url.strip_prefix("git@github.com:") {
            format!("https://github.com/{}", rest)
        } else if let Some(rest) = url.strip_prefix("git://") {
            format!("https://{}", rest)
        } else if self.shorthand_re.is_match(url) {
            format!("https://github.com/{}", url)
        } else {
            url.to_string()
        }
    }
}

fn sorted_children(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut children: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| keep(p.as_path()))
        .collect();
    children.sort();
    Ok(children)
}

/// `license` (string or `{type}`), else the legacy `licenses` array.
fn declared_licenses(json: &Value) -> Option<Licenses> {
    match json.get("license") {
        Some(Value::String(s)) => return Some(Licenses::One(s.clone())),
        Some(Value::Object(o)) => {
            if let Some(t) = o.get("type").and_then(Value::as_str) {
                return Some(Licenses::One(t.to_string()));
            }
        }
        _ => {}
    }

    let mut types: Vec<String> = json
        .get("licenses")?
        .as_array()?
        .iter()
        .filter_map(|l| l.as_str().or_else(|| l.get("type").and_then(Value::as_str)))
        .map(str::to_string)
        .collect();

    match types.len() {
        0 => None,
        1 => Some(Licenses::One(types.remove(0))),
        _ => Some(Licenses::Many(types)),
    }
}

/// Author name from `"Name <email> (url)"` or `{ "name": ... }`.
fn publisher(json: &Value) -> Option<String> {
    let author = json.get("author")?;
    let name = match author {
        Value::String(s) => s.split(&['<', '('][..]).next().unwrap_or(s.as_str()).trim(),
        Value::Object(o) => o.get("name").and_then(Value::as_str)?.trim(),
        _ => return None,
    };
    (!name.is_empty()).then(|| name.to_string())
}
