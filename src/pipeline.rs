//! The two independent collection pipelines and their join.
//!
//! Android and npm metadata share nothing but the read-only [`TextResolver`],
//! so they run concurrently. Output order is fixed by [`Manifest::records`],
//! not by which pipeline finishes first.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::collector::{gradle, node};
use crate::config::Settings;
use crate::license::TextResolver;
use crate::models::{LicenseRecord, Manifest};
use crate::normalize::android::normalize_android_all;
use crate::normalize::node::{normalize_packages, NodeNormalization, PackageWarning};

pub struct PipelineOutput {
    pub manifest: Manifest,
    pub warnings: Vec<PackageWarning>,
}

impl PipelineOutput {
    /// Packages dropped for having no declared license.
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PackageWarning::NoLicense(_)))
            .count()
    }
}

pub async fn run(settings: &Settings, resolver: Arc<TextResolver>) -> Result<PipelineOutput> {
    let (android, node) = tokio::try_join!(
        android_pipeline(settings, Arc::clone(&resolver)),
        node_pipeline(settings, Arc::clone(&resolver)),
    )?;

    Ok(PipelineOutput {
        manifest: Manifest {
            android,
            node: node.records,
        },
        warnings: node.warnings,
    })
}

async fn android_pipeline(
    settings: &Settings,
    resolver: Arc<TextResolver>,
) -> Result<Vec<LicenseRecord>> {
    if settings.skip_android_build {
        info!("Skipping Gradle; using existing license file");
    } else {
        gradle::run_license_task(&settings.android_project_dir, &settings.gradle_task).await?;
    }

    let path = settings.android_license_file.clone();
    info!("Reading licenses from {}", path.display());
    tokio::task::spawn_blocking(move || {
        let libraries = gradle::read_license_json(&path)?;
        normalize_android_all(&libraries, &resolver)
    })
    .await?
}

async fn node_pipeline(
    settings: &Settings,
    resolver: Arc<TextResolver>,
) -> Result<NodeNormalization> {
    let packages = node::scan_packages(
        settings.scanner,
        &settings.project_dir,
        &settings.license_checker_command,
    )
    .await?;
    info!("Normalizing {} JavaScript packages", packages.len());

    tokio::task::spawn_blocking(move || normalize_packages(&packages, &resolver)).await?
}
