//! `license-manifest`: collect Android and npm dependency licenses into one JSON file.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and resolve [`config::Settings`] once.
//! 2. Concurrently ([`pipeline`]):
//!    - run the Gradle license task and read its JSON ([`collector::gradle`]),
//!      then normalize each library ([`normalize::android`]);
//!    - enumerate installed npm packages ([`collector::node`]) and normalize
//!      them ([`normalize::node`]).
//! 3. License texts come from [`license::TextResolver`].
//! 4. Write the combined manifest, Android first ([`report::json`]).
//! 5. Print a summary ([`report::terminal`]).
//!
//! Any failure aborts before the output file is touched.

mod cli;
mod collector;
mod config;
mod license;
mod models;
mod normalize;
mod pipeline;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::{load_config, Settings};
use license::{LicenseIdMap, TextResolver};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let project_dir = match &cli.project {
        Some(dir) => dir.canonicalize().unwrap_or_else(|_| dir.clone()),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let file_config = load_config(&project_dir, cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, project_dir, file_config);

    info!("Project directory: {}", settings.project_dir.display());
    info!("Android project directory: {}", settings.android_project_dir.display());
    info!("Android license file: {}", settings.android_license_file.display());
    info!("Output file: {}", settings.output_file.display());

    let resolver = Arc::new(TextResolver::new(
        LicenseIdMap::with_aliases(&settings.aliases),
        settings.templates_dir.clone(),
    ));

    let output = pipeline::run(&settings, Arc::clone(&resolver)).await?;

    info!("Writing licenses to file...");
    report::json::write_manifest(&output.manifest, &settings.output_file)?;

    report::terminal::render(
        &output.manifest,
        resolver.ids(),
        &settings.output_file,
        output.skipped(),
        cli.verbose,
        cli.quiet,
    );

    Ok(())
}

/// Warnings and errors go to stderr; `--verbose` diagnostics go to stdout.
/// `RUST_LOG` overrides the level.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(writer),
        )
        .init();
}
