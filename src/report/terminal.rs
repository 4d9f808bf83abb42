use std::collections::BTreeMap;
use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::license::LicenseIdMap;
use crate::models::{LicenseRecord, Manifest};

/// Print the post-write summary to stdout. `--verbose` adds a per-license table.
pub fn render(
    manifest: &Manifest,
    ids: &LicenseIdMap,
    output: &Path,
    skipped: usize,
    verbose: bool,
    quiet: bool,
) {
    if quiet {
        return;
    }

    println!(
        "\n {} Wrote {} licenses to {}",
        "✓".green().bold(),
        manifest.len().to_string().bold(),
        output.display()
    );
    println!(
        "   Android: {:>4}   JavaScript: {:>4}   Skipped: {:>4}",
        manifest.android.len(),
        manifest.node.len(),
        if skipped > 0 {
            skipped.to_string().yellow()
        } else {
            skipped.to_string().normal()
        }
    );

    let top = top_licenses(manifest.records(), 3);
    if !top.is_empty() {
        let top: Vec<String> = top
            .iter()
            .map(|(license, count)| format!("{} ({})", license, count))
            .collect();
        println!("   Top licenses: {}", top.join(", ").cyan());
    }

    if verbose && !manifest.is_empty() {
        println!("\n{}", license_table(manifest, ids));
    }
}

#[derive(Default)]
struct LicenseCounts {
    android: usize,
    node: usize,
}

fn license_table(manifest: &Manifest, ids: &LicenseIdMap) -> Table {
    let mut counts: BTreeMap<&str, LicenseCounts> = BTreeMap::new();
    for record in &manifest.android {
        counts.entry(record.license.as_str()).or_default().android += 1;
    }
    for record in &manifest.node {
        counts.entry(record.license.as_str()).or_default().node += 1;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Canonical").add_attribute(Attribute::Bold),
            Cell::new("Android").add_attribute(Attribute::Bold),
            Cell::new("JavaScript").add_attribute(Attribute::Bold),
        ]);

    for (license, count) in counts {
        let canonical = match ids.canonicalize(license).id() {
            Some(id) => Cell::new(id),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(license),
            canonical,
            Cell::new(count.android).set_alignment(CellAlignment::Right),
            Cell::new(count.node).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Licenses by record count, most frequent first; ties in name order.
fn top_licenses<'a>(
    records: impl IntoIterator<Item = &'a LicenseRecord>,
    n: usize,
) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.license.as_str()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(license, count)| (license.to_string(), count))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs.truncate(n);
    pairs
}
