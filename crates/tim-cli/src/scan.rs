//! `tim scan`: annotate every price in a saved HTML page.

use std::path::Path;

use anyhow::Context;
use tim_core::Settings;
use tim_detect::scan_document;

/// Reads `path`, scans it and prints one line (or one JSON record) per
/// annotated element.
///
/// # Errors
///
/// Returns an error if the file cannot be read or JSON serialization fails.
/// Elements without a usable price are skipped, not reported.
pub(crate) fn run_scan(path: &Path, settings: &Settings, json: bool) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let annotations = scan_document(&html, settings);
    tracing::info!(
        file = %path.display(),
        count = annotations.len(),
        "scan complete"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&annotations)?);
        return Ok(());
    }

    if annotations.is_empty() {
        println!("no {} prices found", settings.target_currency());
    }
    for annotation in &annotations {
        println!("<{}> {}", annotation.element, annotation.annotated);
    }
    Ok(())
}
