//! `tim detect`: show every price candidate in a string and how it ranks.

use tim_core::Settings;
use tim_detect::{extract_prices, select_candidates, Selection};

pub(crate) fn detect(text: &str, settings: &Settings) -> Selection {
    let format = settings.number_format();
    select_candidates(extract_prices(text, &format), settings.target_currency())
}

/// Prints the ranked candidates for `text`, best first.
///
/// # Errors
///
/// Returns an error if JSON output was requested and serialization fails.
pub(crate) fn run_detect(text: &str, settings: &Settings, json: bool) -> anyhow::Result<()> {
    let selection = detect(text, settings);

    if json {
        println!("{}", serde_json::to_string_pretty(selection.ranked())?);
        return Ok(());
    }

    if selection.is_empty() {
        println!("no {} price found", settings.target_currency());
        return Ok(());
    }
    for (rank, candidate) in selection.ranked().iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>10} {:<4} confidence {:.2}  {}",
            rank + 1,
            candidate.source().to_string(),
            candidate.value().to_string(),
            candidate.currency(),
            candidate.confidence(),
            candidate.original_text(),
        );
    }
    Ok(())
}
