//! `tim convert`: annotate a single string.

use tim_core::Settings;
use tim_detect::convert_price_to_time_string_with_format;

/// Prints `text` with its first price annotated, or unchanged when there is
/// nothing to annotate.
pub(crate) fn run_convert(text: &str, settings: &Settings) {
    println!("{}", render_convert(text, settings));
}

pub(crate) fn render_convert(text: &str, settings: &Settings) -> String {
    let format = settings.number_format();
    convert_price_to_time_string_with_format(
        text,
        Some(&format),
        Some(&settings.wage),
        settings.time_format,
    )
}
