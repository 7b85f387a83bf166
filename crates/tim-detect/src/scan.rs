//! Whole-document scanning: find price-bearing elements in saved HTML, pick
//! a price for each and compute its annotation.
//!
//! Nothing is written back into the document. Each [`Annotation`] carries
//! the element's text before and after, for whatever applies it.

use std::collections::HashSet;

use scraper::{ElementRef, Html};
use serde::Serialize;
use tim_core::{PriceMatch, Settings, TimeDuration};

use crate::convert::{annotate_match, hourly_rate};
use crate::dom::{
    analyze_element, collapsed_text, element_ancestors, enclosing_elements, has_price_attributes,
    is_annotated,
};
use crate::patterns::{extract_prices, mentions_currency};
use crate::select::merge_and_select;

/// Candidate elements are processed in batches of this many.
pub const SCAN_CHUNK_SIZE: usize = 64;

/// How many ancestors a candidate may climb when its own subtree holds only
/// part of a price, e.g. the `$` of a split price.
const MAX_ESCALATION: usize = 3;

const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template", "textarea"];

/// One element's computed annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Tag name of the annotated element.
    pub element: String,
    pub original: String,
    pub annotated: String,
    pub price: PriceMatch,
    pub duration: TimeDuration,
}

/// Scans `html` and returns an annotation for every price-bearing element
/// whose best candidate is in the configured currency, in document order.
///
/// Elements already marked as annotated (or inside one) are skipped. An
/// unusable wage yields no annotations.
#[must_use]
pub fn scan_document(html: &str, settings: &Settings) -> Vec<Annotation> {
    let rate = match hourly_rate(&settings.wage) {
        Ok(rate) => rate,
        Err(error) => {
            tracing::warn!(%error, "wage unusable, document not scanned");
            return Vec::new();
        }
    };
    let format = settings.number_format();
    let target_currency = settings.target_currency();

    let document = Html::parse_document(html);
    let mut candidates: Vec<ElementRef<'_>> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_candidate(*el))
        .collect();
    // Descendants come after their ancestors in document order; reversing
    // puts leaves first.
    candidates.reverse();

    let mut claimed = HashSet::new();
    let mut contains_claimed = HashSet::new();
    let mut found: Vec<(usize, Annotation)> = Vec::new();

    for (chunk_index, chunk) in candidates.chunks(SCAN_CHUNK_SIZE).enumerate() {
        tracing::debug!(chunk = chunk_index, size = chunk.len(), "scanning candidate chunk");

        for (offset, candidate) in chunk.iter().enumerate() {
            if is_annotated(*candidate)
                || enclosing_elements(*candidate).any(|a| claimed.contains(&a.id()))
            {
                continue;
            }

            let targets = std::iter::once(*candidate)
                .chain(element_ancestors(*candidate).take(MAX_ESCALATION));
            for target in targets {
                if claimed.contains(&target.id()) || contains_claimed.contains(&target.id()) {
                    break;
                }

                let text = collapsed_text(target);
                let batches = [extract_prices(&text, &format), analyze_element(target, &format)];
                // Only a fragment of a price, such as a lone symbol: try the parent.
                if batches.iter().all(Vec::is_empty) {
                    continue;
                }
                let selection = merge_and_select(batches, target_currency);
                let Some(best) = selection.best() else {
                    break;
                };

                match annotate_match(&text, best, rate, settings.time_format) {
                    Ok(annotated) => {
                        claimed.insert(target.id());
                        contains_claimed.extend(enclosing_elements(target).map(|a| a.id()));
                        // Reverse position restores document order when sorted.
                        let position = candidates.len() - (chunk_index * SCAN_CHUNK_SIZE + offset);
                        found.push((
                            position,
                            Annotation {
                                element: target.value().name().to_string(),
                                original: text,
                                annotated: annotated.text,
                                price: annotated.price,
                                duration: annotated.duration,
                            },
                        ));
                    }
                    Err(error) => {
                        tracing::debug!(%error, tag = target.value().name(), "price not annotated");
                    }
                }
                break;
            }
        }
    }

    found.sort_by_key(|(position, _)| *position);
    tracing::info!(
        candidates = candidates.len(),
        annotations = found.len(),
        "document scanned"
    );
    found.into_iter().map(|(_, annotation)| annotation).collect()
}

/// An element worth analyzing: its own text (not its descendants') mentions
/// a currency, or it carries price attributes.
fn is_candidate(element: ElementRef<'_>) -> bool {
    if SKIPPED_TAGS.contains(&element.value().name())
        || element_ancestors(element).any(|a| SKIPPED_TAGS.contains(&a.value().name()))
    {
        return false;
    }
    if has_price_attributes(element) {
        return true;
    }
    let own_text: String = element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect();
    mentions_currency(&own_text)
}

#[cfg(test)]
mod tests {
    use tim_core::{TimeFormat, WageConfig};

    use super::*;
    use crate::dom::MAX_ANCESTOR_DEPTH;

    fn settings(amount: &str) -> Settings {
        Settings {
            wage: WageConfig::hourly(amount),
            ..Settings::default()
        }
    }

    #[test]
    fn annotates_each_price_in_document_order() {
        let html = r"<html><body><p>Coffee $3.00</p><p>Lunch $15.00</p></body></html>";
        let found = scan_document(html, &settings("15"));
        let annotated: Vec<&str> = found.iter().map(|a| a.annotated.as_str()).collect();
        assert_eq!(annotated, vec!["Coffee $3.00 (0h 12m)", "Lunch $15.00 (1h 0m)"]);
        assert_eq!(found[0].element, "p");
    }

    #[test]
    fn split_price_escalates_to_parent() {
        let html = r#"<div class="price"><span>$</span><span>19</span><span>99</span></div>"#;
        let found = scan_document(html, &settings("20"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].element, "div");
        assert_eq!(found[0].duration, TimeDuration::new(1, 0));
    }

    #[test]
    fn already_annotated_elements_are_skipped() {
        let html = r#"<div class="tim-annotated"><span>$30.00 (1h 30m)</span></div><p>$20.00</p>"#;
        let found = scan_document(html, &settings("20"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].original, "$20.00");
    }

    #[test]
    fn deep_content_under_annotated_container_is_skipped() {
        let depth = MAX_ANCESTOR_DEPTH + 5;
        let html = format!(
            r#"<div class="tim-annotated">{}<span>$30.00 (1h 30m)</span>{}</div>"#,
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        assert!(scan_document(&html, &settings("20")).is_empty());
    }

    #[test]
    fn foreign_currency_is_left_alone() {
        let found = scan_document("<p>Total 12,00 €</p>", &settings("20"));
        assert!(found.is_empty());
    }

    #[test]
    fn unusable_wage_scans_nothing() {
        assert!(scan_document("<p>$10</p>", &settings("0")).is_empty());
    }

    #[test]
    fn script_contents_are_ignored() {
        let html = r#"<script>var price = "$10";</script><p>nothing here</p>"#;
        assert!(scan_document(html, &settings("20")).is_empty());
    }

    #[test]
    fn verbose_time_format_is_honoured() {
        let settings = Settings {
            time_format: TimeFormat::Verbose,
            ..settings("20")
        };
        let found = scan_document("<p>$30.00</p>", &settings);
        assert_eq!(found[0].annotated, "$30.00 (1 hour, 30 minutes)");
    }

    #[test]
    fn many_candidates_cross_chunk_boundaries() {
        let items: String = (1..=SCAN_CHUNK_SIZE * 2 + 5)
            .map(|i| format!("<li>${i}</li>"))
            .collect();
        let found = scan_document(&format!("<ul>{items}</ul>"), &settings("1"));
        assert_eq!(found.len(), SCAN_CHUNK_SIZE * 2 + 5);
        assert_eq!(found[0].original, "$1");
        let last = i64::try_from(SCAN_CHUNK_SIZE * 2 + 5).unwrap();
        assert_eq!(found.last().unwrap().duration.hours, last);
    }
}
