//! Price recovery from element structure rather than contiguous text.
//!
//! Storefronts often render a price as attributes (`data-price="19.99"`),
//! as an accessible label, or as separate spans for the symbol, the whole
//! amount and the cents. [`analyze_element`] tries those shapes in order of
//! how much they can be trusted and stops at the first that yields a price.
//!
//! Every walk is bounded: descendants by [`MAX_WALK_DEPTH`] levels and
//! [`MAX_WALK_NODES`] nodes, ancestors by [`MAX_ANCESTOR_DEPTH`] levels.
//! The annotation marker is looked for further up, [`MAX_MARKER_DEPTH`]
//! levels, since a marked container can wrap a deep subtree.

use scraper::ElementRef;
use tim_core::{MatchSource, NumberFormat, PriceMatch};

use crate::normalize::{join_components, normalize_amount};
use crate::patterns::{extract_prices, find_currency, mentions_currency};

pub const MAX_WALK_DEPTH: usize = 10;
pub const MAX_WALK_NODES: usize = 256;
pub const MAX_ANCESTOR_DEPTH: usize = 10;
pub const MAX_MARKER_DEPTH: usize = 128;

/// Class added by the page-mutation side to elements it already annotated.
pub const ANNOTATED_CLASS: &str = "tim-annotated";

const STRUCTURED_CONFIDENCE: f64 = 0.95;
const LABEL_CONFIDENCE: f64 = 0.9;
const SPLIT_CONFIDENCE: f64 = 0.9;
const TEXT_CONFIDENCE_CAP: f64 = 0.8;

const AMOUNT_ATTRS: &[&str] = &["data-price", "data-price-amount", "data-amount"];
const CURRENCY_ATTRS: &[&str] = &["data-currency", "data-price-currency", "data-currency-code"];
const LABEL_ATTRS: &[&str] = &["aria-label", "title", "alt"];

const SYMBOL_CLASS_HINTS: &[&str] = &["currency", "symbol"];
const WHOLE_CLASS_HINTS: &[&str] = &["whole", "integer", "dollars"];
const FRACTION_CLASS_HINTS: &[&str] = &["fraction", "cents"];

/// The structure-analysis strategies, most trusted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    StructuredAttributes,
    LabelAttributes,
    SplitComponents,
    TextContent,
}

pub const STRATEGIES: [Strategy; 4] = [
    Strategy::StructuredAttributes,
    Strategy::LabelAttributes,
    Strategy::SplitComponents,
    Strategy::TextContent,
];

impl Strategy {
    /// Runs this strategy alone against `element`.
    #[must_use]
    pub fn apply(self, element: ElementRef<'_>, format: &NumberFormat) -> Vec<PriceMatch> {
        self.apply_to_walk(element, &BoundedWalk::new(element), format)
    }

    fn apply_to_walk(
        self,
        element: ElementRef<'_>,
        walk: &BoundedWalk<'_>,
        format: &NumberFormat,
    ) -> Vec<PriceMatch> {
        match self {
            Strategy::StructuredAttributes => {
                structured_attributes(element, walk).into_iter().collect()
            }
            Strategy::LabelAttributes => label_attributes(walk, format),
            Strategy::SplitComponents => split_components(element, walk, format)
                .into_iter()
                .collect(),
            Strategy::TextContent => text_content(walk, format),
        }
    }
}

/// Runs the strategies in order and returns the matches of the first one
/// that finds anything. Returns an empty vec, with a warning logged, when
/// the element carries no recognizable price.
#[must_use]
pub fn analyze_element(element: ElementRef<'_>, format: &NumberFormat) -> Vec<PriceMatch> {
    let walk = BoundedWalk::new(element);
    for strategy in STRATEGIES {
        let found = strategy.apply_to_walk(element, &walk, format);
        if !found.is_empty() {
            tracing::debug!(
                tag = element.value().name(),
                ?strategy,
                count = found.len(),
                "price structure recognized"
            );
            return found;
        }
    }

    tracing::warn!(
        tag = element.value().name(),
        "no price structure recognized in element"
    );
    Vec::new()
}

/// Returns `true` if the element, or one of its nearest ancestors, already
/// carries [`ANNOTATED_CLASS`].
#[must_use]
pub fn is_annotated(element: ElementRef<'_>) -> bool {
    std::iter::once(element)
        .chain(enclosing_elements(element))
        .any(|el| el.value().classes().any(|c| c == ANNOTATED_CLASS))
}

/// Returns `true` if the element itself carries an amount attribute,
/// microdata price, or a label attribute mentioning a currency.
#[must_use]
pub fn has_price_attributes(element: ElementRef<'_>) -> bool {
    let el = element.value();
    AMOUNT_ATTRS.iter().any(|name| el.attr(name).is_some())
        || el.attr("itemprop") == Some("price")
        || LABEL_ATTRS
            .iter()
            .filter_map(|name| el.attr(name))
            .any(mentions_currency)
}

/// Whitespace-collapsed text content, gathered within the walk bounds.
#[must_use]
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    BoundedWalk::new(element).text
}

// ---------------------------------------------------------------------------
// Bounded traversal
// ---------------------------------------------------------------------------

struct BoundedWalk<'a> {
    /// Elements in document order, the root first.
    elements: Vec<ElementRef<'a>>,
    /// Concatenated text nodes with whitespace runs collapsed.
    text: String,
    visited: usize,
    truncated: bool,
}

impl<'a> BoundedWalk<'a> {
    fn new(root: ElementRef<'a>) -> Self {
        let mut walk = Self {
            elements: Vec::new(),
            text: String::new(),
            visited: 0,
            truncated: false,
        };
        let mut raw_text = String::new();
        walk.visit(root, 0, &mut raw_text);
        walk.text = collapse_whitespace(&raw_text);
        if walk.truncated {
            tracing::debug!(
                tag = root.value().name(),
                visited = walk.visited,
                "element walk stopped at traversal bound"
            );
        }
        walk
    }

    fn visit(&mut self, element: ElementRef<'a>, depth: usize, raw_text: &mut String) {
        if self.visited >= MAX_WALK_NODES {
            self.truncated = true;
            return;
        }
        self.visited += 1;
        self.elements.push(element);

        for child in element.children() {
            if self.visited >= MAX_WALK_NODES {
                self.truncated = true;
                return;
            }
            if let Some(child_element) = ElementRef::wrap(child) {
                if depth + 1 > MAX_WALK_DEPTH {
                    self.truncated = true;
                    continue;
                }
                self.visit(child_element, depth + 1, raw_text);
            } else if let Some(text) = child.value().as_text() {
                self.visited += 1;
                raw_text.push_str(text);
            }
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn element_ancestors(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(MAX_ANCESTOR_DEPTH)
}

/// Ancestors up to [`MAX_MARKER_DEPTH`] levels, for checks that ask whether
/// an element sits inside something already handled.
pub(crate) fn enclosing_elements(
    element: ElementRef<'_>,
) -> impl Iterator<Item = ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(MAX_MARKER_DEPTH)
}

fn first_attr<'a>(element: ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| element.value().attr(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn has_class_hint(element: ElementRef<'_>, hints: &[&str]) -> bool {
    element.value().classes().any(|class| {
        let class = class.to_ascii_lowercase();
        hints.iter().any(|hint| class.contains(hint))
    })
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// `data-price` style attributes, or microdata `itemprop="price"`.
fn structured_attributes(root: ElementRef<'_>, walk: &BoundedWalk<'_>) -> Option<PriceMatch> {
    let (holder, raw_amount) = walk.elements.iter().find_map(|el| {
        let amount = first_attr(*el, AMOUNT_ATTRS).or_else(|| {
            (el.value().attr("itemprop") == Some("price"))
                .then(|| first_attr(*el, &["content"]))
                .flatten()
        })?;
        Some((*el, amount))
    })?;

    let value = normalize_amount(raw_amount, &NumberFormat::machine())?;

    let currency = first_attr(holder, CURRENCY_ATTRS)
        .or_else(|| {
            walk.elements.iter().find_map(|el| {
                (el.value().attr("itemprop") == Some("priceCurrency"))
                    .then(|| first_attr(*el, &["content"]))
                    .flatten()
            })
        })
        .or_else(|| element_ancestors(root).find_map(|a| first_attr(a, CURRENCY_ATTRS)))
        .or_else(|| find_currency(&walk.text))?;

    let original = if walk.text.is_empty() {
        raw_amount.to_string()
    } else {
        walk.text.clone()
    };

    PriceMatch::new(
        value,
        currency,
        original,
        STRUCTURED_CONFIDENCE,
        MatchSource::DomAttribute,
    )
}

/// Accessible names such as `aria-label="Price: $19.99"`.
fn label_attributes(walk: &BoundedWalk<'_>, format: &NumberFormat) -> Vec<PriceMatch> {
    for el in &walk.elements {
        for name in LABEL_ATTRS {
            let Some(label) = first_attr(*el, &[*name]) else {
                continue;
            };
            let found: Vec<PriceMatch> = extract_prices(label, format)
                .iter()
                .map(|m| m.retagged(LABEL_CONFIDENCE, MatchSource::DomAttribute))
                .collect();
            if !found.is_empty() {
                return found;
            }
        }
    }
    Vec::new()
}

/// Symbol, whole amount and cents rendered as separate elements.
fn split_components(
    root: ElementRef<'_>,
    walk: &BoundedWalk<'_>,
    format: &NumberFormat,
) -> Option<PriceMatch> {
    split_by_class(root, walk, format).or_else(|| split_by_position(root, walk, format))
}

/// Class-named parts, e.g. `a-price-symbol` / `a-price-whole` / `a-price-fraction`.
fn split_by_class(
    root: ElementRef<'_>,
    walk: &BoundedWalk<'_>,
    format: &NumberFormat,
) -> Option<PriceMatch> {
    let find_part = |hints: &[&str]| {
        walk.elements
            .iter()
            .skip(1)
            .find(|el| has_class_hint(**el, hints))
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
    };

    let whole = find_part(WHOLE_CLASS_HINTS)?;
    let fraction = find_part(FRACTION_CLASS_HINTS)?;
    let currency = find_part(SYMBOL_CLASS_HINTS)
        .filter(|s| !s.is_empty())
        .or_else(|| find_currency(&walk.text).map(str::to_string))
        .or_else(|| {
            element_ancestors(root)
                .find_map(|a| first_attr(a, CURRENCY_ATTRS))
                .map(str::to_string)
        })?;

    // A trailing decimal mark from a nested `a-price-decimal` span is dropped here.
    let value = join_components(&whole, Some(&fraction), format)?;

    PriceMatch::new(
        value,
        currency,
        walk.text.clone(),
        SPLIT_CONFIDENCE,
        MatchSource::DomStructure,
    )
}

/// Three adjacent children reading currency, integer, cents (or integer,
/// cents, currency) with no class names to go by.
fn split_by_position(
    root: ElementRef<'_>,
    walk: &BoundedWalk<'_>,
    format: &NumberFormat,
) -> Option<PriceMatch> {
    let parts: Vec<String> = root
        .children()
        .filter_map(ElementRef::wrap)
        .map(|child| collapse_whitespace(&child.text().collect::<String>()))
        .collect();

    let is_currency = |s: &str| find_currency(s) == Some(s);
    let is_integer = |s: &str| {
        s.chars().next().is_some_and(|c| c.is_ascii_digit())
            && s.chars().all(|c| {
                c.is_ascii_digit() || format.is_thousands(c) || format.is_decimal(c)
            })
    };
    let is_fraction =
        |s: &str| (1..=2).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit());

    parts.windows(3).find_map(|w| {
        let (a, b, c) = (w[0].as_str(), w[1].as_str(), w[2].as_str());
        let (currency, whole, fraction) = if is_currency(a) && is_integer(b) && is_fraction(c) {
            (a, b, c)
        } else if is_integer(a) && is_fraction(b) && is_currency(c) {
            (c, a, b)
        } else {
            return None;
        };
        let value = join_components(whole, Some(fraction), format)?;
        PriceMatch::new(
            value,
            currency,
            walk.text.clone(),
            SPLIT_CONFIDENCE,
            MatchSource::DomStructure,
        )
    })
}

/// Plain text patterns over the element's text, trusted a little less than
/// the same text found on its own.
fn text_content(walk: &BoundedWalk<'_>, format: &NumberFormat) -> Vec<PriceMatch> {
    extract_prices(&walk.text, format)
        .iter()
        .map(|m| m.retagged(m.confidence().min(TEXT_CONFIDENCE_CAP), m.source()))
        .collect()
}

#[cfg(test)]
#[path = "dom_test.rs"]
mod tests;
