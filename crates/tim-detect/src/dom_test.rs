use std::str::FromStr;

use rust_decimal::Decimal;
use scraper::{Html, Selector};

use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Parses `html` and runs `f` on the first element matching `selector`.
fn with_element<T>(html: &str, selector: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
    let doc = Html::parse_fragment(html);
    let sel = Selector::parse(selector).expect("valid selector");
    let el = doc.select(&sel).next().expect("element present");
    f(el)
}

// -----------------------------------------------------------------------
// Structured attributes
// -----------------------------------------------------------------------

#[test]
fn data_price_with_data_currency() {
    let found = with_element(
        r#"<span id="p" data-price="1299.5" data-currency="EUR">1.299,50 €</span>"#,
        "#p",
        |el| analyze_element(el, &NumberFormat::european()),
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value(), dec("1299.50"));
    assert_eq!(found[0].currency(), "EUR");
    assert_eq!(found[0].source(), MatchSource::DomAttribute);
    assert!((found[0].confidence() - 0.95).abs() < f64::EPSILON);
    assert_eq!(found[0].original_text(), "1.299,50 €");
}

#[test]
fn microdata_price_and_currency() {
    let found = with_element(
        r#"<div id="p"><meta itemprop="priceCurrency" content="GBP"><meta itemprop="price" content="24.00"><span>See options</span></div>"#,
        "#p",
        |el| analyze_element(el, &NumberFormat::us()),
    );
    assert_eq!(found[0].value(), dec("24.00"));
    assert_eq!(found[0].currency(), "GBP");
}

#[test]
fn currency_inherited_from_ancestor() {
    let found = with_element(
        r#"<section data-currency="CAD"><div><span id="p" data-price="15">15</span></div></section>"#,
        "#p",
        |el| Strategy::StructuredAttributes.apply(el, &NumberFormat::us()),
    );
    assert_eq!(found[0].currency(), "CAD");
}

#[test]
fn currency_falls_back_to_text_symbol() {
    let found = with_element(
        r#"<span id="p" data-price="9.99">$9.99</span>"#,
        "#p",
        |el| Strategy::StructuredAttributes.apply(el, &NumberFormat::us()),
    );
    assert_eq!(found[0].currency(), "$");
}

#[test]
fn data_price_without_any_currency_is_skipped() {
    let found = with_element(
        r#"<span id="p" data-price="9.99">nine ninety nine</span>"#,
        "#p",
        |el| Strategy::StructuredAttributes.apply(el, &NumberFormat::us()),
    );
    assert!(found.is_empty());
}

#[test]
fn unparseable_data_price_falls_through_to_text() {
    let found = with_element(
        r#"<span id="p" data-price="call us" data-currency="USD">$45.00</span>"#,
        "#p",
        |el| analyze_element(el, &NumberFormat::us()),
    );
    assert_eq!(found[0].value(), dec("45.00"));
    assert_eq!(found[0].source(), MatchSource::TextPattern);
}

// -----------------------------------------------------------------------
// Label attributes
// -----------------------------------------------------------------------

#[test]
fn aria_label_price() {
    let found = with_element(
        r#"<button id="b" aria-label="Add to cart, $34.99"><svg></svg></button>"#,
        "#b",
        |el| analyze_element(el, &NumberFormat::us()),
    );
    assert_eq!(found[0].value(), dec("34.99"));
    assert_eq!(found[0].source(), MatchSource::DomAttribute);
    assert!((found[0].confidence() - 0.9).abs() < f64::EPSILON);
}

#[test]
fn label_without_price_is_ignored() {
    let found = with_element(
        r#"<button id="b" title="Add to cart">Buy</button>"#,
        "#b",
        |el| Strategy::LabelAttributes.apply(el, &NumberFormat::us()),
    );
    assert!(found.is_empty());
}

// -----------------------------------------------------------------------
// Split components
// -----------------------------------------------------------------------

#[test]
fn amazon_style_split_price() {
    let html = r#"<span id="p" class="a-price"><span class="a-price-symbol">$</span><span class="a-price-whole">1,299<span class="a-price-decimal">.</span></span><span class="a-price-fraction">99</span></span>"#;
    let found = with_element(html, "#p", |el| {
        Strategy::SplitComponents.apply(el, &NumberFormat::us())
    });
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value(), dec("1299.99"));
    assert_eq!(found[0].currency(), "$");
    assert_eq!(found[0].source(), MatchSource::DomStructure);
    assert_eq!(found[0].original_text(), "$1,299.99");
}

#[test]
fn positional_split_price_without_classes() {
    let html = r#"<div id="p"><sup>€</sup><span>49</span><sup>95</sup></div>"#;
    let found = with_element(html, "#p", |el| {
        Strategy::SplitComponents.apply(el, &NumberFormat::european())
    });
    assert_eq!(found[0].value(), dec("49.95"));
    assert_eq!(found[0].currency(), "€");
}

#[test]
fn positional_split_price_with_trailing_currency() {
    let html = r#"<div id="p"><span>12</span><sup>50</sup><span>kr</span></div>"#;
    let found = with_element(html, "#p", |el| {
        Strategy::SplitComponents.apply(el, &NumberFormat::european())
    });
    assert_eq!(found[0].value(), dec("12.50"));
    assert_eq!(found[0].currency(), "kr");
}

#[test]
fn split_analysis_runs_before_text_fallback() {
    // Text content reads "$1999", which the plain pattern would take as 1999.
    let html = r#"<div id="p"><span>$</span><span>19</span><span>99</span></div>"#;
    let found = with_element(html, "#p", |el| analyze_element(el, &NumberFormat::us()));
    assert_eq!(found[0].value(), dec("19.99"));
    assert_eq!(found[0].source(), MatchSource::DomStructure);
}

// -----------------------------------------------------------------------
// Text content fallback
// -----------------------------------------------------------------------

#[test]
fn text_fallback_caps_confidence() {
    let found = with_element(
        r#"<p id="p">Now only <b>$12.00</b> while stocks last</p>"#,
        "#p",
        |el| analyze_element(el, &NumberFormat::us()),
    );
    assert!(!found.is_empty());
    assert!(found.iter().all(|m| m.confidence() <= 0.8));
    assert!(found
        .iter()
        .any(|m| m.source() == MatchSource::TextPattern && m.value() == dec("12.00")));
    assert!(found
        .iter()
        .any(|m| m.source() == MatchSource::Contextual && (m.confidence() - 0.7).abs() < 1e-9));
}

#[test]
fn nothing_recognizable_returns_empty() {
    let found = with_element(r#"<p id="p">Free shipping on all orders</p>"#, "#p", |el| {
        analyze_element(el, &NumberFormat::us())
    });
    assert!(found.is_empty());
}

// -----------------------------------------------------------------------
// Traversal bounds
// -----------------------------------------------------------------------

#[test]
fn text_below_depth_limit_is_not_read() {
    let depth = MAX_WALK_DEPTH + 2;
    let html = format!(
        r#"<div id="root">{}$5.00{}</div>"#,
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let found = with_element(&html, "#root", |el| analyze_element(el, &NumberFormat::us()));
    assert!(found.is_empty());
}

#[test]
fn text_within_depth_limit_is_read() {
    let depth = MAX_WALK_DEPTH - 1;
    let html = format!(
        r#"<div id="root">{}$5.00{}</div>"#,
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let found = with_element(&html, "#root", |el| analyze_element(el, &NumberFormat::us()));
    assert_eq!(found[0].value(), dec("5.00"));
}

#[test]
fn node_limit_stops_wide_walks() {
    let html = format!(
        r#"<ul id="root">{}<li>$7.00</li></ul>"#,
        "<li>x</li>".repeat(MAX_WALK_NODES)
    );
    let text = with_element(&html, "#root", collapsed_text);
    assert!(!text.contains('$'));
}

// -----------------------------------------------------------------------
// Annotation marker
// -----------------------------------------------------------------------

#[test]
fn price_attribute_detection() {
    let html = r#"<span id="a" data-price="5"></span><i id="b" aria-label="Only €4"></i><i id="c" title="Close"></i>"#;
    assert!(with_element(html, "#a", has_price_attributes));
    assert!(with_element(html, "#b", has_price_attributes));
    assert!(!with_element(html, "#c", has_price_attributes));
}

#[test]
fn annotated_marker_on_self_or_ancestor() {
    let html = r#"<div class="tim-annotated"><span id="inner">$5</span></div><span id="plain">$6</span>"#;
    assert!(with_element(html, "#inner", is_annotated));
    assert!(!with_element(html, "#plain", is_annotated));
}

#[test]
fn annotated_marker_is_found_beyond_ancestor_depth() {
    let depth = MAX_ANCESTOR_DEPTH + 5;
    let html = format!(
        r#"<div class="tim-annotated">{}<span id="deep">$5</span>{}</div>"#,
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    assert!(with_element(&html, "#deep", is_annotated));
}
