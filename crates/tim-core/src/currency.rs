//! Known currencies and the symbols pages use to write them.

/// A currency and every spelling that identifies it in page text, besides
/// its ISO code.
#[derive(Debug, Clone, Copy)]
pub struct Currency {
    pub code: &'static str,
    pub symbols: &'static [&'static str],
}

pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbols: &["$", "US$"] },
    Currency { code: "CAD", symbols: &["$", "C$", "CA$"] },
    Currency { code: "AUD", symbols: &["$", "A$", "AU$"] },
    Currency { code: "NZD", symbols: &["$", "NZ$"] },
    Currency { code: "MXN", symbols: &["$", "MX$"] },
    Currency { code: "SGD", symbols: &["$", "S$"] },
    Currency { code: "HKD", symbols: &["$", "HK$"] },
    Currency { code: "BRL", symbols: &["R$"] },
    Currency { code: "EUR", symbols: &["€"] },
    Currency { code: "GBP", symbols: &["£"] },
    Currency { code: "JPY", symbols: &["¥", "円"] },
    Currency { code: "CNY", symbols: &["¥", "元", "RMB"] },
    Currency { code: "INR", symbols: &["₹", "Rs.", "Rs"] },
    Currency { code: "KRW", symbols: &["₩"] },
    Currency { code: "RUB", symbols: &["₽"] },
    Currency { code: "TRY", symbols: &["₺"] },
    Currency { code: "ILS", symbols: &["₪"] },
    Currency { code: "THB", symbols: &["฿"] },
    Currency { code: "VND", symbols: &["₫"] },
    Currency { code: "PHP", symbols: &["₱"] },
    Currency { code: "UAH", symbols: &["₴"] },
    Currency { code: "NGN", symbols: &["₦"] },
    Currency { code: "CHF", symbols: &[] },
    Currency { code: "SEK", symbols: &["kr"] },
    Currency { code: "NOK", symbols: &["kr"] },
    Currency { code: "DKK", symbols: &["kr"] },
    Currency { code: "PLN", symbols: &["zł"] },
    Currency { code: "CZK", symbols: &["Kč"] },
    Currency { code: "HUF", symbols: &["Ft"] },
];

/// Resolves a matched symbol or code to the ISO codes it may stand for.
///
/// `"$"` is shared by several dollar and peso currencies, so it resolves to
/// all of them. Unknown tokens resolve to nothing.
#[must_use]
pub fn lookup(token: &str) -> Vec<&'static str> {
    let token = token.trim();
    let upper = token.to_ascii_uppercase();
    CURRENCIES
        .iter()
        .filter(|c| c.code == upper || c.symbols.contains(&token))
        .map(|c| c.code)
        .collect()
}

/// Returns `true` if `token` can denote the ISO currency `target`.
#[must_use]
pub fn matches_target(token: &str, target: &str) -> bool {
    let target = target.trim().to_ascii_uppercase();
    lookup(token).contains(&target.as_str())
}

/// Returns `true` if `code` is in the table.
#[must_use]
pub fn is_known_code(code: &str) -> bool {
    let upper = code.trim().to_ascii_uppercase();
    CURRENCIES.iter().any(|c| c.code == upper)
}

/// Every symbol and code, deduplicated, longest first so that `"US$"` is
/// tried before `"$"` when the list is joined into an alternation.
#[must_use]
pub fn tokens_longest_first() -> Vec<&'static str> {
    let mut tokens: Vec<&'static str> = CURRENCIES
        .iter()
        .flat_map(|c| std::iter::once(c.code).chain(c.symbols.iter().copied()))
        .collect();
    tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    tokens.dedup();
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_sign_is_ambiguous() {
        let codes = lookup("$");
        assert!(codes.contains(&"USD"));
        assert!(codes.contains(&"CAD"));
        assert!(!codes.contains(&"EUR"));
    }

    #[test]
    fn prefixed_dollar_is_specific() {
        assert_eq!(lookup("C$"), vec!["CAD"]);
    }

    #[test]
    fn codes_match_case_insensitively() {
        assert!(matches_target("usd", "USD"));
        assert!(matches_target("EUR", "eur"));
    }

    #[test]
    fn euro_sign_does_not_match_dollar_target() {
        assert!(!matches_target("€", "USD"));
        assert!(matches_target("€", "EUR"));
    }

    #[test]
    fn unknown_token_matches_nothing() {
        assert!(lookup("doubloons").is_empty());
        assert!(!is_known_code("XYZ"));
        assert!(is_known_code("chf"));
    }

    #[test]
    fn tokens_are_unique_and_longest_first() {
        let tokens = tokens_longest_first();
        let dollar = tokens.iter().position(|t| *t == "$").unwrap();
        let us_dollar = tokens.iter().position(|t| *t == "US$").unwrap();
        assert!(us_dollar < dollar);
        assert_eq!(tokens.iter().filter(|t| **t == "kr").count(), 1);
    }
}
