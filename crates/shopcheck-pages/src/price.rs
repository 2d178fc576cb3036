//! Price text as the storefront renders it.
//!
//! Home cards show `$360`, the details page `$360 *includes tax`, and cart
//! rows a bare `360`. Comparisons go through [`parse_price`] so all three
//! agree.

pub const CURRENCY_MARKER: char = '$';

pub fn has_currency_marker(text: &str) -> bool {
    text.contains(CURRENCY_MARKER)
}

/// The first whitespace-separated token, or `""` for blank text.
pub fn normalize_price(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Numeric value of a rendered price: the first token with `$` and `,` removed.
pub fn parse_price(text: &str) -> Option<f64> {
    let digits: String = normalize_price(text)
        .chars()
        .filter(|c| *c != CURRENCY_MARKER && *c != ',')
        .collect();

    digits.parse::<f64>().ok().filter(|value| value.is_finite())
}
