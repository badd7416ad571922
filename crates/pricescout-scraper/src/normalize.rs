//! Normalization of free-form storefront text into numeric values.
//!
//! Both functions are pure and total: absence of a numeric token is a valid,
//! non-exceptional outcome, never an error. Validation of what absence means
//! (skip the element, leave the field empty) belongs to the adapter.

use std::sync::OnceLock;

use regex::Regex;

/// First contiguous integer-or-decimal token, e.g. `49999.00` or `4`.
fn numeric_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid regex"))
}

/// Extracts a numeric price from display text.
///
/// Strips digit-grouping commas first, so `"₹49,999.00"` parses as
/// `49999.0` and `"1,234"` as `1234.0`. Returns `None` when the text holds
/// no numeric token at all.
#[must_use]
pub fn normalize_price(text: &str) -> Option<f64> {
    let stripped = text.replace(',', "");
    let token = numeric_token().find(&stripped)?;
    token.as_str().parse::<f64>().ok()
}

/// Extracts a star rating from display text such as `"4.3 out of 5 stars"`.
///
/// Returns the first numeric token as the rating. Tokens outside the 0–5
/// scale are treated as extraction noise (a review count or price landed in
/// the rating node) and yield `None` rather than a nonsense rating.
#[must_use]
pub fn normalize_rating(text: &str) -> Option<f64> {
    let token = numeric_token().find(text)?;
    let value = token.as_str().parse::<f64>().ok()?;
    if (0.0..=5.0).contains(&value) {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // normalize_price
    // -----------------------------------------------------------------------

    #[test]
    fn price_strips_currency_and_grouping() {
        assert_eq!(normalize_price("₹49,999.00"), Some(49999.0));
    }

    #[test]
    fn price_grouped_integer() {
        assert_eq!(normalize_price("1,234"), Some(1234.0));
    }

    #[test]
    fn price_plain_integer() {
        assert_eq!(normalize_price("599"), Some(599.0));
    }

    #[test]
    fn price_decimal_without_grouping() {
        assert_eq!(normalize_price("Rs. 79.50 (incl. taxes)"), Some(79.5));
    }

    #[test]
    fn price_empty_returns_none() {
        assert_eq!(normalize_price(""), None);
    }

    #[test]
    fn price_non_numeric_returns_none() {
        assert_eq!(normalize_price("Currently unavailable"), None);
    }

    #[test]
    fn price_takes_first_token_of_a_range() {
        assert_eq!(normalize_price("₹1,299 - ₹1,599"), Some(1299.0));
    }

    #[test]
    fn price_whitespace_only_returns_none() {
        assert_eq!(normalize_price("   "), None);
    }

    // -----------------------------------------------------------------------
    // normalize_rating
    // -----------------------------------------------------------------------

    #[test]
    fn rating_leading_token() {
        assert_eq!(normalize_rating("4.3 out of 5 stars"), Some(4.3));
    }

    #[test]
    fn rating_bare_value() {
        assert_eq!(normalize_rating("4"), Some(4.0));
    }

    #[test]
    fn rating_non_numeric_returns_none() {
        assert_eq!(normalize_rating("New"), None);
    }

    #[test]
    fn rating_empty_returns_none() {
        assert_eq!(normalize_rating(""), None);
    }

    #[test]
    fn rating_out_of_scale_is_rejected() {
        // A review count that leaked into the rating node must not become
        // a rating of 12.
        assert_eq!(normalize_rating("12,453 ratings"), None);
    }

    #[test]
    fn rating_boundary_values_accepted() {
        assert_eq!(normalize_rating("0 stars"), Some(0.0));
        assert_eq!(normalize_rating("5.0 out of 5"), Some(5.0));
    }
}
