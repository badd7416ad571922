//! Ordered selector-fallback helpers over parsed HTML.
//!
//! Storefront markup drifts; every extraction point therefore takes an
//! ordered list of candidate CSS selectors and uses the first one that
//! yields a non-empty result. Later candidates are never consulted once one
//! succeeds. A selector string that fails to parse is skipped (with a debug
//! log) instead of failing the element — a stale override file must degrade,
//! not abort.

use scraper::{ElementRef, Html, Selector};

/// Returns the trimmed text of the first descendant matching any selector
/// in `selectors`, tried in order. Empty text does not count as a match;
/// the next candidate (or the next match of the same selector) is consulted.
#[must_use]
pub fn first_match_text(element: ElementRef<'_>, selectors: &[String]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            tracing::debug!(selector = %raw, "skipping unparseable selector");
            continue;
        };
        for matched in element.select(&selector) {
            let text = matched.text().collect::<String>().trim().to_owned();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Returns the value of `attr` on the first descendant matching any selector
/// in `selectors`, tried in order. Empty attribute values do not count.
#[must_use]
pub fn first_match_attr(
    element: ElementRef<'_>,
    selectors: &[String],
    attr: &str,
) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            tracing::debug!(selector = %raw, "skipping unparseable selector");
            continue;
        };
        for matched in element.select(&selector) {
            if let Some(value) = matched.value().attr(attr) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_owned());
                }
            }
        }
    }
    None
}

/// Resolves the product container elements of a search page.
///
/// Iterates the ordered container-selector list and returns the match set of
/// the first selector that matches anything, together with the winning
/// selector string (for drift logging). Returns `None` when no candidate
/// matches at all — callers treat that as a site-structure drift signal,
/// distinct from "containers matched but no product passed validation".
#[must_use]
pub fn resolve_containers<'a>(
    document: &'a Html,
    selectors: &'a [String],
) -> Option<(&'a str, Vec<ElementRef<'a>>)> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            tracing::debug!(selector = %raw, "skipping unparseable container selector");
            continue;
        };
        let matches: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !matches.is_empty() {
            return Some((raw.as_str(), matches));
        }
    }
    None
}
