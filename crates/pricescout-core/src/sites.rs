//! Per-storefront extraction configuration.
//!
//! Each storefront renders product listings with different (and frequently
//! changing) markup, so extraction is driven by ordered CSS-selector
//! fallback lists rather than code: the first selector that yields a
//! non-empty match wins, later candidates are never consulted. Built-in
//! defaults cover the four supported storefronts; a YAML file can replace
//! them wholesale when site markup drifts, without a rebuild.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::record::SiteId;

/// Selector configuration for one storefront's search-results page.
///
/// All selector lists are ordered fallback chains. `container_selectors`,
/// `name_selectors`, and `price_selectors` must be non-empty (name and price
/// are the mandatory record fields); `rating_selectors` and
/// `reviews_selectors` may be empty for storefronts that do not show those
/// on search pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: SiteId,
    /// Scheme + host origin, used both to build the search URL and to
    /// absolutize relative product links.
    pub base_url: String,
    /// Path of the search endpoint, e.g. `/s` or `/search`.
    pub search_path: String,
    /// Name of the query parameter carrying the search term.
    pub query_param: String,
    /// Fixed extra query parameters sent with every search.
    #[serde(default)]
    pub extra_params: Vec<(String, String)>,
    pub container_selectors: Vec<String>,
    pub name_selectors: Vec<String>,
    pub price_selectors: Vec<String>,
    #[serde(default)]
    pub rating_selectors: Vec<String>,
    #[serde(default)]
    pub reviews_selectors: Vec<String>,
    pub link_selectors: Vec<String>,
}

/// Top-level shape of a `sites.yaml` override file.
#[derive(Debug, Deserialize)]
pub struct SitesFile {
    pub sites: Vec<SiteConfig>,
}

/// Built-in selector sets for the four supported storefronts.
///
/// Selector strings are tied to each site's current markup; when a site
/// ships a redesign, override them via [`load_sites`] instead of editing
/// code. The adapter logs a dedicated warning when zero containers match
/// across all candidates, which is the usual drift symptom.
#[must_use]
pub fn default_sites() -> Vec<SiteConfig> {
    let s = |v: &[&str]| v.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>();

    vec![
        SiteConfig {
            id: SiteId::Amazon,
            base_url: "https://www.amazon.in".to_owned(),
            search_path: "/s".to_owned(),
            query_param: "k".to_owned(),
            extra_params: vec![("ref".to_owned(), "nb_sb_noss".to_owned())],
            container_selectors: s(&[
                r#"div[data-component-type="s-search-result"]"#,
                ".s-result-item",
                ".s-main-slot .s-result-item",
            ]),
            name_selectors: s(&["h2 a span", ".a-text-normal"]),
            price_selectors: s(&[".a-price-whole"]),
            rating_selectors: s(&[".a-icon-alt"]),
            reviews_selectors: s(&[".a-size-base.s-underline-text"]),
            link_selectors: s(&["h2 a"]),
        },
        SiteConfig {
            id: SiteId::Flipkart,
            base_url: "https://www.flipkart.com".to_owned(),
            search_path: "/search".to_owned(),
            query_param: "q".to_owned(),
            extra_params: vec![],
            container_selectors: s(&["div[data-id]"]),
            name_selectors: s(&["a[title]", "._4rR01T", ".s1Q9rs"]),
            price_selectors: s(&["._30jeq3", "._1_WHN1"]),
            rating_selectors: s(&["._3LWZlK", ".fa-star-o"]),
            reviews_selectors: s(&["._2_R_DZ", "span._2_R_DZ"]),
            link_selectors: s(&["a._1fQZEK", "a.s1Q9rs", r#"a[href*="/p/"]"#]),
        },
        SiteConfig {
            id: SiteId::Chroma,
            base_url: "https://www.chromastore.com".to_owned(),
            search_path: "/search".to_owned(),
            query_param: "q".to_owned(),
            extra_params: vec![("type".to_owned(), "product".to_owned())],
            container_selectors: s(&[".product-item", ".grid__item"]),
            name_selectors: s(&[".product-item__title", ".card__heading"]),
            price_selectors: s(&[".money", ".price-item"]),
            // Chroma does not show ratings or review counts on search pages.
            rating_selectors: vec![],
            reviews_selectors: vec![],
            link_selectors: s(&["a", ".full-unstyled-link"]),
        },
        SiteConfig {
            id: SiteId::Reliance,
            base_url: "https://www.reliancedigital.in".to_owned(),
            search_path: "/search".to_owned(),
            query_param: "q".to_owned(),
            extra_params: vec![],
            container_selectors: s(&[".sp.grid", ".product__list--item"]),
            name_selectors: s(&[".sp__name", ".plp-prod-title"]),
            price_selectors: s(&[".TextWeb__Text-sc-1cyx778-0", ".plp-price-details"]),
            rating_selectors: s(&[".starbg", ".plp-ratings-reviews"]),
            reviews_selectors: vec![],
            link_selectors: s(&["a", ".sp__productLink"]),
        },
    ]
}

/// Load and validate site selector configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sites_file: SitesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::SitesFileParse)?;

    validate_sites(&sites_file.sites)?;

    Ok(sites_file)
}

/// Validate a set of site configurations.
///
/// # Errors
///
/// Returns `ConfigError::Validation` on duplicate ids, a base URL without an
/// http(s) scheme, an empty query parameter name, or an empty mandatory
/// selector list (containers, name, price, link).
pub fn validate_sites(sites: &[SiteConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for site in sites {
        if !seen.insert(site.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate site id: '{}'",
                site.id
            )));
        }

        if !site.base_url.starts_with("https://") && !site.base_url.starts_with("http://") {
            return Err(ConfigError::Validation(format!(
                "site '{}' base_url must start with http:// or https://, got '{}'",
                site.id, site.base_url
            )));
        }

        if site.query_param.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "site '{}' query_param must be non-empty",
                site.id
            )));
        }

        for (field, selectors) in [
            ("container_selectors", &site.container_selectors),
            ("name_selectors", &site.name_selectors),
            ("price_selectors", &site.price_selectors),
            ("link_selectors", &site.link_selectors),
        ] {
            if selectors.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site '{}' {field} must list at least one selector",
                    site.id
                )));
            }
            if selectors.iter().any(|s| s.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "site '{}' {field} contains an empty selector string",
                    site.id
                )));
            }
        }
    }

    Ok(())
}
