//! Domain types shared across the scraper and its consumers.

use serde::{Deserialize, Serialize};

/// Sentinel value for text fields that could not be extracted.
///
/// Records degrade field-by-field: a missing review count or link never
/// rejects a record, it just carries this placeholder.
pub const UNAVAILABLE: &str = "N/A";

/// Identifier of a supported storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteId {
    Amazon,
    Flipkart,
    Chroma,
    Reliance,
}

impl SiteId {
    /// All supported storefronts, in default search order.
    pub const ALL: [SiteId; 4] = [
        SiteId::Amazon,
        SiteId::Flipkart,
        SiteId::Chroma,
        SiteId::Reliance,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SiteId::Amazon => "amazon",
            SiteId::Flipkart => "flipkart",
            SiteId::Chroma => "chroma",
            SiteId::Reliance => "reliance",
        }
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SiteId {
    type Err = UnknownSiteId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amazon" => Ok(SiteId::Amazon),
            "flipkart" => Ok(SiteId::Flipkart),
            "chroma" => Ok(SiteId::Chroma),
            "reliance" => Ok(SiteId::Reliance),
            other => Err(UnknownSiteId(other.to_owned())),
        }
    }
}

/// Error returned when a site identifier string has no known storefront.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown site identifier: {0}")]
pub struct UnknownSiteId(pub String);

/// One normalized product listing extracted from a storefront search page.
///
/// A record is only ever constructed with a non-empty `name` and a positive
/// `price`; every other field degrades gracefully ([`UNAVAILABLE`] for text,
/// `None` for the rating) instead of rejecting the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Storefront this record was extracted from.
    pub website: SiteId,
    /// Product display name.
    pub name: String,
    /// Price in the storefront's currency, grouping separators stripped.
    pub price: f64,
    /// Star rating on a 0–5 scale, when the search page shows one.
    pub rating: Option<f64>,
    /// Review count as displayed (free text), or [`UNAVAILABLE`].
    pub reviews: String,
    /// Absolute product URL, or [`UNAVAILABLE`] when no link node exists.
    pub url: String,
    /// The query that produced this record, kept for provenance when
    /// results from multiple runs are merged downstream.
    pub search_query: String,
}
