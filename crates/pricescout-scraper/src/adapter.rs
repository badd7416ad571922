//! Generic storefront search adapter.
//!
//! One extraction engine parametrized by [`SiteConfig`] replaces a per-site
//! implementation: all four storefronts differ only in their search URL
//! shape and selector fallback chains. Failure is contained here — a fetch
//! or parse problem is logged and yields an empty list, never an error the
//! orchestration layer has to unwind.

use pricescout_core::{ProductRecord, SiteConfig, SiteId, UNAVAILABLE};
use scraper::{ElementRef, Html, Selector};

use crate::client::FetchClient;
use crate::error::ScrapeError;
use crate::extract::{first_match_attr, first_match_text, resolve_containers};
use crate::normalize::{normalize_price, normalize_rating};

/// Searches one storefront and extracts normalized product records.
pub struct SiteAdapter {
    config: SiteConfig,
    client: FetchClient,
}

impl SiteAdapter {
    #[must_use]
    pub fn new(config: SiteConfig, client: FetchClient) -> Self {
        Self { config, client }
    }

    #[must_use]
    pub fn id(&self) -> SiteId {
        self.config.id
    }

    /// Checks every configured selector parses as CSS.
    ///
    /// Called once at manager construction so a broken override file fails
    /// fast instead of silently extracting nothing at query time.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidSelector`] naming the first selector
    /// string that does not parse.
    pub(crate) fn validate_selectors(&self) -> Result<(), ScrapeError> {
        let chains = [
            &self.config.container_selectors,
            &self.config.name_selectors,
            &self.config.price_selectors,
            &self.config.rating_selectors,
            &self.config.reviews_selectors,
            &self.config.link_selectors,
        ];
        for raw in chains.into_iter().flatten() {
            if Selector::parse(raw).is_err() {
                return Err(ScrapeError::InvalidSelector {
                    site: self.config.id,
                    selector: raw.clone(),
                });
            }
        }
        Ok(())
    }

    /// Searches the storefront for `query` and returns up to `max_results`
    /// validated records, in document order.
    ///
    /// Never fails: fetch and parse problems are logged and produce an empty
    /// list. On success the client's randomized rate-limit delay is applied
    /// exactly once, after all elements are processed.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<ProductRecord> {
        match self.try_search(query, max_results).await {
            Ok(records) => {
                self.client.apply_delay().await;
                records
            }
            Err(ScrapeError::NoContainersMatched { site }) => {
                // Drift signal: the page was fetched and parsed, but zero
                // containers matched across all candidates. Different from a
                // genuine empty result set.
                tracing::warn!(
                    site = %site,
                    query,
                    "zero containers matched across all candidate selectors — site markup may have drifted"
                );
                Vec::new()
            }
            Err(err) => {
                tracing::error!(site = %self.config.id, query, error = %err, "search failed");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ProductRecord>, ScrapeError> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.search_path
        );
        let mut params: Vec<(&str, &str)> = vec![(self.config.query_param.as_str(), query)];
        params.extend(
            self.config
                .extra_params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let body = self.client.fetch(&url, &params).await?;
        let document = Html::parse_document(&body);

        let Some((winner, containers)) =
            resolve_containers(&document, &self.config.container_selectors)
        else {
            return Err(ScrapeError::NoContainersMatched {
                site: self.config.id,
            });
        };
        tracing::debug!(
            site = %self.config.id,
            selector = winner,
            matched = containers.len(),
            "resolved product containers"
        );

        let mut records = Vec::new();
        for element in containers.into_iter().take(max_results) {
            if let Some(record) = self.extract_record(element, query) {
                records.push(record);
            }
        }

        tracing::info!(
            site = %self.config.id,
            query,
            count = records.len(),
            "extracted product records"
        );
        Ok(records)
    }

    /// Extracts one record from a candidate container element.
    ///
    /// Each field is attempted independently through its fallback chain; a
    /// missing field degrades to `None`/[`UNAVAILABLE`]. The element is
    /// emitted only when both name and price resolve — otherwise it is
    /// skipped with a debug log, never aborting the batch.
    fn extract_record(&self, element: ElementRef<'_>, query: &str) -> Option<ProductRecord> {
        let name = first_match_text(element, &self.config.name_selectors)
            // Some storefronts carry the display name only in an anchor's
            // `title` attribute (e.g. Flipkart's `a[title]` cards).
            .or_else(|| first_match_attr(element, &self.config.name_selectors, "title"));

        let price = first_match_text(element, &self.config.price_selectors)
            .as_deref()
            .and_then(normalize_price)
            .filter(|p| *p > 0.0);

        let (Some(name), Some(price)) = (name, price) else {
            tracing::debug!(site = %self.config.id, "skipping element without valid name and price");
            return None;
        };

        let rating = first_match_text(element, &self.config.rating_selectors)
            .as_deref()
            .and_then(normalize_rating);

        let reviews = first_match_text(element, &self.config.reviews_selectors)
            .unwrap_or_else(|| UNAVAILABLE.to_owned());

        let url = first_match_attr(element, &self.config.link_selectors, "href")
            .map_or_else(|| UNAVAILABLE.to_owned(), |href| self.absolutize(&href));

        Some(ProductRecord {
            website: self.config.id,
            name,
            price,
            rating,
            reviews,
            url,
            search_query: query.to_owned(),
        })
    }

    /// Prefixes relative hrefs with the site's base origin.
    fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_owned();
        }
        let base = self.config.base_url.trim_end_matches('/');
        if href.starts_with('/') {
            format!("{base}{href}")
        } else {
            format!("{base}/{href}")
        }
    }
}
