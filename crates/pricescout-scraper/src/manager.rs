//! Query fan-out across storefront adapters.

use std::sync::Arc;
use std::time::Duration;

use pricescout_core::{AppConfig, ProductRecord, SiteConfig, SiteId};

use crate::adapter::SiteAdapter;
use crate::client::FetchClient;
use crate::error::ScrapeError;

/// Fans one query out to the requested site adapters and merges their
/// results.
///
/// Sites are independent: each adapter owns its own [`FetchClient`] (header
/// and delay state is never shared), runs in its own task, and is bounded by
/// a per-site timeout so one unresponsive storefront cannot stall the whole
/// query. A failed, timed-out, or unknown site contributes nothing; the
/// aggregate simply omits it.
pub struct SearchManager {
    adapters: Vec<Arc<SiteAdapter>>,
    site_timeout: Duration,
}

impl SearchManager {
    /// Builds one adapter per site configuration, each with its own client.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if a `reqwest` client cannot be built,
    /// or [`ScrapeError::InvalidSelector`] if any configured selector string
    /// does not parse — a broken `sites.yaml` override fails here, at
    /// startup, instead of extracting nothing at query time.
    pub fn new(configs: Vec<SiteConfig>, app_config: &AppConfig) -> Result<Self, ScrapeError> {
        let mut adapters = Vec::with_capacity(configs.len());
        for config in configs {
            let client = FetchClient::new(
                app_config.request_timeout_secs,
                &app_config.user_agent,
                app_config.delay_min_ms,
                app_config.delay_max_ms,
            )?;
            let adapter = SiteAdapter::new(config, client);
            adapter.validate_selectors()?;
            adapters.push(Arc::new(adapter));
        }
        Ok(Self {
            adapters,
            site_timeout: Duration::from_secs(app_config.site_timeout_secs),
        })
    }

    /// Identifiers of all configured sites, in configured order.
    #[must_use]
    pub fn site_ids(&self) -> Vec<SiteId> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    /// Searches the requested sites for `query` and returns the merged
    /// record list.
    ///
    /// `sites` holds site identifier strings; `None` means every configured
    /// site. Unknown identifiers and identifiers without a configured
    /// adapter are logged as warnings and skipped. Sites run concurrently,
    /// but records stay grouped by site in request order, document order
    /// within a site.
    ///
    /// Never fails: per-site errors, timeouts, and panicking tasks are all
    /// contained here. The only caller-visible failure mode is a partial or
    /// empty aggregate, explained in the logs.
    pub async fn search_all(
        &self,
        query: &str,
        max_results_per_site: usize,
        sites: Option<&[String]>,
    ) -> Vec<ProductRecord> {
        let requested: Vec<SiteId> = match sites {
            Some(names) => names
                .iter()
                .filter_map(|name| match name.parse::<SiteId>() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        tracing::warn!(site = %name, error = %err, "skipping unknown site identifier");
                        None
                    }
                })
                .collect(),
            None => self.site_ids(),
        };

        let mut tasks = Vec::with_capacity(requested.len());
        for id in requested {
            let Some(adapter) = self.adapters.iter().find(|a| a.id() == id) else {
                tracing::warn!(site = %id, "no adapter configured for site — skipping");
                continue;
            };
            let adapter = Arc::clone(adapter);
            let query = query.to_owned();
            let timeout = self.site_timeout;

            tracing::info!(site = %id, query, "searching site");
            tasks.push((
                id,
                tokio::spawn(async move {
                    tokio::time::timeout(timeout, adapter.search(&query, max_results_per_site))
                        .await
                }),
            ));
        }

        // Join in request order so the aggregate stays grouped by site in
        // the order sites were requested.
        let (ids, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let outcomes = futures::future::join_all(handles).await;

        let mut all_records = Vec::new();
        for (id, outcome) in ids.into_iter().zip(outcomes) {
            match outcome {
                Ok(Ok(records)) => {
                    tracing::info!(site = %id, count = records.len(), "site contributed records");
                    all_records.extend(records);
                }
                Ok(Err(_elapsed)) => {
                    tracing::error!(
                        site = %id,
                        timeout_secs = self.site_timeout.as_secs(),
                        "site search timed out — contributing nothing"
                    );
                }
                Err(join_err) => {
                    tracing::error!(site = %id, error = %join_err, "site task failed — contributing nothing");
                }
            }
        }
        all_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricescout_core::default_sites;

    fn test_app_config() -> AppConfig {
        AppConfig {
            request_timeout_secs: 5,
            user_agent: "pricescout-test/0.1".to_owned(),
            delay_min_ms: 0,
            delay_max_ms: 0,
            site_timeout_secs: 5,
            sites_path: None,
        }
    }

    #[test]
    fn new_builds_adapter_per_config_in_order() {
        let manager = SearchManager::new(default_sites(), &test_app_config()).unwrap();
        assert_eq!(manager.site_ids(), SiteId::ALL.to_vec());
    }

    #[test]
    fn new_rejects_broken_selector_override() {
        let mut configs = default_sites();
        configs[0].container_selectors = vec!["div##[broken".to_owned()];
        let err = SearchManager::new(configs, &test_app_config())
            .err()
            .expect("broken selector must be rejected at construction");
        assert!(matches!(err, ScrapeError::InvalidSelector { .. }));
    }

    #[tokio::test]
    async fn unknown_identifier_is_skipped_without_error() {
        // No network is reached: the single valid-but-unreachable site is
        // filtered out below by using only an unknown identifier.
        let manager = SearchManager::new(default_sites(), &test_app_config()).unwrap();
        let records = manager
            .search_all("phone", 5, Some(&["doesnotexist".to_owned()]))
            .await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_site_is_skipped_without_error() {
        let configs: Vec<_> = default_sites()
            .into_iter()
            .filter(|s| s.id == SiteId::Amazon)
            .collect();
        let manager = SearchManager::new(configs, &test_app_config()).unwrap();
        let records = manager
            .search_all("phone", 5, Some(&["flipkart".to_owned()]))
            .await;
        assert!(records.is_empty());
    }
}
