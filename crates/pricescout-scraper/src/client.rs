//! Rate-limited HTTP client for storefront search pages.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;

use crate::error::ScrapeError;

/// HTTP client for storefront search pages.
///
/// Owns one pooled `reqwest::Client` carrying a fixed browser-like header
/// set, and an inter-request delay range. Each site adapter gets its own
/// `FetchClient` so delay state is never shared across sites.
///
/// Does not retry: a failed search page fetch is contained at the adapter
/// boundary rather than hammered again.
pub struct FetchClient {
    client: Client,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl FetchClient {
    /// Creates a `FetchClient` with configured timeout, `User-Agent`, and
    /// inter-request delay range (milliseconds, inclusive on both ends).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        delay_min_ms: u64,
        delay_max_ms: u64,
    ) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            delay_min_ms: delay_min_ms.min(delay_max_ms),
            delay_max_ms,
        })
    }

    /// Performs one GET against `url` with `query` pairs appended
    /// (URL-encoded) and returns the response body.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScrapeError::Http`] — network or TLS failure, or a body read
    ///   failure.
    pub async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ScrapeError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Draws one delay duration uniformly from the configured range.
    #[must_use]
    pub fn rate_limit_delay(&self) -> Duration {
        if self.delay_max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(self.delay_min_ms..=self.delay_max_ms);
        Duration::from_millis(ms)
    }

    /// Sleeps for one randomized rate-limit interval. Adapters call this
    /// exactly once per `search` invocation to bound the outbound request
    /// rate per site.
    pub async fn apply_delay(&self) {
        let delay = self.rate_limit_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(min_ms: u64, max_ms: u64) -> FetchClient {
        FetchClient::new(5, "pricescout-test/0.1", min_ms, max_ms)
            .expect("failed to build test FetchClient")
    }

    #[test]
    fn delay_is_drawn_from_configured_range() {
        let client = test_client(10, 20);
        for _ in 0..100 {
            let d = client.rate_limit_delay();
            assert!((10..=20).contains(&(d.as_millis() as u64)), "delay {d:?}");
        }
    }

    #[test]
    fn degenerate_range_yields_fixed_delay() {
        let client = test_client(15, 15);
        assert_eq!(client.rate_limit_delay(), Duration::from_millis(15));
    }

    #[test]
    fn zero_range_disables_delay() {
        let client = test_client(0, 0);
        assert_eq!(client.rate_limit_delay(), Duration::ZERO);
    }

    #[test]
    fn inverted_range_is_clamped_not_panicking() {
        // min > max is a config error upstream; the client still must not
        // panic if handed one directly.
        let client = test_client(30, 20);
        for _ in 0..50 {
            let d = client.rate_limit_delay();
            assert!(d.as_millis() as u64 <= 30);
        }
    }
}
