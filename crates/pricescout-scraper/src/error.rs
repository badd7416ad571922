use pricescout_core::SiteId;
use thiserror::Error;

/// Errors raised while fetching or extracting a storefront search page.
///
/// Per-field extraction absence is not an error — missing fields are
/// modelled as `Option` and degrade to sentinels in the record. Everything
/// below is contained at the adapter boundary (logged, empty contribution);
/// nothing escapes `search_all` under normal operation.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network-level failure reaching the storefront (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// No container selector candidate matched anything in the document.
    ///
    /// Distinct from a genuine empty result (containers matched but no
    /// element passed validation): this is the usual symptom of site markup
    /// drift and is logged accordingly.
    #[error("no container selector matched for site {site}")]
    NoContainersMatched { site: SiteId },

    /// A configured selector string does not parse as a CSS selector.
    #[error("invalid CSS selector for site {site}: {selector:?}")]
    InvalidSelector { site: SiteId, selector: String },
}
