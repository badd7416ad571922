pub mod adapter;
pub mod client;
pub mod error;
pub mod extract;
pub mod manager;
pub mod normalize;

pub use adapter::SiteAdapter;
pub use client::FetchClient;
pub use error::ScrapeError;
pub use manager::SearchManager;
pub use normalize::{normalize_price, normalize_rating};
