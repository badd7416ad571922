pub mod config;
pub mod record;
pub mod sites;

pub use config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError};
pub use record::{ProductRecord, SiteId, UnknownSiteId, UNAVAILABLE};
pub use sites::{default_sites, load_sites, SiteConfig, SitesFile};
