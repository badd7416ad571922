//! Application configuration, loaded from environment variables.
//!
//! The parsing logic is decoupled from the process environment via a lookup
//! closure so tests can drive it with a plain `HashMap` — no
//! `set_var`/`remove_var` needed.

use std::path::PathBuf;

use thiserror::Error;

/// Default user agent, matching a common desktop browser profile. Several
/// storefronts serve a stripped page (or a bot challenge) to obvious
/// non-browser agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Runtime configuration for the scraper and its callers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Total per-request timeout, seconds.
    pub request_timeout_secs: u64,
    /// User-Agent header sent with every storefront request.
    pub user_agent: String,
    /// Lower bound of the randomized inter-request delay, milliseconds.
    pub delay_min_ms: u64,
    /// Upper bound of the randomized inter-request delay, milliseconds.
    pub delay_max_ms: u64,
    /// Per-site wall-clock bound for one `search` invocation, seconds. An
    /// unresponsive storefront contributes nothing instead of stalling the
    /// whole query.
    pub site_timeout_secs: u64,
    /// Optional path to a `sites.yaml` selector override file.
    pub sites_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sites file {path}: {source}")]
    SitesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sites file: {0}")]
    SitesFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid. All variables
/// have defaults, so absence alone never fails.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let request_timeout_secs = parse_u64("PRICESCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PRICESCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let delay_min_ms = parse_u64("PRICESCOUT_DELAY_MIN_MS", "1000")?;
    let delay_max_ms = parse_u64("PRICESCOUT_DELAY_MAX_MS", "3000")?;
    let site_timeout_secs = parse_u64("PRICESCOUT_SITE_TIMEOUT_SECS", "45")?;
    let sites_path = lookup("PRICESCOUT_SITES_PATH").ok().map(PathBuf::from);

    if delay_min_ms > delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "PRICESCOUT_DELAY_MIN_MS ({delay_min_ms}) must not exceed \
             PRICESCOUT_DELAY_MAX_MS ({delay_max_ms})"
        )));
    }

    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "PRICESCOUT_USER_AGENT must be non-empty".to_string(),
        ));
    }

    Ok(AppConfig {
        request_timeout_secs,
        user_agent,
        delay_min_ms,
        delay_max_ms,
        site_timeout_secs,
        sites_path,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let map = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.delay_min_ms, 1000);
        assert_eq!(cfg.delay_max_ms, 3000);
        assert_eq!(cfg.site_timeout_secs, 45);
        assert!(cfg.user_agent.starts_with("Mozilla/5.0"));
        assert!(cfg.sites_path.is_none());
    }

    #[test]
    fn overrides_are_honored() {
        let mut map = HashMap::new();
        map.insert("PRICESCOUT_REQUEST_TIMEOUT_SECS", "10");
        map.insert("PRICESCOUT_DELAY_MIN_MS", "0");
        map.insert("PRICESCOUT_DELAY_MAX_MS", "0");
        map.insert("PRICESCOUT_SITE_TIMEOUT_SECS", "5");
        map.insert("PRICESCOUT_SITES_PATH", "./config/sites.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.delay_min_ms, 0);
        assert_eq!(cfg.delay_max_ms, 0);
        assert_eq!(cfg.site_timeout_secs, 5);
        assert_eq!(
            cfg.sites_path.as_deref(),
            Some(std::path::Path::new("./config/sites.yaml"))
        );
    }

    #[test]
    fn invalid_number_is_rejected_with_var_name() {
        let mut map = HashMap::new();
        map.insert("PRICESCOUT_DELAY_MIN_MS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICESCOUT_DELAY_MIN_MS"),
            "expected InvalidEnvVar(PRICESCOUT_DELAY_MIN_MS), got: {result:?}"
        );
    }

    #[test]
    fn inverted_delay_range_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PRICESCOUT_DELAY_MIN_MS", "5000");
        map.insert("PRICESCOUT_DELAY_MAX_MS", "1000");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn blank_user_agent_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PRICESCOUT_USER_AGENT", "   ");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
