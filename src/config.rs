//! Configuration management for the task console.
//!
//! Configuration can be set via environment variables:
//! - `TASK_CONSOLE_API_URL` - Optional. Base URL of the scoring service. Defaults to `http://127.0.0.1:8000`.
//! - `TASK_CONSOLE_TIMEOUT_SECS` - Optional. Per-request timeout in seconds. Defaults to `30`.
//! - `TASK_CONSOLE_STRATEGY` - Optional. Strategy used when none is given. Defaults to `smart_balance`.
//! - `TASK_CONSOLE_DEDUP` - Optional. Bulk-import dedup policy: `title`, `id` or `keep_all`. Defaults to `title`.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::task::{DedupPolicy, Strategy};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring service base URL
    pub api_url: Url,

    /// Upper bound on a single analyze/suggest request
    pub request_timeout: Duration,

    /// Strategy used by `analyze` without an argument
    pub default_strategy: Strategy,

    /// How bulk imports are filtered against the store
    pub dedup_policy: DedupPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unparseable URL, a zero or
    /// non-numeric timeout, an unknown strategy or an unknown dedup policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("TASK_CONSOLE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidValue("TASK_CONSOLE_API_URL".to_string(), format!("{}", e))
        })?;

        let timeout_secs: u64 = lookup("TASK_CONSOLE_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("TASK_CONSOLE_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "TASK_CONSOLE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let default_strategy = match lookup("TASK_CONSOLE_STRATEGY") {
            Some(raw) => raw.parse().map_err(|e| {
                ConfigError::InvalidValue("TASK_CONSOLE_STRATEGY".to_string(), format!("{}", e))
            })?,
            None => Strategy::default(),
        };

        let dedup_policy = match lookup("TASK_CONSOLE_DEDUP") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidValue("TASK_CONSOLE_DEDUP".to_string(), e))?,
            None => DedupPolicy::default(),
        };

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            default_strategy,
            dedup_policy,
        })
    }

    /// Create a config with defaults for everything but the URL (useful for testing).
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_strategy: Strategy::default(),
            dedup_policy: DedupPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.default_strategy, Strategy::SmartBalance);
        assert_eq!(config.dedup_policy, DedupPolicy::Title);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TASK_CONSOLE_API_URL", "https://scoring.internal:9000"),
            ("TASK_CONSOLE_TIMEOUT_SECS", "5"),
            ("TASK_CONSOLE_STRATEGY", "deadline_driven"),
            ("TASK_CONSOLE_DEDUP", "id"),
        ])
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("scoring.internal"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.default_strategy, Strategy::DeadlineDriven);
        assert_eq!(config.dedup_policy, DedupPolicy::Id);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(load(&[("TASK_CONSOLE_API_URL", "not a url")]).is_err());
        assert!(load(&[("TASK_CONSOLE_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("TASK_CONSOLE_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("TASK_CONSOLE_STRATEGY", "random")]).is_err());
        assert!(load(&[("TASK_CONSOLE_DEDUP", "fuzzy")]).is_err());
    }
}
