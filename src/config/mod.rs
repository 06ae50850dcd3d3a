//! Environment-driven service configuration.

use std::env;

/// Current deployment environment (`APP_ENV`), defaulting to sandbox.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Runtime configuration for the analysis service.
///
/// Everything is sourced from the environment so the same binary runs in
/// sandbox and production unchanged.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port.
    pub port: u16,
    /// Base URL of the chart quote API.
    pub quote_base_url: String,
    /// Per-request timeout for quote fetches, in seconds.
    pub fetch_timeout_secs: u64,
    /// How long a fetched series stays fresh in the cache, in seconds.
    pub cache_ttl_secs: u64,
    /// Maximum number of (symbol, period, interval) entries kept in the cache.
    pub cache_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_env("PORT", 8080),
            quote_base_url: env::var("QUOTE_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 10),
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", 300),
            cache_capacity: parse_env("CACHE_CAPACITY", 64),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            quote_base_url: "https://query1.finance.yahoo.com".to_string(),
            fetch_timeout_secs: 10,
            cache_ttl_secs: 300,
            cache_capacity: 64,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
