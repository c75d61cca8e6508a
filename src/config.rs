//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::OnFullPolicy;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sizing hint used to pre-allocate the entry map (0 = no pre-allocation)
    pub total_entries: usize,
    /// Maximum number of entries the cache can hold (0 = unbounded)
    pub max_entries: usize,
    /// Default TTL in seconds for memoized entries (0 = no time expiration)
    pub default_ttl: u64,
    /// Default hit limit for memoized entries (0 = no count expiration)
    pub default_hit_limit: u64,
    /// What to do when a new key arrives at a full cache
    pub on_full: OnFullPolicy,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TOTAL_ENTRIES` - Pre-allocation hint (default: 0)
    /// - `MAX_ENTRIES` - Maximum cache entries, 0 for unbounded (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `DEFAULT_HIT_LIMIT` - Default hit limit (default: 0)
    /// - `ON_FULL` - `reject`, `evict-oldest` or `evict-lru` (default: reject)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            total_entries: env_or("TOTAL_ENTRIES", defaults.total_entries),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            default_hit_limit: env_or("DEFAULT_HIT_LIMIT", defaults.default_hit_limit),
            on_full: env_or("ON_FULL", defaults.on_full),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_entries: 0,
            max_entries: 1000,
            default_ttl: 300,
            default_hit_limit: 0,
            on_full: OnFullPolicy::Reject,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.total_entries, 0);
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.default_hit_limit, 0);
        assert_eq!(config.on_full, OnFullPolicy::Reject);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env() {
        // Both cases live in one test since they share process environment
        env::remove_var("TOTAL_ENTRIES");
        env::remove_var("MAX_ENTRIES");
        env::remove_var("DEFAULT_TTL");
        env::remove_var("DEFAULT_HIT_LIMIT");
        env::remove_var("ON_FULL");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.on_full, OnFullPolicy::Reject);
        assert_eq!(config.server_port, 3000);

        env::set_var("ON_FULL", "evict-oldest");
        env::set_var("DEFAULT_HIT_LIMIT", "5");
        env::set_var("MAX_ENTRIES", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.on_full, OnFullPolicy::EvictOldest);
        assert_eq!(config.default_hit_limit, 5);
        assert_eq!(config.max_entries, 1000);

        env::remove_var("ON_FULL");
        env::remove_var("DEFAULT_HIT_LIMIT");
        env::remove_var("MAX_ENTRIES");
    }
}
