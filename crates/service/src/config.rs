//! Application configuration loaded from environment variables.

use std::time::Duration;

use cache::{CachePolicy, DEFAULT_TTL};

use crate::DEFAULT_LIMIT;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Runtime configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DATABASE_URL`: PostgreSQL connection string; in-memory stores when unset
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `CACHE_TTL_SECS`: default absolute cache TTL (default: `300`)
/// - `PAGE_DEFAULT_LIMIT`: page size when the caller gives none (default: `30`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub cache_ttl: Duration,
    pub page_default_limit: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.database_max_connections),
            cache_ttl: lookup("CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            page_default_limit: lookup("PAGE_DEFAULT_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_default_limit),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    /// Cache policy for domains without a registered one.
    pub fn default_cache_policy(&self) -> CachePolicy {
        CachePolicy::expire_after_write(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 5,
            cache_ttl: DEFAULT_TTL,
            page_default_limit: DEFAULT_LIMIT,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cache::Expiry;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.page_default_limit, 30);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_empty_environment_matches_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.database_url, None);
        assert_eq!(config.page_default_limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_values_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("CACHE_TTL_SECS", "60"),
            ("PAGE_DEFAULT_LIMIT", "10"),
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(config.database_max_connections, 12);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.page_default_limit, 10);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "  "),
            ("DATABASE_MAX_CONNECTIONS", "0"),
            ("CACHE_TTL_SECS", "soon"),
            ("PAGE_DEFAULT_LIMIT", "-3"),
            ("LOG_FORMAT", "xml"),
        ]));

        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.cache_ttl, DEFAULT_TTL);
        assert_eq!(config.page_default_limit, 30);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_default_cache_policy_uses_ttl() {
        let config = Config {
            cache_ttl: Duration::from_secs(42),
            ..Config::default()
        };
        let policy = config.default_cache_policy();

        assert_eq!(policy.expiry, Expiry::AfterWrite(Duration::from_secs(42)));
        assert_eq!(policy.max_entries, None);
    }
}
