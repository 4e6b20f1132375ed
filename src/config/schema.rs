//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the flight search proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream flight-offer provider settings.
    pub upstream: UpstreamConfig,

    /// Fan-out behaviour for search requests.
    pub search: SearchConfig,

    /// Optional static front-end hosting.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the provider API.
    pub base_url: String,

    /// OAuth2 client id.
    pub client_id: String,

    /// OAuth2 client secret. Never logged.
    pub client_secret: String,

    /// Per-call timeout in seconds, applied by the HTTP client.
    pub timeout_secs: u64,

    /// Number of adult passengers sent with every query.
    pub adults: u32,

    /// Currency the provider prices offers in.
    pub currency: String,

    /// Maximum offers returned per date.
    pub max_results: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://test.api.amadeus.com".to_string(),
            client_id: "REPLACE_WITH_YOUR_KEY".to_string(),
            client_secret: "REPLACE_WITH_YOUR_SECRET".to_string(),
            timeout_secs: 30,
            adults: 1,
            currency: "EUR".to_string(),
            max_results: 5,
        }
    }
}

/// Search fan-out configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Days on either side of the departure date queried when the
    /// flexible flag is set.
    pub flexible_window_days: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            flexible_window_days: 3,
        }
    }
}

/// Static file hosting for the bundled front-end.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory to serve; `None` disables static hosting.
    pub dir: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_query() {
        let config = ProxyConfig::default();
        assert_eq!(config.upstream.adults, 1);
        assert_eq!(config.upstream.currency, "EUR");
        assert_eq!(config.upstream.max_results, 5);
        assert_eq!(config.search.flexible_window_days, 3);
        assert!(config.static_files.dir.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:4000"

            [upstream]
            currency = "USD"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.upstream.currency, "USD");
        assert_eq!(config.upstream.max_results, 5);
        assert_eq!(config.observability.log_level, "info");
    }
}
