//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address '{0}'")]
    BindAddress(String),

    #[error("invalid upstream base url '{0}'")]
    UpstreamUrl(String),

    #[error("upstream.{0} must be greater than zero")]
    NonZero(&'static str),

    #[error("upstream.currency must be a 3-letter code, got '{0}'")]
    Currency(String),

    #[error("search.flexible_window_days must be at most 30, got {0}")]
    FlexibleWindow(u32),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let upstream = &config.upstream;
    match url::Url::parse(&upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::UpstreamUrl(upstream.base_url.clone())),
    }
    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::NonZero("timeout_secs"));
    }
    if upstream.adults == 0 {
        errors.push(ValidationError::NonZero("adults"));
    }
    if upstream.max_results == 0 {
        errors.push(ValidationError::NonZero("max_results"));
    }
    if upstream.currency.len() != 3 || !upstream.currency.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::Currency(upstream.currency.clone()));
    }

    if config.search.flexible_window_days > 30 {
        errors.push(ValidationError::FlexibleWindow(config.search.flexible_window_days));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
