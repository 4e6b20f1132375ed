//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flight_proxy_search_requests_total` (counter): search requests by status
//! - `flight_proxy_search_duration_seconds` (histogram): end-to-end search latency
//! - `flight_proxy_upstream_queries_total` (counter): per-date queries by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Labels kept low-cardinality (no dates, no airports)

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished `/api/search` request.
pub fn record_search(status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!("flight_proxy_search_requests_total", "status" => status).increment(1);
    metrics::histogram!("flight_proxy_search_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one per-date upstream query.
pub fn record_upstream_query(success: bool) {
    let outcome = if success { "ok" } else { "failed" };
    metrics::counter!("flight_proxy_upstream_queries_total", "outcome" => outcome).increment(1);
}
