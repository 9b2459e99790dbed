//! Metrics collection and exposition.
//!
//! # Metrics
//! - `acl_requests_total` (counter): requests by method, status, category
//! - `acl_request_duration_seconds` (histogram): end-to-end latency
//! - `acl_upstream_errors_total` (counter): failed round trips by kind
//!
//! Recording goes through the `metrics` facade and is a no-op until an
//! exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, category: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("category", category.to_string()),
    ];
    metrics::counter!("acl_requests_total", &labels).increment(1);
    metrics::histogram!("acl_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream failure.
pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("acl_upstream_errors_total", "kind" => kind).increment(1);
}
