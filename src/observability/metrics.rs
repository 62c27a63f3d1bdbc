//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_requests_total` (counter): served mocks by method, status
//! - `mock_request_duration_seconds` (histogram): time to respond, delay included
//! - `mock_unmatched_requests_total` (counter): requests no route matched
//! - `mock_route_reloads_total` (counter): reloads by outcome
//! - `mock_routes` (gauge): routes in the active index
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until a
//!   recorder is installed
//! - The Prometheus exporter is only installed when an address is configured

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a served mock.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("mock_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a request that matched no route.
pub fn record_unmatched(method: &str) {
    metrics::counter!("mock_unmatched_requests_total", "method" => method.to_string()).increment(1);
}

/// Record a route index rebuild.
pub fn record_reload(success: bool, routes: usize) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("mock_route_reloads_total", "outcome" => outcome).increment(1);
    if success {
        metrics::gauge!("mock_routes").set(routes as f64);
    }
}
