//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, stage
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_handler_errors_total` (counter): handler failures by route group

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed request. `stage` names the pipeline stage that
/// produced the response (`route`, `static`, `not_found`, ...).
pub fn record_request(method: &str, status: u16, stage: &'static str, started: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "stage" => stage
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method,
        "status" => status,
        "stage" => stage
    )
    .record(started.elapsed().as_secs_f64());
}

pub fn record_handler_error(group: &str) {
    metrics::counter!("gateway_handler_errors_total", "group" => group.to_string()).increment(1);
}

