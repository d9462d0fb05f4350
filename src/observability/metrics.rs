//! Metrics collection and exposition.
//!
//! # Metrics
//! - `stocks_api_requests_total` (counter): requests by method, status
//! - `stocks_api_request_duration_seconds` (histogram): latency by method

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, took: Duration) {
    ::metrics::counter!(
        "stocks_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "stocks_api_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(took.as_secs_f64());
}
