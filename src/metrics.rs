//! Prometheus metrics for request and backend latency.
//!
//! This module provides metrics for:
//! - HTTP request counts and latency per route
//! - Storage probe latency and failures
//! - Pods created through the API

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::{debug, info};

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Storage probe latency metric name.
pub const METRIC_PROBE_LATENCY: &str = "storage_probe_latency_ms";
/// Storage probe failures counter metric name.
pub const METRIC_PROBE_FAILURES: &str = "storage_probe_failures_total";
/// Pods created counter metric name.
pub const METRIC_PODS_CREATED: &str = "pods_created_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_PROBE_LATENCY,
        "Storage probe round-trip latency in milliseconds"
    );
    describe_counter!(METRIC_PROBE_FAILURES, "Total number of failed storage probes");
    describe_counter!(METRIC_PODS_CREATED, "Total number of pods created");

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter on its own listener.
///
/// Must be called from within a Tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record a served HTTP request.
pub fn record_http_request(start: Instant, method: &str, path: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!(METRIC_HTTP_REQUESTS, &labels).increment(1);
    histogram!(METRIC_HTTP_REQUEST_LATENCY, &labels).record(latency_ms);
}

/// Record storage probe latency.
pub fn record_probe_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_PROBE_LATENCY).record(latency_ms);
}

/// Increment storage probe failures counter.
pub fn inc_probe_failures() {
    counter!(METRIC_PROBE_FAILURES).increment(1);
}

/// Increment pods created counter.
pub fn inc_pods_created() {
    counter!(METRIC_PODS_CREATED).increment(1);
}
