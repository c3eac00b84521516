//! Request logging middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::info;

use crate::metrics;

use super::routes::Route;

/// Metric label for requests that did not match any route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Log method, path, status and latency once the handler has finished.
///
/// Observes the response only; headers and body pass through untouched.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        method = %method,
        path = %path,
        status,
        latency_ms = format_args!("{:.3}", latency_ms),
        "request completed"
    );

    // Label by route name so arbitrary 404 paths cannot blow up cardinality.
    let route = Route::from_path(&path).map_or(UNMATCHED_ROUTE, <&'static str>::from);
    metrics::record_http_request(start, method.as_str(), route, status);

    response
}
