//! Axum middleware for automatic HTTP request metrics.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response},
    middleware::Next,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Middleware function for recording HTTP request metrics.
///
/// Records:
/// - `http_requests_total` (method, route, status)
/// - `http_request_duration_seconds` (method, route)
/// - `http_requests_errors_total` for 4xx and 5xx
///
/// Routes are labelled by matched template; unmatched requests share one
/// label so scanners cannot blow up cardinality.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status();
    let labels = [
        ("method", method),
        ("route", route),
        ("status", status.as_u16().to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels[..2])
        .record(start.elapsed().as_secs_f64());

    if status.is_client_error() || status.is_server_error() {
        counter!("http_requests_errors_total", &labels).increment(1);
    }

    response
}
