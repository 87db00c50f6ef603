//! # HTTP Request Tracing Middleware
//!
//! Wraps every request in an `http_request` span, records latency and status
//! metrics, and logs failed requests. Server errors are logged at `error`;
//! client errors such as scope denials stay at `debug`.

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::observability::metrics;

/// Axum middleware that traces and measures each HTTP request.
pub async fn trace_http_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let uri = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let span = crate::request_span!(method, uri, route = %route);
    let response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let elapsed = start.elapsed();
    span.in_scope(|| log_outcome(&method, &uri, status, elapsed));

    metrics::record_http_request(&method, &route, status.as_u16(), elapsed.as_secs_f64()).await;

    response
}

fn log_outcome(method: &str, uri: &str, status: StatusCode, elapsed: Duration) {
    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Unhandled error for request {} {}",
            method,
            uri
        );
    } else if status.is_client_error() {
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "request rejected"
        );
    } else {
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );
    }
}
