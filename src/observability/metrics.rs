//! Metrics collection and exposition.
//!
//! # Metrics
//! - `log_messages_recorded_total` (counter): messages written through the facade
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Labels use the matched route, not the raw URI, to bound cardinality
//! - Nothing is recorded until `init_metrics` installs the exporter

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const MESSAGES_RECORDED: &str = "log_messages_recorded_total";
pub const HTTP_REQUESTS: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!(MESSAGES_RECORDED, "Messages written to the application log");
    metrics::describe_counter!(HTTP_REQUESTS, "HTTP requests served");
    metrics::describe_histogram!(
        HTTP_REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request latency"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_message() {
    metrics::counter!(MESSAGES_RECORDED).increment(1);
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!(HTTP_REQUESTS, &labels).increment(1);
    metrics::histogram!(HTTP_REQUEST_DURATION, &labels).record(start.elapsed().as_secs_f64());
}

/// Route middleware recording request count and latency.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };
    let method = request.method().to_string();

    let response = next.run(request).await;

    record_request(&method, &path, response.status().as_u16(), start);
    response
}
