//! Route handlers.
//!
//! The log route reads the `message` query parameter, records it through
//! the [`LogService`] when present and always echoes it back.

use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;
use crate::log_service::LogService;

/// Name of the query parameter carrying the message.
pub const MESSAGE_PARAM: &str = "message";

/// Prefix of every log route response body.
pub const RESPONSE_PREFIX: &str = "Log generated: ";

/// Rendering of a missing `message` in the response body.
pub const ABSENT_MESSAGE: &str = "null";

/// Extract the first `message` value from a raw query string.
///
/// `?message=` and a bare `?message` both yield `Some("")`.
/// Invalid percent-encoding is decoded lossily rather than rejected.
pub fn message_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == MESSAGE_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Record `message` if present and build the confirmation body.
pub fn handle_get(service: &LogService, message: Option<&str>) -> String {
    if let Some(message) = message {
        service.record(message);
    }
    format!("{}{}", RESPONSE_PREFIX, message.unwrap_or(ABSENT_MESSAGE))
}

/// `GET {log_path}?message=...`
pub async fn log_message(State(state): State<AppState>, RawQuery(query): RawQuery) -> String {
    let message = message_param(query.as_deref());
    tracing::debug!(present = message.is_some(), "Log request received");
    handle_get(&state.log_service, message.as_deref())
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET {health_path}`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
