//! HTTP request handlers for the overlay API.

pub mod health;
pub mod layers;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use raster_engine::RasterError;

/// JSON error body: `{ "error": message }`.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, Json(body)).into_response()
}

/// Map an engine error onto its HTTP status.
pub fn raster_error_response(err: &RasterError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    } else {
        tracing::debug!(error = %err, "Request rejected");
    }
    error_response(status, &err.to_string())
}
