//! Health handler.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage_endpoint: String,
    pub bucket: String,
    pub layers: usize,
}

/// GET /health - Basic health check
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        storage_endpoint: state.resolver.endpoint().to_string(),
        bucket: state.resolver.bucket().to_string(),
        layers: state.store.layer_ids().await.len(),
    })
}
