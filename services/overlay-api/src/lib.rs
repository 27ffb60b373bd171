//! COG Overlay API Service Library
//!
//! HTTP surface over the raster engine: load a Cloud-Optimized GeoTIFF as a
//! named layer, fetch its colormapped PNG and display corners, and query
//! pixel values under the cursor.

pub mod config;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router with its middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Layers
        .route("/layers", get(handlers::layers::list_layers_handler))
        .route(
            "/layers/:layer_id",
            put(handlers::layers::load_layer_handler)
                .get(handlers::layers::get_layer_handler)
                .delete(handlers::layers::delete_layer_handler),
        )
        .route(
            "/layers/:layer_id/image.png",
            get(handlers::layers::layer_image_handler),
        )
        .route(
            "/layers/:layer_id/query",
            get(handlers::layers::query_layer_handler),
        )
        // Health
        .route("/health", get(handlers::health::health_handler))
        .route("/healthz", get(handlers::health::health_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
