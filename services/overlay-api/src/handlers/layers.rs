//! Layer handlers: load, list, image, query and delete.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use raster_engine::{LayerEntry, LayerSummary, RasterError, RenderOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{error_response, raster_error_response};
use crate::state::AppState;

/// Query parameters for `PUT /layers/:layer_id`.
#[derive(Debug, Default, Deserialize)]
pub struct LoadLayerParams {
    /// Full URL, local path, or friendly dataset path.
    pub url: String,

    /// Colormap domain as `min,max`.
    pub rescale: Option<String>,

    /// Magnitude above which samples are no-data.
    pub nodata_threshold: Option<f32>,

    /// Paint valid pixels with a single debug color.
    pub debug: Option<bool>,
}

impl LoadLayerParams {
    /// Convert to engine options.
    pub fn to_options(&self) -> Result<RenderOptions, RasterError> {
        let rescale = match self.rescale.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_rescale(text)?),
        };

        let options = RenderOptions {
            rescale,
            nodata_threshold: self.nodata_threshold,
            debug_mode: self.debug.unwrap_or(false),
        };
        options.validate()?;
        Ok(options)
    }
}

fn parse_rescale(text: &str) -> Result<(f32, f32), RasterError> {
    let invalid = || RasterError::invalid_options(format!("rescale must be 'min,max', got '{}'", text));

    let (min, max) = text.split_once(',').ok_or_else(invalid)?;
    let min = min.trim().parse::<f32>().map_err(|_| invalid())?;
    let max = max.trim().parse::<f32>().map_err(|_| invalid())?;
    Ok((min, max))
}

/// Query parameters for `GET /layers/:layer_id/query`.
#[derive(Debug, Deserialize)]
pub struct PointQueryParams {
    pub lng: f64,
    pub lat: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PointQueryResponse {
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LayerListResponse {
    pub layers: Vec<String>,
}

/// PUT /layers/:layer_id?url=...
pub async fn load_layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_id): Path<String>,
    Query(params): Query<LoadLayerParams>,
) -> Response {
    let options = match params.to_options() {
        Ok(options) => options,
        Err(e) => return raster_error_response(&e),
    };

    let url = match state.resolver.resolve(&params.url) {
        Ok(url) => url,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    match state.store.load(&layer_id, &url, options).await {
        Ok(result) => {
            info!(layer = %layer_id, url = %url, "Layer ready");
            let entry = LayerEntry {
                url,
                options,
                result,
            };
            Json(entry.summary(&layer_id)).into_response()
        }
        Err(e) => raster_error_response(&e),
    }
}

/// GET /layers
pub async fn list_layers_handler(Extension(state): Extension<Arc<AppState>>) -> Json<LayerListResponse> {
    Json(LayerListResponse {
        layers: state.store.layer_ids().await,
    })
}

/// GET /layers/:layer_id
pub async fn get_layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_id): Path<String>,
) -> Response {
    match state.store.get(&layer_id).await {
        Ok(entry) => Json::<LayerSummary>(entry.summary(&layer_id)).into_response(),
        Err(e) => raster_error_response(&e),
    }
}

/// GET /layers/:layer_id/image.png
pub async fn layer_image_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_id): Path<String>,
) -> Response {
    let entry = match state.store.get(&layer_id).await {
        Ok(entry) => entry,
        Err(e) => return raster_error_response(&e),
    };

    let result = Arc::clone(&entry.result);
    let encoded = tokio::task::spawn_blocking(move || result.to_png())
        .await
        .map_err(RasterError::from)
        .and_then(|r| r);

    match encoded {
        Ok(png) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            png,
        )
            .into_response(),
        Err(e) => raster_error_response(&e),
    }
}

/// GET /layers/:layer_id/query?lng=..&lat=..
pub async fn query_layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_id): Path<String>,
    Query(params): Query<PointQueryParams>,
) -> Response {
    match state.store.query(&layer_id, params.lng, params.lat).await {
        Ok(value) => Json(PointQueryResponse { value }).into_response(),
        Err(e) => raster_error_response(&e),
    }
}

/// DELETE /layers/:layer_id
pub async fn delete_layer_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_id): Path<String>,
) -> Response {
    match state.store.remove(&layer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => raster_error_response(&e),
    }
}
