//! Decoded raster types.

use geo_common::ModelType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// CRS evidence found in a GeoTIFF's GeoKey directory.
///
/// Each field is only set when the file actually declares it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrsHints {
    /// `GTModelTypeGeoKey` (1024)
    pub model_type: Option<ModelType>,
    /// `GeographicTypeGeoKey` (2048)
    pub geographic_code: Option<u16>,
    /// `ProjectedCSTypeGeoKey` (3072)
    pub projected_code: Option<u16>,
}

impl CrsHints {
    pub fn is_empty(&self) -> bool {
        self.model_type.is_none() && self.geographic_code.is_none() && self.projected_code.is_none()
    }
}

/// A single band decoded to `f32`, with best-effort georeferencing.
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    pub width: usize,
    pub height: usize,
    /// Row-major, north row first, `width * height` values.
    pub samples: Arc<Vec<f32>>,
    /// `[west, south, east, north]` in the file's own units, if declared.
    pub raw_bounds: Option<Vec<f64>>,
    pub hints: CrsHints,
    /// `GDAL_NODATA`, if declared.
    pub nodata: Option<f64>,
}

impl DecodedRaster {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
