//! Configuration for the raster engine.

use geo_common::{BoundingBox, CrsCode, NoDataClassifier, DEFAULT_MAGNITUDE_THRESHOLD, DEFAULT_SENTINELS};
use projection::{lat_to_mercator_y, MAX_EXTENT};
use serde::{Deserialize, Serialize};

/// North edge of zoom-2 tile row 1: the latitude band most tiled global
/// COGs actually cover.
pub const DEFAULT_CANONICAL_LAT: f64 = 66.51326044311186;

/// How close (meters) a Mercator extent must be to the canonical one to
/// snap to it.
pub const DEFAULT_MERCATOR_TOLERANCE_M: f64 = 200.0;

/// Configuration for the raster engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// CRS of the basemap the overlay is drawn on.
    pub display_crs: CrsCode,

    /// Fallback and snapping rules for raster bounds.
    pub bounds: BoundsPolicy,

    /// No-data classification defaults.
    pub nodata: NoDataConfig,

    /// Number of decoded rasters kept in memory.
    pub decoded_cache_capacity: usize,

    /// HTTP fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_crs: CrsCode::Epsg3857,
            bounds: BoundsPolicy::default(),
            nodata: NoDataConfig::default(),
            decoded_cache_capacity: 16,
            fetch_timeout_secs: 60,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults; run
    /// [`validate`](Self::validate) afterwards.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("COG_DISPLAY_CRS") {
            if let Ok(crs) = CrsCode::from_crs_string(&val) {
                config.display_crs = crs;
            }
        }

        if let Ok(val) = std::env::var("COG_CANONICAL_LAT") {
            if let Ok(lat) = val.parse() {
                config.bounds.canonical_lat = lat;
            }
        }

        if let Ok(val) = std::env::var("COG_MERCATOR_TOLERANCE_M") {
            if let Ok(tolerance) = val.parse() {
                config.bounds.mercator_tolerance_m = tolerance;
            }
        }

        if let Ok(val) = std::env::var("COG_NODATA_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.nodata.magnitude_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("COG_NODATA_SENTINELS") {
            let sentinels: Result<Vec<f32>, _> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            if let Ok(sentinels) = sentinels {
                config.nodata.sentinels = sentinels;
            }
        }

        if let Ok(val) = std::env::var("COG_HONOR_FILE_NODATA") {
            config.nodata.honor_declared = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("COG_DECODED_CACHE_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                config.decoded_cache_capacity = capacity;
            }
        }

        if let Ok(val) = std::env::var("COG_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.fetch_timeout_secs = secs;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let lat = self.bounds.canonical_lat;
        if !(lat.is_finite() && lat > 0.0 && lat < 90.0) {
            return Err(format!("canonical_lat must be in (0, 90), got {}", lat));
        }

        let tolerance = self.bounds.mercator_tolerance_m;
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err("mercator_tolerance_m must be >= 0".to_string());
        }

        let threshold = self.nodata.magnitude_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err("nodata magnitude_threshold must be > 0".to_string());
        }

        if self.decoded_cache_capacity == 0 {
            return Err("decoded_cache_capacity must be > 0".to_string());
        }

        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be > 0".to_string());
        }

        Ok(())
    }

    /// Whether geographic sources must be resampled onto a Mercator grid.
    pub fn reprojects_geographic(&self) -> bool {
        !self.display_crs.is_geographic()
    }
}

/// Fallback and snapping rules for the bounds normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsPolicy {
    /// Latitude of the canonical tile band `[-180, -L, 180, L]`.
    pub canonical_lat: f64,

    /// Snap tolerance for Mercator extents, in meters.
    pub mercator_tolerance_m: f64,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self {
            canonical_lat: DEFAULT_CANONICAL_LAT,
            mercator_tolerance_m: DEFAULT_MERCATOR_TOLERANCE_M,
        }
    }
}

impl BoundsPolicy {
    /// `[-180, -L, 180, L]` in degrees.
    pub fn canonical_extent(&self) -> BoundingBox {
        BoundingBox::new(-180.0, -self.canonical_lat, 180.0, self.canonical_lat)
    }

    /// The canonical band in Mercator meters, `[min_x, min_y, max_x, max_y]`.
    pub fn canonical_mercator_extent(&self) -> [f64; 4] {
        let y = lat_to_mercator_y(self.canonical_lat);
        [-MAX_EXTENT, -y, MAX_EXTENT, y]
    }
}

/// Defaults for deciding which samples are no-data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataConfig {
    /// Samples with a larger magnitude are no-data.
    pub magnitude_threshold: f32,

    /// Exact sentinel values.
    pub sentinels: Vec<f32>,

    /// Also treat the file's `GDAL_NODATA` value as no-data.
    pub honor_declared: bool,
}

impl Default for NoDataConfig {
    fn default() -> Self {
        Self {
            magnitude_threshold: DEFAULT_MAGNITUDE_THRESHOLD,
            sentinels: DEFAULT_SENTINELS.to_vec(),
            honor_declared: true,
        }
    }
}

impl NoDataConfig {
    /// Build the classifier for one raster.
    ///
    /// # Arguments
    /// * `declared` - The file's own no-data value, if any
    /// * `threshold_override` - Per-request magnitude threshold
    pub fn classifier(&self, declared: Option<f64>, threshold_override: Option<f32>) -> NoDataClassifier {
        let declared = if self.honor_declared {
            declared.map(|v| v as f32)
        } else {
            None
        };

        NoDataClassifier {
            magnitude_threshold: self.magnitude_threshold,
            sentinels: self.sentinels.clone(),
            declared: None,
        }
        .with_threshold(threshold_override.unwrap_or(self.magnitude_threshold))
        .with_declared(declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.bounds.canonical_lat = 95.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.decoded_cache_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.nodata.magnitude_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_canonical_mercator_extent() {
        let [min_x, min_y, max_x, max_y] = BoundsPolicy::default().canonical_mercator_extent();
        assert_eq!(min_x, -MAX_EXTENT);
        assert_eq!(max_x, MAX_EXTENT);
        assert!((max_y - MAX_EXTENT / 2.0).abs() < 1e-3);
        assert_eq!(min_y, -max_y);
    }

    #[test]
    fn test_classifier_override_and_declared() {
        let nodata = NoDataConfig::default();

        let classifier = nodata.classifier(Some(255.0), Some(100.0));
        assert!(classifier.is_nodata(255.0));
        assert!(classifier.is_nodata(150.0));
        assert!(classifier.is_valid(50.0));

        let ignoring = NoDataConfig {
            honor_declared: false,
            ..NoDataConfig::default()
        };
        assert!(ignoring.classifier(Some(255.0), None).is_valid(255.0));
    }
}
