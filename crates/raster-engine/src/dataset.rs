//! The shared raster dataset and render results.

use crate::error::{RasterError, Result};
use geo_common::{BoundingBox, GridSpacing, NoDataClassifier, SourceProjection};
use projection::{lat_to_mercator_y, mercator_y_to_lat};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Immutable, georeferenced single-band raster.
///
/// Rows run north to south, columns west to east. Both the colormap and the
/// point query read this one value, so they cannot disagree about which
/// sample sits under a given coordinate.
#[derive(Debug, Clone)]
pub struct RasterDataset {
    samples: Arc<Vec<f32>>,
    width: usize,
    height: usize,
    bounds: BoundingBox,
    source_projection: SourceProjection,
    spacing: GridSpacing,
    classifier: NoDataClassifier,
    value_range: Option<(f32, f32)>,
}

impl RasterDataset {
    /// Build a dataset, computing its value range once.
    ///
    /// Fails if the sample buffer does not hold exactly `width * height`
    /// values, a dimension is zero, or `bounds` is not well-formed.
    pub fn new(
        samples: Arc<Vec<f32>>,
        width: usize,
        height: usize,
        bounds: BoundingBox,
        source_projection: SourceProjection,
        spacing: GridSpacing,
        classifier: NoDataClassifier,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDataset(format!(
                "zero dimension {}x{}",
                width, height
            )));
        }
        if samples.len() != width * height {
            return Err(RasterError::InvalidDataset(format!(
                "{} samples for {}x{} pixels",
                samples.len(),
                width,
                height
            )));
        }

        if !bounds.is_well_formed() {
            return Err(RasterError::InvalidDataset(format!(
                "bounds [{}, {}, {}, {}] are not well-formed",
                bounds.min_lon, bounds.min_lat, bounds.max_lon, bounds.max_lat
            )));
        }

        let value_range = classifier.value_range(&samples);

        Ok(Self {
            samples,
            width,
            height,
            bounds,
            source_projection,
            spacing,
            classifier,
            value_range,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The shared sample buffer.
    pub fn samples_arc(&self) -> &Arc<Vec<f32>> {
        &self.samples
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn source_projection(&self) -> SourceProjection {
        self.source_projection
    }

    pub fn spacing(&self) -> GridSpacing {
        self.spacing
    }

    pub fn classifier(&self) -> &NoDataClassifier {
        &self.classifier
    }

    /// `(min, max)` over valid samples; `None` if every sample is no-data.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.value_range
    }

    /// Sample at pixel `(x, y)`, if inside the grid.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.samples[y * self.width + x])
        } else {
            None
        }
    }

    /// Count of no-data samples.
    pub fn nodata_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|v| self.classifier.is_nodata(**v))
            .count()
    }

    /// `(lng, lat)` at the center of pixel `(x, y)`.
    ///
    /// Exact inverse of the row/column mapping used by [`crate::query`].
    pub fn pixel_center(&self, x: usize, y: usize) -> (f64, f64) {
        let b = &self.bounds;
        let fx = (x as f64 + 0.5) / self.width as f64;
        let fy = (y as f64 + 0.5) / self.height as f64;

        let lng = b.min_lon + fx * (b.max_lon - b.min_lon);
        let lat = match self.spacing {
            GridSpacing::LinearLatitude => b.max_lat - fy * (b.max_lat - b.min_lat),
            GridSpacing::LinearMercator => {
                let north = lat_to_mercator_y(b.max_lat);
                let south = lat_to_mercator_y(b.min_lat);
                mercator_y_to_lat(north - fy * (north - south))
            }
        };

        (lng, lat)
    }
}

/// Per-request rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Explicit colormap domain; defaults to the dataset's value range.
    pub rescale: Option<(f32, f32)>,

    /// Override for the no-data magnitude threshold.
    pub nodata_threshold: Option<f32>,

    /// Paint every valid sample with one fixed color.
    #[serde(default)]
    pub debug_mode: bool,
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some((min, max)) = self.rescale {
            if !(min.is_finite() && max.is_finite()) {
                return Err(RasterError::invalid_options("rescale values must be finite"));
            }
            if min >= max {
                return Err(RasterError::invalid_options(format!(
                    "rescale min ({}) must be below max ({})",
                    min, max
                )));
            }
        }

        if let Some(threshold) = self.nodata_threshold {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(RasterError::invalid_options(
                    "nodata_threshold must be a positive number",
                ));
            }
        }

        Ok(())
    }

    /// Whether a dataset built under `other` can be reused for `self`.
    pub fn same_dataset(&self, other: &RenderOptions) -> bool {
        self.nodata_threshold == other.nodata_threshold
    }
}

/// An RGBA image plus the dataset it was drawn from.
///
/// `image[(y * width + x) * 4..][..4]` and `dataset.samples()[y * width + x]`
/// describe the same pixel.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub image: Vec<u8>,
    pub dataset: Arc<RasterDataset>,
    /// Colormap domain actually used.
    pub domain: (f32, f32),
    pub options: RenderOptions,
}

impl RenderResult {
    pub fn width(&self) -> usize {
        self.dataset.width()
    }

    pub fn height(&self) -> usize {
        self.dataset.height()
    }

    /// Display corners: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        self.dataset.bounds().corners()
    }

    /// Encode the image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(renderer::encode_png(&self.image, self.width(), self.height())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(spacing: GridSpacing) -> RasterDataset {
        RasterDataset::new(
            Arc::new(vec![1.0, f32::NAN, 3.0, 4.0, 5.0, 6.0]),
            3,
            2,
            BoundingBox::new(0.0, 0.0, 30.0, 20.0),
            SourceProjection::Geographic,
            spacing,
            NoDataClassifier::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        let err = RasterDataset::new(
            Arc::new(vec![0.0; 5]),
            3,
            2,
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            SourceProjection::Unknown,
            GridSpacing::LinearLatitude,
            NoDataClassifier::default(),
        );
        assert!(matches!(err, Err(RasterError::InvalidDataset(_))));
    }

    #[test]
    fn test_rejects_degenerate_bounds() {
        for bounds in [
            BoundingBox::new(0.0, 85.051129, 10.0, 85.051129),
            BoundingBox::new(10.0, 0.0, 0.0, 10.0),
            BoundingBox::new(0.0, 0.0, 10.0, f64::NAN),
        ] {
            let err = RasterDataset::new(
                Arc::new(vec![1.0; 4]),
                2,
                2,
                bounds,
                SourceProjection::Geographic,
                GridSpacing::LinearMercator,
                NoDataClassifier::default(),
            );
            assert!(matches!(err, Err(RasterError::InvalidDataset(_))), "{:?}", bounds);
        }
    }

    #[test]
    fn test_value_range_and_nodata_count() {
        let ds = dataset(GridSpacing::LinearLatitude);
        assert_eq!(ds.value_range(), Some((1.0, 6.0)));
        assert_eq!(ds.nodata_count(), 1);
    }

    #[test]
    fn test_pixel_center_linear_latitude() {
        let ds = dataset(GridSpacing::LinearLatitude);
        assert_eq!(ds.pixel_center(0, 0), (5.0, 15.0));
        assert_eq!(ds.pixel_center(2, 1), (25.0, 5.0));
    }

    #[test]
    fn test_pixel_center_linear_mercator() {
        let ds = dataset(GridSpacing::LinearMercator);
        let (_, lat_top) = ds.pixel_center(0, 0);
        let (_, lat_bottom) = ds.pixel_center(0, 1);
        // The row boundary sits at the Mercator midpoint, so the southern
        // row spans more latitude than the northern one.
        let mid = mercator_y_to_lat(lat_to_mercator_y(20.0) / 2.0);
        assert!(20.0 - mid < mid - 0.0);
        assert!(lat_top > mid && lat_bottom < mid);
        assert!((lat_top - mercator_y_to_lat(lat_to_mercator_y(20.0) * 0.75)).abs() < 1e-9);
        assert!((lat_bottom - mercator_y_to_lat(lat_to_mercator_y(20.0) * 0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_render_options_validation() {
        assert!(RenderOptions::default().validate().is_ok());

        let bad = RenderOptions {
            rescale: Some((5.0, 5.0)),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(RasterError::InvalidOptions(_))));

        let bad = RenderOptions {
            rescale: Some((f32::NAN, 5.0)),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = RenderOptions {
            nodata_threshold: Some(-1.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
