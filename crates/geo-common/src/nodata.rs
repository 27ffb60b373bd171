//! No-data classification for raster samples.

use serde::{Deserialize, Serialize};

/// Samples with a larger magnitude than this are treated as fill values.
pub const DEFAULT_MAGNITUDE_THRESHOLD: f32 = 1e10;

/// Sentinels commonly written by GIS tooling for "no measurement".
pub const DEFAULT_SENTINELS: [f32; 2] = [-9999.0, -999.0];

/// Decides whether a sample denotes "no measurement here".
///
/// Zero is always valid data. Only NaN, out-of-magnitude values, known
/// sentinels and the file's own declared no-data value are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataClassifier {
    /// Absolute magnitude above which a sample is no-data.
    pub magnitude_threshold: f32,
    /// Exact sentinel values.
    pub sentinels: Vec<f32>,
    /// No-data value declared by the source file, if any.
    pub declared: Option<f32>,
}

impl Default for NoDataClassifier {
    fn default() -> Self {
        Self {
            magnitude_threshold: DEFAULT_MAGNITUDE_THRESHOLD,
            sentinels: DEFAULT_SENTINELS.to_vec(),
            declared: None,
        }
    }
}

impl NoDataClassifier {
    /// Override the magnitude threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.magnitude_threshold = threshold.abs();
        self
    }

    /// Add the file's declared no-data value.
    pub fn with_declared(mut self, declared: Option<f32>) -> Self {
        self.declared = declared.filter(|v| !v.is_nan());
        self
    }

    #[inline]
    pub fn is_nodata(&self, value: f32) -> bool {
        value.is_nan()
            || value.abs() > self.magnitude_threshold
            || self.sentinels.iter().any(|s| *s == value)
            || self.declared == Some(value)
    }

    #[inline]
    pub fn is_valid(&self, value: f32) -> bool {
        !self.is_nodata(value)
    }

    /// `(min, max)` over the valid samples, or `None` if there are none.
    pub fn value_range(&self, samples: &[f32]) -> Option<(f32, f32)> {
        samples
            .iter()
            .copied()
            .filter(|v| self.is_valid(*v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
