//! Source projection detection.
//!
//! Rules are tried in order and the first one that applies wins:
//!
//! 1. A projected-CRS code is present → Mercator; a geographic-CRS code is
//!    present → Geographic.
//! 2. The GeoTIFF model type says projected / geographic.
//! 3. Magnitude of the raw bounds: any `|v| > 200` can only be meters;
//!    all `|v| <= 180` look like degrees.
//! 4. Nothing matched → Unknown. Unknown sources are never reprojected.

use cog_source::CrsHints;
use geo_common::{ModelType, SourceProjection};
use serde::Serialize;
use std::fmt;

/// Largest magnitude a degree coordinate can have.
const DEGREE_LIMIT: f64 = 180.0;

/// Magnitude above which a coordinate is taken to be meters.
const METER_THRESHOLD: f64 = 200.0;

/// The rule that decided a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    ProjectedCode,
    GeographicCode,
    ModelType,
    Magnitude,
    Undetermined,
}

impl fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectionRule::ProjectedCode => "projected_code",
            DetectionRule::GeographicCode => "geographic_code",
            DetectionRule::ModelType => "model_type",
            DetectionRule::Magnitude => "magnitude",
            DetectionRule::Undetermined => "undetermined",
        };
        write!(f, "{}", name)
    }
}

/// Classify the projection a raster's samples were gridded in.
///
/// Never fails; [`SourceProjection::Unknown`] is a normal outcome.
pub fn detect_projection(raw_bounds: Option<&[f64]>, hints: &CrsHints) -> SourceProjection {
    detect_projection_with_rule(raw_bounds, hints).0
}

/// Like [`detect_projection`], also reporting which rule matched.
pub fn detect_projection_with_rule(
    raw_bounds: Option<&[f64]>,
    hints: &CrsHints,
) -> (SourceProjection, DetectionRule) {
    if hints.projected_code.is_some() {
        return (SourceProjection::Mercator, DetectionRule::ProjectedCode);
    }
    if hints.geographic_code.is_some() {
        return (SourceProjection::Geographic, DetectionRule::GeographicCode);
    }

    match hints.model_type {
        Some(ModelType::Projected) => return (SourceProjection::Mercator, DetectionRule::ModelType),
        Some(ModelType::Geographic) => {
            return (SourceProjection::Geographic, DetectionRule::ModelType)
        }
        None => {}
    }

    match raw_bounds {
        Some(values) if !values.is_empty() => {
            if values.iter().any(|v| v.abs() > METER_THRESHOLD) {
                (SourceProjection::Mercator, DetectionRule::Magnitude)
            } else if values.iter().all(|v| v.abs() <= DEGREE_LIMIT) {
                (SourceProjection::Geographic, DetectionRule::Magnitude)
            } else {
                (SourceProjection::Unknown, DetectionRule::Undetermined)
            }
        }
        _ => (SourceProjection::Unknown, DetectionRule::Undetermined),
    }
}
