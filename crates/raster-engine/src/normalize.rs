//! Bounds normalization.
//!
//! Turns whatever bounds a raster declares into a well-formed WGS84 box:
//! `west < east`, `south < north`, inside `[-180, 180] x [-90, 90]`.
//! Ambiguous input never fails; it resolves to the canonical tile band and
//! is logged at `warn`.
//!
//! Bounds that are merely close to global are kept as declared (after
//! clamping out-of-range coordinates). Stretching them to a "nicer" box
//! misaligns the overlay with its basemap.

use crate::config::BoundsPolicy;
use geo_common::{BoundingBox, SourceProjection};
use projection::mercator_to_lnglat;
use tracing::warn;

const GLOBAL_BOX: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

/// Largest magnitude a coordinate in degrees can have.
const DEGREE_LIMIT: f64 = 180.0;

/// Normalize raw bounds to WGS84 degrees.
///
/// # Arguments
/// * `raw` - `[west, south, east, north]` as declared by the file, if any
/// * `projection` - Detected source projection
/// * `policy` - Canonical extent and snapping tolerance
pub fn normalize_bounds(
    raw: Option<&[f64]>,
    projection: SourceProjection,
    policy: &BoundsPolicy,
) -> BoundingBox {
    let canonical = policy.canonical_extent();

    let Some(bbox) = raw.and_then(BoundingBox::from_slice) else {
        warn!(
            values = raw.map(|r| r.len()).unwrap_or(0),
            "Missing or malformed raster bounds, using canonical tile extent"
        );
        return canonical;
    };

    let values = bbox.to_array();
    if !values.iter().all(|v| v.is_finite()) {
        warn!(?values, "Non-finite raster bounds, using canonical tile extent");
        return canonical;
    }

    let bbox = if projection == SourceProjection::Mercator && is_meters(&values) {
        if matches_canonical_mercator(&values, policy) {
            return canonical;
        }
        let (west, south) = mercator_to_lnglat(bbox.min_lon, bbox.min_lat);
        let (east, north) = mercator_to_lnglat(bbox.max_lon, bbox.max_lat);
        BoundingBox::new(west, south, east, north)
    } else {
        bbox
    };

    if bbox.to_array() == GLOBAL_BOX {
        return canonical;
    }

    let bbox = bbox.clamp_to_valid().ordered();
    if !bbox.is_well_formed() {
        warn!(
            west = bbox.min_lon,
            south = bbox.min_lat,
            east = bbox.max_lon,
            north = bbox.max_lat,
            "Degenerate raster bounds, using canonical tile extent"
        );
        return canonical;
    }

    bbox
}

/// Degrees never exceed 180 in magnitude; anything larger is meters.
fn is_meters(values: &[f64; 4]) -> bool {
    values.iter().any(|v| v.abs() > DEGREE_LIMIT)
}

fn matches_canonical_mercator(values: &[f64; 4], policy: &BoundsPolicy) -> bool {
    let canonical = policy.canonical_mercator_extent();
    values
        .iter()
        .zip(canonical.iter())
        .all(|(v, c)| (v - c).abs() <= policy.mercator_tolerance_m)
}
