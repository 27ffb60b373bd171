//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 degrees.
///
/// Field order matches the `(west, south, east, north)` convention used by
/// raster metadata and by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Build from a `[west, south, east, north]` array.
    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Build from a slice; `None` unless it holds exactly four values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [w, s, e, n] => Some(Self::new(*w, *s, *e, *n)),
            _ => None,
        }
    }

    /// Parse a query-string bbox: "west,south,east,north"
    pub fn from_query_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::from_array(values))
    }

    pub fn west(&self) -> f64 {
        self.min_lon
    }

    pub fn south(&self) -> f64 {
        self.min_lat
    }

    pub fn east(&self) -> f64 {
        self.max_lon
    }

    pub fn north(&self) -> f64 {
        self.max_lat
    }

    /// `[west, south, east, north]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Width in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Center point as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon < other.max_lon
            && self.max_lon > other.min_lon
            && self.min_lat < other.max_lat
            && self.max_lat > other.min_lat
    }

    /// All values finite, strictly ordered, and inside `[-180,180] x [-90,90]`.
    pub fn is_well_formed(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
            && self.min_lon < self.max_lon
            && self.min_lat < self.max_lat
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
            && self.min_lat >= -90.0
            && self.max_lat <= 90.0
    }

    /// Clamp each coordinate individually into the valid WGS84 range.
    ///
    /// Coordinates already in range are left untouched.
    pub fn clamp_to_valid(&self) -> Self {
        Self {
            min_lon: self.min_lon.clamp(-180.0, 180.0),
            min_lat: self.min_lat.clamp(-90.0, 90.0),
            max_lon: self.max_lon.clamp(-180.0, 180.0),
            max_lat: self.max_lat.clamp(-90.0, 90.0),
        }
    }

    /// Swap reversed corners so that min <= max on both axes.
    pub fn ordered(&self) -> Self {
        Self {
            min_lon: self.min_lon.min(self.max_lon),
            min_lat: self.min_lat.min(self.max_lat),
            max_lon: self.min_lon.max(self.max_lon),
            max_lat: self.min_lat.max(self.max_lat),
        }
    }

    /// Image corners for the display layer as `(lon, lat)` pairs, in the
    /// order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_lon, self.max_lat),
            (self.max_lon, self.max_lat),
            (self.max_lon, self.min_lat),
            (self.min_lon, self.min_lat),
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bbox format: {0}. Expected 'west,south,east,north'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_bbox() {
        let bbox = BoundingBox::from_query_string("-125.0, 24.0,-66.0,50.0").unwrap();
        assert_eq!(bbox.min_lon, -125.0);
        assert_eq!(bbox.min_lat, 24.0);
        assert_eq!(bbox.max_lon, -66.0);
        assert_eq!(bbox.max_lat, 50.0);
    }

    #[test]
    fn test_from_slice_requires_four_values() {
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0]).is_none());
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
        assert_eq!(
            BoundingBox::from_slice(&[1.0, 2.0, 3.0, 4.0]),
            Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn test_clamp_only_touches_out_of_range() {
        let bbox = BoundingBox::new(-200.0, -35.0, 55.0, 95.0).clamp_to_valid();
        assert_eq!(bbox.to_array(), [-180.0, -35.0, 55.0, 90.0]);
    }

    #[test]
    fn test_corner_order() {
        let bbox = BoundingBox::new(-20.0, -35.0, 55.0, 40.0);
        let [tl, tr, br, bl] = bbox.corners();
        assert_eq!(tl, (-20.0, 40.0));
        assert_eq!(tr, (55.0, 40.0));
        assert_eq!(br, (55.0, -35.0));
        assert_eq!(bl, (-20.0, -35.0));
    }
}
