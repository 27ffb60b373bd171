//! Coordinate Reference System types.
//!
//! Only two systems are modelled: geographic WGS84 and spherical Web
//! Mercator. Anything else a raster declares is folded into one of these or
//! reported as [`SourceProjection::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known CRS codes a display target can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
}

impl CrsCode {
    /// Parse a CRS string such as "EPSG:3857".
    ///
    /// Accepts:
    /// - "EPSG:4326" / "CRS:84"
    /// - "EPSG:3857" / "EPSG:900913"
    pub fn from_crs_string(s: &str) -> Result<Self, CrsParseError> {
        match s.trim().to_uppercase().as_str() {
            "EPSG:4326" | "CRS:84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Check if this is a geographic (lon/lat) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg3857 => "EPSG:3857",
        };
        write!(f, "{}", code)
    }
}

/// The projection a raster's samples were gridded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceProjection {
    /// Equirectangular lon/lat grid.
    Geographic,
    /// Spherical Web Mercator grid (meters).
    Mercator,
    /// Could not be determined; never reprojected.
    Unknown,
}

impl fmt::Display for SourceProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceProjection::Geographic => "geographic",
            SourceProjection::Mercator => "mercator",
            SourceProjection::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// GeoTIFF `GTModelTypeGeoKey` values that matter for detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    Projected,
    Geographic,
}

impl ModelType {
    /// Map a raw GeoKey value (1 = projected, 2 = geographic).
    pub fn from_geokey(value: u16) -> Option<Self> {
        match value {
            1 => Some(ModelType::Projected),
            2 => Some(ModelType::Geographic),
            _ => None,
        }
    }
}

/// How pixel rows are spaced between a dataset's north and south edges.
///
/// Columns are always linear in longitude. Rows are linear either in
/// latitude (an equirectangular grid) or in Mercator `y` (a grid that lines
/// up with a Web Mercator basemap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSpacing {
    LinearLatitude,
    LinearMercator,
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
