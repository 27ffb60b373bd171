//! Spherical Web Mercator (EPSG:3857).
//!
//! Forward and inverse transforms on a sphere of radius [`EARTH_RADIUS`].
//! Latitude is clamped to [`MAX_LATITUDE`] before projecting, which keeps the
//! forward transform finite at the poles.

use geo_common::BoundingBox;
use std::f64::consts::PI;

/// WGS84 semi-major axis, used as the sphere radius.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude at which the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051129;

/// Half the width of the Mercator square in meters (`R * PI`).
pub const MAX_EXTENT: f64 = 20037508.342789244;

/// Clamp latitude into the range the forward transform accepts.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Convert latitude (degrees) to Web Mercator Y (meters).
#[inline]
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    let lat_rad = clamp_latitude(lat).to_radians();
    ((PI / 4.0) + (lat_rad / 2.0)).tan().ln() * EARTH_RADIUS
}

/// Convert Web Mercator Y (meters) to latitude (degrees).
#[inline]
pub fn mercator_y_to_lat(y: f64) -> f64 {
    (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees()
}

/// Project `(lng, lat)` in degrees to `(x, y)` in meters.
#[inline]
pub fn lnglat_to_mercator(lng: f64, lat: f64) -> (f64, f64) {
    (lng.to_radians() * EARTH_RADIUS, lat_to_mercator_y(lat))
}

/// Unproject `(x, y)` in meters to `(lng, lat)` in degrees.
#[inline]
pub fn mercator_to_lnglat(x: f64, y: f64) -> (f64, f64) {
    ((x / EARTH_RADIUS).to_degrees(), mercator_y_to_lat(y))
}

/// Project a geographic bbox to `[min_x, min_y, max_x, max_y]` meters.
pub fn bbox_to_mercator(bbox: &BoundingBox) -> [f64; 4] {
    let (min_x, min_y) = lnglat_to_mercator(bbox.min_lon, bbox.min_lat);
    let (max_x, max_y) = lnglat_to_mercator(bbox.max_lon, bbox.max_lat);
    [min_x, min_y, max_x, max_y]
}
