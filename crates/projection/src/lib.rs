//! Coordinate transformations between WGS84 and spherical Web Mercator.
//!
//! Implements the handful of projection formulas the overlay engine needs
//! from scratch without external dependencies.

pub mod mercator;
pub mod tile;

pub use mercator::{
    bbox_to_mercator, clamp_latitude, lat_to_mercator_y, lnglat_to_mercator, mercator_to_lnglat,
    mercator_y_to_lat, EARTH_RADIUS, MAX_EXTENT, MAX_LATITUDE,
};
pub use tile::{tile_bounds, tile_for_point};
