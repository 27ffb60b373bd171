//! Slippy-map tile math.

use geo_common::BoundingBox;
use std::f64::consts::PI;

/// Geographic bounds of tile `(z, x, y)`, with `y` counted from the north.
pub fn tile_bounds(z: u32, x: u32, y: u32) -> BoundingBox {
    let n = 2_u32.pow(z) as f64;

    let lon_min = x as f64 / n * 360.0 - 180.0;
    let lon_max = (x + 1) as f64 / n * 360.0 - 180.0;

    let lat_max = row_edge_latitude(y as f64, n);
    let lat_min = row_edge_latitude((y + 1) as f64, n);

    BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
}

/// Tile containing `(lon, lat)` at zoom `z`.
pub fn tile_for_point(lon: f64, lat: f64, z: u32) -> (u32, u32) {
    let n = 2_u32.pow(z) as f64;

    let x = ((lon + 180.0) / 360.0 * n).floor().max(0.0) as u32;
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor().max(0.0) as u32;

    (x.min(n as u32 - 1), y.min(n as u32 - 1))
}

fn row_edge_latitude(row: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * row / n)).sinh().atan().to_degrees()
}
