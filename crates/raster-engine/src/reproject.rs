//! Resampling geographic grids onto Web Mercator.
//!
//! A source gridded in equal latitude steps drawn stretched onto a Mercator
//! basemap drifts north/south away from the equator. Resampling onto a grid
//! that is linear in Mercator y removes the drift; the output then carries
//! [`GridSpacing::LinearMercator`] so queries invert the same mapping.

use geo_common::BoundingBox;
use projection::{clamp_latitude, lat_to_mercator_y, mercator_y_to_lat, EARTH_RADIUS};
use rayon::prelude::*;

/// A grid resampled onto Web Mercator.
#[derive(Debug, Clone)]
pub struct ResampledGrid {
    pub samples: Vec<f32>,
    pub width: usize,
    pub height: usize,
    /// Bounds with latitudes clamped to the Mercator limit.
    pub bounds: BoundingBox,
}

/// Resample a grid that is linear in latitude onto one linear in Mercator y.
///
/// The output keeps roughly the same pixel count as the input, with an
/// aspect ratio matching the Mercator extent. Every output pixel takes the
/// nearest source sample under its center; centers falling outside the
/// source grid become NaN.
///
/// # Arguments
/// * `samples` - Row-major source samples, north row first
/// * `width`, `height` - Source dimensions
/// * `bounds` - Source bounds in degrees. Must reach into the Mercator
///   latitude range; a box wholly beyond ±85.051129° yields zero-height
///   output bounds.
pub fn reproject_to_mercator(
    samples: &[f32],
    width: usize,
    height: usize,
    bounds: &BoundingBox,
) -> ResampledGrid {
    let west = bounds.min_lon;
    let east = bounds.max_lon;
    let south = bounds.min_lat;
    let north = bounds.max_lat;

    let merc_west = west.to_radians() * EARTH_RADIUS;
    let merc_east = east.to_radians() * EARTH_RADIUS;
    let merc_south = lat_to_mercator_y(south);
    let merc_north = lat_to_mercator_y(north);

    let (out_width, out_height) = output_dimensions(
        width,
        height,
        merc_east - merc_west,
        merc_north - merc_south,
    );

    let mut output = vec![f32::NAN; out_width * out_height];

    output
        .par_chunks_mut(out_width)
        .enumerate()
        .for_each(|(oy, row)| {
            let my = merc_north - (oy as f64 + 0.5) / out_height as f64 * (merc_north - merc_south);
            let lat = mercator_y_to_lat(my);
            let v = (north - lat) / (north - south);
            if !(0.0..=1.0).contains(&v) {
                return;
            }
            let sy = ((v * height as f64).floor() as usize).min(height - 1);
            let source_row = &samples[sy * width..(sy + 1) * width];

            for (ox, out) in row.iter_mut().enumerate() {
                let mx = merc_west + (ox as f64 + 0.5) / out_width as f64 * (merc_east - merc_west);
                let lng = (mx / EARTH_RADIUS).to_degrees();
                let u = (lng - west) / (east - west);
                if !(0.0..=1.0).contains(&u) {
                    continue;
                }
                let sx = ((u * width as f64).floor() as usize).min(width - 1);
                *out = source_row[sx];
            }
        });

    ResampledGrid {
        samples: output,
        width: out_width,
        height: out_height,
        bounds: BoundingBox::new(west, clamp_latitude(south), east, clamp_latitude(north)),
    }
}

/// Output size preserving pixel count with the Mercator aspect ratio.
fn output_dimensions(width: usize, height: usize, merc_w: f64, merc_h: f64) -> (usize, usize) {
    let pixels = (width * height) as f64;
    let aspect = if merc_h > 0.0 && merc_w > 0.0 {
        merc_w / merc_h
    } else {
        width as f64 / height as f64
    };

    let out_width = ((pixels * aspect).sqrt().round() as usize).max(1);
    let out_height = ((pixels / aspect).sqrt().round() as usize).max(1);
    (out_width, out_height)
}
