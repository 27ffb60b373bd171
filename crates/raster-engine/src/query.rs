//! Point query against a [`RasterDataset`].

use crate::dataset::RasterDataset;
use geo_common::GridSpacing;
use projection::lat_to_mercator_y;

/// Value of the pixel under `(lng, lat)`, rounded to two decimals.
///
/// Returns `None` outside the dataset bounds or on a no-data sample. The
/// east and south edges belong to the last column and row. Runs on the
/// pointer-move path: no allocation, no logging.
pub fn query(dataset: &RasterDataset, lng: f64, lat: f64) -> Option<f64> {
    let (x, y) = pixel_at(dataset, lng, lat)?;
    let value = dataset.sample(x, y)?;

    if dataset.classifier().is_nodata(value) {
        return None;
    }

    Some((value as f64 * 100.0).round() / 100.0)
}

/// Column and row of the pixel containing `(lng, lat)`.
pub fn pixel_at(dataset: &RasterDataset, lng: f64, lat: f64) -> Option<(usize, usize)> {
    let b = dataset.bounds();
    if !(lng.is_finite() && lat.is_finite()) {
        return None;
    }
    if lng < b.min_lon || lng > b.max_lon || lat < b.min_lat || lat > b.max_lat {
        return None;
    }

    let x_ratio = (lng - b.min_lon) / (b.max_lon - b.min_lon);
    let y_ratio = match dataset.spacing() {
        GridSpacing::LinearLatitude => (b.max_lat - lat) / (b.max_lat - b.min_lat),
        GridSpacing::LinearMercator => {
            let north = lat_to_mercator_y(b.max_lat);
            let south = lat_to_mercator_y(b.min_lat);
            (north - lat_to_mercator_y(lat)) / (north - south)
        }
    };

    let width = dataset.width();
    let height = dataset.height();
    let x = ((x_ratio * width as f64).floor().max(0.0) as usize).min(width - 1);
    let y = ((y_ratio * height as f64).floor().max(0.0) as usize).min(height - 1);
    Some((x, y))
}
