//! Synthetic raster generators.
//!
//! All grids are row-major, north row first, matching decoded rasters.

/// Every sample set to `value`.
pub fn uniform_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`, so every pixel
/// carries a distinct value that identifies where it came from.
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);  // col=1, row=0
/// assert_eq!(grid[10], 1.0);    // col=0, row=1
/// ```
pub fn create_index_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Prevalence-like values in `[0, 100]` rising from west to east.
///
/// Column 0 is exactly zero, which is valid data.
pub fn create_gradient_grid(width: usize, height: usize) -> Vec<f32> {
    let denom = width.saturating_sub(1).max(1) as f32;
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push(col as f32 / denom * 100.0);
        }
    }
    data
}

/// Replace every `stride`-th sample (starting at 0) with NaN.
pub fn with_nan_holes(mut data: Vec<f32>, stride: usize) -> Vec<f32> {
    for v in data.iter_mut().step_by(stride.max(1)) {
        *v = f32::NAN;
    }
    data
}

/// Replace every `stride`-th sample (starting at 0) with `sentinel`.
pub fn with_sentinels(mut data: Vec<f32>, stride: usize, sentinel: f32) -> Vec<f32> {
    for v in data.iter_mut().step_by(stride.max(1)) {
        *v = sentinel;
    }
    data
}
