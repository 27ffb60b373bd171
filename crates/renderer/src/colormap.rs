//! Colormap rendering for gridded raster samples.
//!
//! Each sample is classified first: no-data becomes a fully transparent
//! pixel, everything else is normalized against a domain and colored by
//! linear interpolation between the two bracketing palette stops. Zero is a
//! legitimate value and is always colored.

use crate::palette::PaletteError;
use geo_common::NoDataClassifier;
use rayon::prelude::*;

/// Viridis, sampled at nine evenly spaced positions.
pub const DEFAULT_PALETTE: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 45, 123],
    [59, 82, 139],
    [44, 114, 142],
    [33, 145, 140],
    [40, 174, 128],
    [94, 201, 98],
    [173, 220, 48],
    [253, 231, 37],
];

/// Fixed color used for every valid sample in debug mode.
pub const DEBUG_COLOR: Color = Color::new(255, 0, 255, 255);

/// Domains narrower than this are treated as a single value.
const MIN_DOMAIN_WIDTH: f32 = 1e-6;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear color interpolation, `t` clamped to `[0, 1]`.
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// An ordered table of at least two RGB stops, evenly spaced over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<[u8; 3]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            stops: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(stops: Vec<[u8; 3]>) -> Result<Self, PaletteError> {
        if stops.len() < 2 {
            return Err(PaletteError::TooFewStops(stops.len()));
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[[u8; 3]] {
        &self.stops
    }

    /// Color at normalized position `t`.
    ///
    /// `t` maps to a fractional index into the stop table; the result is the
    /// linear blend of the two stops around it.
    pub fn color_at(&self, t: f32) -> Color {
        let last = self.stops.len() - 1;
        let pos = t.clamp(0.0, 1.0) * last as f32;
        let lower = (pos.floor() as usize).min(last - 1);
        let frac = pos - lower as f32;

        interpolate_color(
            Color::opaque(self.stops[lower]),
            Color::opaque(self.stops[lower + 1]),
            frac,
        )
    }
}

/// Render samples as RGBA pixels (4 bytes per sample, same order).
///
/// # Arguments
/// - `samples`: Row-major sample buffer
/// - `domain`: `(min, max)` mapped onto the first and last stop
/// - `palette`: Stop table to interpolate
/// - `classifier`: Decides which samples are transparent
/// - `debug`: Paint every valid sample with [`DEBUG_COLOR`] instead
pub fn render_rgba(
    samples: &[f32],
    domain: (f32, f32),
    palette: &Palette,
    classifier: &NoDataClassifier,
    debug: bool,
) -> Vec<u8> {
    let (min_val, max_val) = domain;
    let range = max_val - min_val;
    let degenerate = !(range.abs() >= MIN_DOMAIN_WIDTH);

    let mut pixels = vec![0u8; samples.len() * 4];

    pixels
        .par_chunks_mut(4)
        .zip(samples.par_iter())
        .for_each(|(pixel, &value)| {
            let color = if classifier.is_nodata(value) {
                Color::transparent()
            } else if debug {
                DEBUG_COLOR
            } else if degenerate {
                palette.color_at(0.0)
            } else {
                palette.color_at((value - min_val) / range)
            };
            pixel.copy_from_slice(&color.to_bytes());
        });

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::new(0, 0, 0, 255), Color::new(255, 100, 10, 255), 0.5);
        assert_eq!(c, Color::new(128, 50, 5, 255));
    }

    #[test]
    fn test_color_at_ends_hit_stops() {
        let palette = Palette::default();
        assert_eq!(palette.color_at(0.0), Color::opaque(DEFAULT_PALETTE[0]));
        assert_eq!(palette.color_at(1.0), Color::opaque(DEFAULT_PALETTE[8]));
        assert_eq!(palette.color_at(-3.0), Color::opaque(DEFAULT_PALETTE[0]));
        assert_eq!(palette.color_at(7.0), Color::opaque(DEFAULT_PALETTE[8]));
    }

    #[test]
    fn test_color_at_interior_stop() {
        let palette = Palette::default();
        assert_eq!(palette.color_at(0.5), Color::opaque(DEFAULT_PALETTE[4]));
    }

    #[test]
    fn test_palette_needs_two_stops() {
        assert!(Palette::new(vec![[0, 0, 0]]).is_err());
        assert!(Palette::new(vec![[0, 0, 0], [255, 255, 255]]).is_ok());
    }
}
