//! Image rendering for single-band raster overlays.
//!
//! - Colormap: no-data aware, piecewise-linear palette interpolation
//! - Palette: JSON-configurable color stop tables
//! - PNG: RGBA encoding for the HTTP surface

pub mod colormap;
pub mod error;
pub mod palette;
pub mod png;

pub use colormap::{render_rgba, Color, Palette, DEBUG_COLOR, DEFAULT_PALETTE};
pub use error::RenderError;
pub use palette::{hex_to_rgb, PaletteConfig, PaletteError};
pub use png::encode_png;
