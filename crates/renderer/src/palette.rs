//! Palette configuration loaded from JSON.
//!
//! ```json
//! {
//!   "name": "prevalence",
//!   "stops": [
//!     { "color": "#ffffcc", "label": "low" },
//!     { "color": "#800026", "label": "high" }
//!   ]
//! }
//! ```

use crate::colormap::Palette;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("Palette needs at least 2 stops, got {0}")]
    TooFewStops(usize),

    #[error("Invalid hex color: {0}")]
    InvalidColor(String),

    #[error("Failed to read palette file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse palette JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Palette definition as stored on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaletteConfig {
    pub name: Option<String>,
    pub stops: Vec<PaletteStop>,
}

/// One color stop; position is implied by its index.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaletteStop {
    pub color: String,
    pub label: Option<String>,
}

impl PaletteConfig {
    /// Load palette configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, PaletteError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load palette configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Resolve hex colors into a validated [`Palette`].
    pub fn to_palette(&self) -> Result<Palette, PaletteError> {
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                hex_to_rgb(&stop.color)
                    .map(|(r, g, b)| [r, g, b])
                    .ok_or_else(|| PaletteError::InvalidColor(stop.color.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Palette::new(stops)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
