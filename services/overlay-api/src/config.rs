//! Service configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cog_source::DEFAULT_BUCKET;
use raster_engine::EngineConfig;
use renderer::{Palette, PaletteConfig};

/// Everything the service needs besides its listen address.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the S3-compatible object store.
    pub storage_endpoint: String,

    /// Default bucket for friendly dataset paths.
    pub bucket: String,

    /// Optional palette JSON file; the built-in palette is used otherwise.
    pub palette_file: Option<PathBuf>,

    /// Root for relative local paths.
    pub data_root: Option<PathBuf>,

    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage_endpoint: "http://localhost:9000".to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            palette_file: None,
            data_root: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load the configured palette, if any.
    pub fn load_palette(&self) -> Result<Option<Palette>> {
        let Some(path) = &self.palette_file else {
            return Ok(None);
        };

        let config = PaletteConfig::from_file(path)
            .with_context(|| format!("Failed to read palette file: {}", path.display()))?;
        let palette = config
            .to_palette()
            .with_context(|| format!("Invalid palette in {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            name = config.name.as_deref().unwrap_or("unnamed"),
            stops = palette.stops().len(),
            "Loaded palette"
        );
        Ok(Some(palette))
    }
}
