//! Application state for the overlay API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cog_source::{DefaultSource, HttpSource, LocalSource, PathResolver};
use raster_engine::{LayerStore, RasterEngine};

use crate::config::ServiceConfig;

/// Shared application state.
pub struct AppState {
    /// Loaded layers and the engine behind them.
    pub store: LayerStore,

    /// Friendly dataset paths to object-store URLs.
    pub resolver: PathResolver,

    pub config: ServiceConfig,
}

impl AppState {
    /// Build state from configuration: validate it, load the palette and
    /// wire up HTTP and local raster sources.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config
            .engine
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid engine configuration")?;

        let http = HttpSource::new(Duration::from_secs(config.engine.fetch_timeout_secs))
            .context("Failed to build HTTP client")?;
        let local = match &config.data_root {
            Some(root) => LocalSource::with_root(root),
            None => LocalSource::new(),
        };
        let source = Arc::new(DefaultSource::new(http, local));

        let mut engine = RasterEngine::new(config.engine.clone(), source);
        if let Some(palette) = config.load_palette()? {
            engine = engine.with_palette(palette);
        }

        Ok(Self::with_engine(config, engine))
    }

    /// Build state around an existing engine.
    pub fn with_engine(config: ServiceConfig, engine: RasterEngine) -> Self {
        let resolver = PathResolver::new(&config.storage_endpoint, &config.bucket);
        Self {
            store: LayerStore::new(engine),
            resolver,
            config,
        }
    }
}
