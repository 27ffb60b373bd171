//! Raster georeferencing, reprojection and pixel query for map overlays.
//!
//! Takes a decoded raster whose coordinate metadata may be incomplete or
//! inconsistent, works out where it really sits on the globe, and produces
//! one immutable [`RasterDataset`] that both the colormap renderer and the
//! point query read. Because both consumers share the same samples, bounds
//! and row spacing, what is drawn at a pixel and what a query reports there
//! always agree.
//!
//! # Architecture
//!
//! ```text
//! RasterEngine::load_and_process(url, options)
//!      │
//!      ├─► DecodedRasterCache ──miss──► RasterSource::fetch
//!      │
//!      ▼
//! RasterEngine::build_dataset
//!      │
//!      ├─► detect_projection (GeoKeys, model type, magnitudes)
//!      ├─► normalize_bounds  (always well-formed WGS84)
//!      └─► reproject_to_mercator (geographic source, Mercator display)
//!               │
//!               ▼
//!        Arc<RasterDataset>
//!          │            │
//!          ▼            ▼
//!   RasterEngine::   query(dataset, lng, lat)
//!   render (RGBA)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cog_source::PathResolver;
//! use raster_engine::{query, EngineConfig, RasterEngine, RenderOptions};
//!
//! // Friendly dataset paths must be resolved to a URL first.
//! let resolver = PathResolver::new("https://storage.example.com", "planeo");
//! let url = resolver.resolve("pathogens/cholera.tif")?;
//!
//! let engine = RasterEngine::from_config(EngineConfig::from_env())?;
//! let result = engine
//!     .load_and_process(&url, &RenderOptions::default())
//!     .await?;
//!
//! let value = query(&result.dataset, 12.5, 41.9);
//! ```

pub mod cache;
pub mod config;
pub mod dataset;
pub mod detect;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod query;
pub mod reproject;
pub mod store;

pub use cache::{DecodedCacheStats, DecodedRasterCache};
pub use config::{BoundsPolicy, EngineConfig, NoDataConfig, DEFAULT_CANONICAL_LAT};
pub use dataset::{RasterDataset, RenderOptions, RenderResult};
pub use detect::{detect_projection, detect_projection_with_rule, DetectionRule};
pub use engine::RasterEngine;
pub use error::{RasterError, Result};
pub use normalize::normalize_bounds;
pub use query::query;
pub use reproject::{reproject_to_mercator, ResampledGrid};
pub use store::{LayerEntry, LayerStore, LayerSummary};
