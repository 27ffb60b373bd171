//! Load, georeference and render a raster in one pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cog_source::{DecodedRaster, DefaultSource, RasterSource};
use geo_common::{BoundingBox, GridSpacing, SourceProjection};
use projection::clamp_latitude;
use renderer::{render_rgba, Palette};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::cache::DecodedRasterCache;
use crate::config::EngineConfig;
use crate::dataset::{RasterDataset, RenderOptions, RenderResult};
use crate::detect::detect_projection_with_rule;
use crate::error::{RasterError, Result};
use crate::normalize::normalize_bounds;
use crate::reproject::reproject_to_mercator;

/// Colormap domain used when a raster has no valid samples at all.
const EMPTY_DOMAIN: (f32, f32) = (0.0, 1.0);

/// Raster pipeline: fetch → detect → normalize → reproject → render.
///
/// Cheap to clone; clones share the source, cache and palette.
#[derive(Clone)]
pub struct RasterEngine {
    config: Arc<EngineConfig>,
    source: Arc<dyn RasterSource>,
    cache: DecodedRasterCache,
    in_flight: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    palette: Arc<Palette>,
}

impl RasterEngine {
    pub fn new(config: EngineConfig, source: Arc<dyn RasterSource>) -> Self {
        let cache = DecodedRasterCache::new(config.decoded_cache_capacity);
        Self {
            config: Arc::new(config),
            source,
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            palette: Arc::new(Palette::default()),
        }
    }

    /// Validate `config` and build an engine over HTTP and local files.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate().map_err(RasterError::Config)?;
        let source = DefaultSource::from_timeout(Duration::from_secs(config.fetch_timeout_secs))
            .map_err(|e| RasterError::Config(e.to_string()))?;
        Ok(Self::new(config, Arc::new(source)))
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Arc::new(palette);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn cache(&self) -> &DecodedRasterCache {
        &self.cache
    }

    /// Fetch and decode `url`, going through the decoded-raster cache.
    ///
    /// Concurrent misses on the same URL share one download: later callers
    /// wait for the fetch in flight and read its result from the cache. If
    /// that fetch failed, the next waiter tries again.
    pub async fn fetch(&self, url: &str) -> Result<DecodedRaster> {
        if let Some(raster) = self.cache.get(url).await {
            debug!(url = %url, "Decoded raster cache hit");
            return Ok(raster);
        }

        let flight = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(url.to_string()).or_default())
        };
        let _guard = flight.lock().await;

        if let Some(raster) = self.cache.peek(url).await {
            debug!(url = %url, "Joined in-flight fetch");
            return Ok(raster);
        }

        let fetched = self.source.fetch(url).await;
        if let Ok(raster) = &fetched {
            self.cache.insert(url.to_string(), raster.clone()).await;
        }

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.get(url).is_some_and(|f| Arc::ptr_eq(f, &flight)) {
                in_flight.remove(url);
            }
        }

        fetched.map_err(|e| RasterError::decode(url, e))
    }

    /// Fetch, build and render in one go.
    ///
    /// Only the fetch suspends; the CPU-bound build and render run on the
    /// blocking pool.
    #[instrument(skip(self, options))]
    pub async fn load_and_process(&self, url: &str, options: &RenderOptions) -> Result<RenderResult> {
        options.validate()?;
        let start = Instant::now();

        let raster = self.fetch(url).await?;

        let engine = self.clone();
        let options = *options;
        let url_owned = url.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let dataset = engine
                .build_dataset(&raster, &options)
                .map_err(|e| match e {
                    RasterError::InvalidDataset(msg) => RasterError::decode(&url_owned, msg),
                    other => other,
                })?;
            engine.render(Arc::new(dataset), &options)
        })
        .await??;

        info!(
            url = %url,
            width = result.width(),
            height = result.height(),
            projection = %result.dataset.source_projection(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Raster layer ready"
        );

        Ok(result)
    }

    /// Georeference a decoded raster.
    ///
    /// Never fails on geometry: undetectable CRS or broken bounds fall back
    /// to the canonical extent. Fails only if the sample buffer does not
    /// match the dimensions.
    pub fn build_dataset(&self, raster: &DecodedRaster, options: &RenderOptions) -> Result<RasterDataset> {
        let raw = raster.raw_bounds.as_deref();
        let (projection, rule) = detect_projection_with_rule(raw, &raster.hints);
        debug!(%projection, %rule, "Detected source projection");

        let bounds = normalize_bounds(raw, projection, &self.config.bounds);
        let classifier = self
            .config
            .nodata
            .classifier(raster.nodata, options.nodata_threshold);

        if projection == SourceProjection::Geographic && self.config.reprojects_geographic() {
            if raster.samples.len() != raster.pixel_count() || raster.pixel_count() == 0 {
                return Err(RasterError::InvalidDataset(format!(
                    "{} samples for {}x{} pixels",
                    raster.samples.len(),
                    raster.width,
                    raster.height
                )));
            }

            let bounds = self.mercator_footprint(bounds);
            let grid = reproject_to_mercator(&raster.samples, raster.width, raster.height, &bounds);
            debug!(
                from_width = raster.width,
                from_height = raster.height,
                to_width = grid.width,
                to_height = grid.height,
                "Reprojected geographic raster to Web Mercator"
            );

            return RasterDataset::new(
                Arc::new(grid.samples),
                grid.width,
                grid.height,
                grid.bounds,
                projection,
                GridSpacing::LinearMercator,
                classifier,
            );
        }

        let spacing = if projection == SourceProjection::Mercator {
            GridSpacing::LinearMercator
        } else {
            GridSpacing::LinearLatitude
        };

        RasterDataset::new(
            Arc::clone(&raster.samples),
            raster.width,
            raster.height,
            bounds,
            projection,
            spacing,
            classifier,
        )
    }

    /// Source bounds for reprojection.
    ///
    /// A box lying wholly poleward of the Mercator latitude limit collapses
    /// to zero height once clamped; such rasters take the canonical extent.
    fn mercator_footprint(&self, bounds: BoundingBox) -> BoundingBox {
        let clamped = BoundingBox::new(
            bounds.min_lon,
            clamp_latitude(bounds.min_lat),
            bounds.max_lon,
            clamp_latitude(bounds.max_lat),
        );
        if clamped.is_well_formed() {
            return bounds;
        }

        warn!(
            south = bounds.min_lat,
            north = bounds.max_lat,
            "Raster lies outside the Mercator latitude range, using canonical tile extent"
        );
        self.config.bounds.canonical_extent()
    }

    /// Colormap an existing dataset.
    ///
    /// The domain is `options.rescale` if set, otherwise the dataset's value
    /// range. The dataset's own classifier decides transparency, so what is
    /// transparent here is exactly what [`crate::query`] reports as `None`.
    pub fn render(&self, dataset: Arc<RasterDataset>, options: &RenderOptions) -> Result<RenderResult> {
        options.validate()?;

        let domain = options
            .rescale
            .or_else(|| dataset.value_range())
            .unwrap_or(EMPTY_DOMAIN);

        let image = render_rgba(
            dataset.samples(),
            domain,
            &self.palette,
            dataset.classifier(),
            options.debug_mode,
        );

        Ok(RenderResult {
            image,
            dataset,
            domain,
            options: *options,
        })
    }
}
