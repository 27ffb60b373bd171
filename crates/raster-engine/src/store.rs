//! Named layers and their current render results.
//!
//! Each layer id owns a slot with two halves: a build lock, held for the
//! whole fetch and render so at most one build runs per layer, and the
//! published entry, swapped in when a build finishes. Readers go straight to
//! the published entry and only wait on the build lock while a layer has
//! never been published. Different layers never block each other.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::dataset::{RenderOptions, RenderResult};
use crate::engine::RasterEngine;
use crate::error::{RasterError, Result};
use crate::query::query;

#[derive(Default)]
struct LayerSlot {
    build: Arc<Mutex<()>>,
    published: RwLock<Option<LayerEntry>>,
}

impl LayerSlot {
    async fn current(&self) -> Option<LayerEntry> {
        self.published.read().await.clone()
    }

    /// The published entry, waiting for a first build if one is running.
    async fn settled(&self) -> Option<LayerEntry> {
        if let Some(entry) = self.current().await {
            return Some(entry);
        }
        let _build = self.build.lock().await;
        self.current().await
    }

    async fn publish(&self, entry: LayerEntry) {
        *self.published.write().await = Some(entry);
    }
}

type Slot = Arc<LayerSlot>;

/// A loaded layer: where it came from and what it currently shows.
#[derive(Debug, Clone)]
pub struct LayerEntry {
    pub url: String,
    pub options: RenderOptions,
    pub result: Arc<RenderResult>,
}

/// Serializable summary of a layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub id: String,
    pub url: String,
    pub width: usize,
    pub height: usize,
    pub bounds: [f64; 4],
    pub corners: [(f64, f64); 4],
    pub domain: (f32, f32),
    pub value_range: Option<(f32, f32)>,
    pub source_projection: geo_common::SourceProjection,
    pub options: RenderOptions,
}

impl LayerEntry {
    pub fn summary(&self, id: &str) -> LayerSummary {
        let dataset = &self.result.dataset;
        LayerSummary {
            id: id.to_string(),
            url: self.url.clone(),
            width: dataset.width(),
            height: dataset.height(),
            bounds: dataset.bounds().to_array(),
            corners: self.result.corners(),
            domain: self.result.domain,
            value_range: dataset.value_range(),
            source_projection: dataset.source_projection(),
            options: self.options,
        }
    }
}

/// Layer registry backed by a [`RasterEngine`].
#[derive(Clone)]
pub struct LayerStore {
    engine: RasterEngine,
    layers: Arc<RwLock<HashMap<String, Slot>>>,
}

impl LayerStore {
    pub fn new(engine: RasterEngine) -> Self {
        Self {
            engine,
            layers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn engine(&self) -> &RasterEngine {
        &self.engine
    }

    async fn slot(&self, id: &str) -> Slot {
        if let Some(slot) = self.layers.read().await.get(id) {
            return Arc::clone(slot);
        }
        let mut layers = self.layers.write().await;
        Arc::clone(layers.entry(id.to_string()).or_default())
    }

    async fn is_current(&self, id: &str, slot: &Slot) -> bool {
        self.layers
            .read()
            .await
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Drop `slot` if it is still registered for `id` and was never
    /// published.
    async fn discard_if_empty(&self, id: &str, slot: &Slot) {
        let mut layers = self.layers.write().await;
        let unpublished = slot.published.read().await.is_none();
        if unpublished && layers.get(id).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            layers.remove(id);
            debug!(layer = %id, "Discarded empty layer slot");
        }
    }

    async fn existing_slot(&self, id: &str) -> Result<Slot> {
        self.layers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RasterError::LayerNotFound(id.to_string()))
    }

    /// Load (or reload) layer `id` from `url`.
    ///
    /// * Same URL and same options: the current result is returned as is.
    /// * Same URL and same no-data options: the existing dataset is
    ///   re-rendered, nothing is fetched or rebuilt.
    /// * Anything else: full load and rebuild.
    ///
    /// The previous result stays readable while the build runs. On failure
    /// it stays in place; a layer that never loaded is forgotten.
    pub async fn load(&self, id: &str, url: &str, options: RenderOptions) -> Result<Arc<RenderResult>> {
        options.validate()?;

        let (slot, _build) = loop {
            let slot = self.slot(id).await;
            let build = Arc::clone(&slot.build).lock_owned().await;
            // A failed first load or a remove may have retired this slot
            // while we waited for it.
            if self.is_current(id, &slot).await {
                break (slot, build);
            }
        };

        let outcome = self.build_entry(id, url, options, slot.current().await).await;
        match outcome {
            Ok(entry) => {
                let result = Arc::clone(&entry.result);
                slot.publish(entry).await;
                Ok(result)
            }
            Err(e) => {
                self.discard_if_empty(id, &slot).await;
                Err(e)
            }
        }
    }

    async fn build_entry(
        &self,
        id: &str,
        url: &str,
        options: RenderOptions,
        previous: Option<LayerEntry>,
    ) -> Result<LayerEntry> {
        if let Some(entry) = previous {
            if entry.url == url && entry.options == options {
                debug!(layer = %id, "Layer unchanged, reusing render");
                return Ok(entry);
            }

            if entry.url == url && options.same_dataset(&entry.options) {
                let engine = self.engine.clone();
                let dataset = Arc::clone(&entry.result.dataset);
                let rendered =
                    tokio::task::spawn_blocking(move || engine.render(dataset, &options)).await??;
                debug!(layer = %id, "Layer re-rendered with new options");
                return Ok(LayerEntry {
                    url: url.to_string(),
                    options,
                    result: Arc::new(rendered),
                });
            }
        }

        let result = Arc::new(self.engine.load_and_process(url, &options).await?);
        info!(layer = %id, url = %url, "Layer loaded");
        Ok(LayerEntry {
            url: url.to_string(),
            options,
            result,
        })
    }

    /// Current entry for `id`.
    ///
    /// Returns the published entry immediately, even while a reload is in
    /// flight; waits only for a layer's first build.
    pub async fn get(&self, id: &str) -> Result<LayerEntry> {
        let slot = self.existing_slot(id).await?;
        slot.settled()
            .await
            .ok_or_else(|| RasterError::LayerNotFound(id.to_string()))
    }

    /// Query layer `id` at `(lng, lat)`.
    pub async fn query(&self, id: &str, lng: f64, lat: f64) -> Result<Option<f64>> {
        let entry = self.get(id).await?;
        Ok(query(&entry.result.dataset, lng, lat))
    }

    /// Drop layer `id`.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let slot = self
            .layers
            .write()
            .await
            .remove(id)
            .ok_or_else(|| RasterError::LayerNotFound(id.to_string()))?;

        if slot.settled().await.is_some() {
            info!(layer = %id, "Layer removed");
            Ok(())
        } else {
            Err(RasterError::LayerNotFound(id.to_string()))
        }
    }

    /// All published layers, sorted by id.
    pub async fn entries(&self) -> Vec<(String, LayerEntry)> {
        let slots: Vec<(String, Slot)> = self
            .layers
            .read()
            .await
            .iter()
            .map(|(id, slot)| (id.clone(), Arc::clone(slot)))
            .collect();

        let mut entries = Vec::with_capacity(slots.len());
        for (id, slot) in slots {
            if let Some(entry) = slot.current().await {
                entries.push((id, entry));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub async fn layer_ids(&self) -> Vec<String> {
        self.entries().await.into_iter().map(|(id, _)| id).collect()
    }

    /// Number of registered slots, including layers whose first build is
    /// still running.
    pub async fn slot_count(&self) -> usize {
        self.layers.read().await.len()
    }
}
