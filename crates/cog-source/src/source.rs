//! Raster sources: where raster bytes come from.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{Result, SourceError};
use crate::geotiff::decode_geotiff;
use crate::types::DecodedRaster;

/// Trait for anything that can turn a location into a decoded raster.
///
/// Implementations do their I/O asynchronously and push the CPU-bound TIFF
/// decode onto the blocking pool.
#[async_trait]
pub trait RasterSource: Send + Sync {
    /// Fetch and decode the raster at `url`.
    ///
    /// # Returns
    /// * `DecodedRaster` holding band 0 and the file's georeferencing
    async fn fetch(&self, url: &str) -> Result<DecodedRaster>;
}

/// Decode on the blocking pool.
async fn decode_blocking(bytes: Bytes) -> Result<DecodedRaster> {
    tokio::task::spawn_blocking(move || decode_geotiff(&bytes)).await?
}

/// Fetches rasters over HTTP(S).
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cog-overlay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RasterSource for HttpSource {
    #[instrument(skip(self), fields(source = "http"))]
    async fn fetch(&self, url: &str) -> Result<DecodedRaster> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, bytes = bytes.len(), "Downloaded raster");

        decode_blocking(bytes).await
    }
}

/// Reads rasters from the local filesystem (plain paths or `file://` URLs).
#[derive(Debug, Clone, Default)]
pub struct LocalSource {
    root: Option<PathBuf>,
}

impl LocalSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location.strip_prefix("file://").unwrap_or(location));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

#[async_trait]
impl RasterSource for LocalSource {
    #[instrument(skip(self), fields(source = "local"))]
    async fn fetch(&self, url: &str) -> Result<DecodedRaster> {
        let path = self.resolve(url);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read raster file");

        decode_blocking(Bytes::from(bytes)).await
    }
}

/// Dispatches by scheme: `http(s)://` goes to [`HttpSource`], everything
/// else (plain paths, `file://`) to [`LocalSource`].
#[derive(Clone)]
pub struct DefaultSource {
    http: HttpSource,
    local: LocalSource,
}

impl DefaultSource {
    pub fn new(http: HttpSource, local: LocalSource) -> Self {
        Self { http, local }
    }

    pub fn from_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::new(HttpSource::new(timeout)?, LocalSource::new()))
    }
}

#[async_trait]
impl RasterSource for DefaultSource {
    async fn fetch(&self, url: &str) -> Result<DecodedRaster> {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            self.http.fetch(url).await
        } else if lower.contains("://") && !lower.starts_with("file://") {
            Err(SourceError::UnsupportedLocation(url.to_string()))
        } else {
            self.local.fetch(url).await
        }
    }
}
