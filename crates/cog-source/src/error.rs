//! Error types for fetching and decoding rasters.

use thiserror::Error;

/// Errors that can occur while obtaining a decoded raster.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// A local file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable TIFF.
    #[error("TIFF decode error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// The TIFF decoded but its contents are unusable.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// No source handles this kind of location.
    #[error("unsupported location: {0}")]
    UnsupportedLocation(String),

    /// The blocking decode task panicked or was cancelled.
    #[error("decode task failed: {0}")]
    Task(String),
}

impl SourceError {
    /// Create an InvalidRaster error.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Create an Io error for `path`.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for SourceError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type for raster source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
