//! Error types for the raster engine.

use thiserror::Error;

/// Errors that can occur while loading, building or rendering a raster.
///
/// Geometry problems (unknown CRS, broken bounds) are never errors; they
/// resolve to the canonical extent inside the normalizer.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The raster could not be fetched or parsed.
    #[error("failed to load raster {url}: {message}")]
    Decode { url: String, message: String },

    /// Caller-supplied options are unusable.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// No layer is registered under this id.
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// Sample buffer and dimensions disagree.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// PNG encoding failed.
    #[error("render failed: {0}")]
    Render(#[from] renderer::RenderError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A background build task failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RasterError {
    /// Create a Decode error for `url`.
    pub fn decode(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an InvalidOptions error.
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }

    /// HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Decode { .. } => 502,
            Self::InvalidOptions(_) => 400,
            Self::LayerNotFound(_) => 404,
            Self::InvalidDataset(_) | Self::Render(_) | Self::Config(_) | Self::Internal(_) => 500,
        }
    }
}

impl From<tokio::task::JoinError> for RasterError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type for raster engine operations.
pub type Result<T> = std::result::Result<T, RasterError>;
