//! Error types for rendering.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Image has zero width or height")]
    EmptyImage,

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}
