//! Raster source for the overlay engine.
//!
//! Turns a URL or local path into a [`DecodedRaster`]: the first band of the
//! first image as `f32`, plus whatever georeferencing the file carries.
//!
//! ```text
//! url ──► PathResolver ──► RasterSource::fetch
//!                             ├─ HttpSource  (reqwest)
//!                             └─ LocalSource (tokio::fs)
//!                                   │ bytes
//!                                   ▼
//!                             decode_geotiff (tiff, blocking pool)
//!                                   │
//!                                   ▼
//!                             DecodedRaster
//! ```

pub mod error;
pub mod geotiff;
pub mod resolver;
pub mod source;
pub mod types;

pub use error::{Result, SourceError};
pub use geotiff::decode_geotiff;
pub use resolver::{PathResolver, DEFAULT_BUCKET};
pub use source::{DefaultSource, HttpSource, LocalSource, RasterSource};
pub use types::{CrsHints, DecodedRaster};
