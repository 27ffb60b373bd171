//! Common types shared across the COG overlay crates.

pub mod bbox;
pub mod crs;
pub mod nodata;

pub use bbox::{BboxParseError, BoundingBox};
pub use crs::{CrsCode, CrsParseError, GridSpacing, ModelType, SourceProjection};
pub use nodata::{NoDataClassifier, DEFAULT_MAGNITUDE_THRESHOLD, DEFAULT_SENTINELS};
