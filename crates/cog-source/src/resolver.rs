//! Friendly dataset paths to object-store URLs.
//!
//! Datasets live in an S3-compatible bucket under a fixed folder layout.
//! Clients may refer to them by a short path instead of a full URL:
//!
//! | Path                    | Object key                     |
//! |-------------------------|--------------------------------|
//! | `pathogens/<f>`         | `cogs/01_Pathogens/<f>`        |
//! | `risk-factors/<f>`      | `cogs/02_Risk_factors/<f>`     |
//! | `cogs333/<f>`           | `cogs333/<f>`                  |
//! | `<bucket>/<key>`        | `<key>` in the default bucket  |
//! | `r2/<bucket>/<key>`     | `<key>` in `<bucket>`          |
//!
//! URLs are built path-style: `{endpoint}/{bucket}/{key}`.

use crate::error::{Result, SourceError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUCKET: &str = "planeo";

/// Maps friendly paths onto `{endpoint}/{bucket}/{key}` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResolver {
    endpoint: String,
    bucket: String,
}

impl PathResolver {
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Resolve `location` to something a [`crate::RasterSource`] can fetch.
    ///
    /// Absolute URLs (`http://`, `https://`, `file://`) and absolute or
    /// explicitly relative filesystem paths are returned unchanged.
    pub fn resolve(&self, location: &str) -> Result<String> {
        let location = location.trim();
        if location.is_empty() {
            return Err(SourceError::UnsupportedLocation(location.to_string()));
        }
        if location.contains("://") || location.starts_with('/') || location.starts_with('.') {
            return Ok(location.to_string());
        }

        let (head, rest) = location
            .split_once('/')
            .ok_or_else(|| SourceError::UnsupportedLocation(location.to_string()))?;
        let rest = non_empty(rest, location)?;

        let (bucket, key) = match head {
            "pathogens" => (self.bucket.as_str(), format!("cogs/01_Pathogens/{}", rest)),
            "risk-factors" => (self.bucket.as_str(), format!("cogs/02_Risk_factors/{}", rest)),
            "cogs333" => (self.bucket.as_str(), format!("cogs333/{}", rest)),
            "r2" => {
                let (bucket, key) = rest
                    .split_once('/')
                    .ok_or_else(|| SourceError::UnsupportedLocation(location.to_string()))?;
                (bucket, non_empty(key, location)?.to_string())
            }
            head if head == self.bucket => (self.bucket.as_str(), rest.to_string()),
            _ => return Err(SourceError::UnsupportedLocation(location.to_string())),
        };

        Ok(format!("{}/{}/{}", self.endpoint, bucket, key))
    }
}

fn non_empty<'a>(part: &'a str, location: &str) -> Result<&'a str> {
    if part.is_empty() {
        Err(SourceError::UnsupportedLocation(location.to_string()))
    } else {
        Ok(part)
    }
}
