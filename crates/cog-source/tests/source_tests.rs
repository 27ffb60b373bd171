//! Raster source tests using on-disk fixtures.

use cog_source::{DefaultSource, LocalSource, RasterSource, SourceError};
use std::time::Duration;
use test_utils::{bbox, uniform_grid, GeoTiffBuilder};

#[tokio::test]
async fn test_local_source_reads_file() {
    let file = GeoTiffBuilder::f32(10, 5, uniform_grid(10, 5, 2.5))
        .bounds(bbox::AFRICA_EUROPE)
        .geographic_code(4326)
        .build_temp_file();

    let raster = LocalSource::new()
        .fetch(file.path().to_str().unwrap())
        .await
        .unwrap();
    assert_eq!((raster.width, raster.height), (10, 5));
    assert_eq!(raster.hints.geographic_code, Some(4326));
}

#[tokio::test]
async fn test_local_source_with_root_and_file_url() {
    let dir = tempfile::tempdir().unwrap();
    GeoTiffBuilder::f32(3, 3, uniform_grid(3, 3, 1.0)).write_to(dir.path().join("a.tif"));

    let source = LocalSource::with_root(dir.path());
    assert_eq!(source.fetch("a.tif").await.unwrap().width, 3);

    let url = format!("file://{}", dir.path().join("a.tif").display());
    let raster = DefaultSource::from_timeout(Duration::from_secs(1))
        .unwrap()
        .fetch(&url)
        .await
        .unwrap();
    assert_eq!(raster.height, 3);
}

#[tokio::test]
async fn test_missing_file() {
    let err = LocalSource::new()
        .fetch("/nonexistent/raster.tif")
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[tokio::test]
async fn test_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.tif");
    std::fs::write(&path, b"II*\0garbage").unwrap();

    let result = LocalSource::new().fetch(path.to_str().unwrap()).await;
    assert!(result.is_err());
}
