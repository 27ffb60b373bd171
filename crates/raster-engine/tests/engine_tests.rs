//! End-to-end engine scenarios over on-disk GeoTIFF fixtures.

use std::sync::Arc;

use cog_source::LocalSource;
use geo_common::{GridSpacing, SourceProjection};
use raster_engine::{query, EngineConfig, RasterEngine, RasterError, RenderOptions, RenderResult};
use test_utils::{
    assert_approx_eq, assert_bounds_approx_eq, bbox, create_gradient_grid, uniform_grid,
    with_nan_holes, GeoTiffBuilder,
};

fn engine() -> RasterEngine {
    RasterEngine::new(EngineConfig::default(), Arc::new(LocalSource::new()))
}

async fn load(builder: GeoTiffBuilder, options: RenderOptions) -> RenderResult {
    let file = builder.build_temp_file();
    engine()
        .load_and_process(file.path().to_str().unwrap(), &options)
        .await
        .unwrap()
}

fn alpha(result: &RenderResult, x: usize, y: usize) -> u8 {
    result.image[(y * result.width() + x) * 4 + 3]
}

#[tokio::test]
async fn test_mercator_tile_band_snaps_to_canonical() {
    let result = load(
        GeoTiffBuilder::f32(64, 32, create_gradient_grid(64, 32))
            .bounds(bbox::MERCATOR_TILE_BAND)
            .projected_code(3857),
        RenderOptions::default(),
    )
    .await;

    let ds = &result.dataset;
    assert_eq!(ds.source_projection(), SourceProjection::Mercator);
    assert_eq!(ds.spacing(), GridSpacing::LinearMercator);
    assert_eq!((ds.width(), ds.height()), (64, 32));
    assert_bounds_approx_eq!(
        ds.bounds().to_array(),
        [-180.0, -bbox::TILE_BAND_LAT, 180.0, bbox::TILE_BAND_LAT],
        1e-9
    );

    let [tl, tr, br, bl] = result.corners();
    assert_eq!(tl, (-180.0, bbox::TILE_BAND_LAT));
    assert_eq!(tr, (180.0, bbox::TILE_BAND_LAT));
    assert_eq!(br, (180.0, -bbox::TILE_BAND_LAT));
    assert_eq!(bl, (-180.0, -bbox::TILE_BAND_LAT));
}

#[tokio::test]
async fn test_geographic_regional_is_reprojected() {
    let result = load(
        GeoTiffBuilder::f32(100, 100, uniform_grid(100, 100, 5.0))
            .bounds(bbox::AFRICA_EUROPE)
            .geographic_code(4326),
        RenderOptions::default(),
    )
    .await;

    let ds = &result.dataset;
    assert_eq!(ds.source_projection(), SourceProjection::Geographic);
    assert_eq!(ds.spacing(), GridSpacing::LinearMercator);
    assert_eq!(ds.bounds().to_array(), bbox::AFRICA_EUROPE);
    assert!((94..=98).contains(&ds.width()), "width {}", ds.width());
    assert!((102..=106).contains(&ds.height()), "height {}", ds.height());

    assert_eq!(query(ds, 10.0, 0.0), Some(5.0));
    assert_eq!(query(ds, -20.0, 40.0), Some(5.0));
    assert_eq!(query(ds, 55.0, -35.0), Some(5.0));
    assert_eq!(query(ds, 60.0, 0.0), None);
    assert_eq!(query(ds, 10.0, 45.0), None);
}

#[tokio::test]
async fn test_global_geographic_uses_tile_band() {
    let result = load(
        GeoTiffBuilder::f32(36, 18, uniform_grid(36, 18, 1.0))
            .bounds(bbox::GLOBAL)
            .geographic_code(4326),
        RenderOptions::default(),
    )
    .await;

    assert_bounds_approx_eq!(
        result.dataset.bounds().to_array(),
        [-180.0, -bbox::TILE_BAND_LAT, 180.0, bbox::TILE_BAND_LAT],
        1e-9
    );
}

#[tokio::test]
async fn test_near_global_bounds_are_not_stretched() {
    let result = load(
        GeoTiffBuilder::f32(40, 20, uniform_grid(40, 20, 1.0))
            .bounds([-179.5, -60.0, 179.5, 84.0])
            .model_type(2),
        RenderOptions::default(),
    )
    .await;

    assert_bounds_approx_eq!(
        result.dataset.bounds().to_array(),
        [-179.5, -60.0, 179.5, 84.0],
        1e-9
    );
}

#[tokio::test]
async fn test_ungeoreferenced_raster_falls_back() {
    let result = load(
        GeoTiffBuilder::f32(8, 4, uniform_grid(8, 4, 3.0)),
        RenderOptions::default(),
    )
    .await;

    let ds = &result.dataset;
    assert_eq!(ds.source_projection(), SourceProjection::Unknown);
    assert_eq!(ds.spacing(), GridSpacing::LinearLatitude);
    assert_eq!((ds.width(), ds.height()), (8, 4));
    assert_bounds_approx_eq!(
        ds.bounds().to_array(),
        [-180.0, -bbox::TILE_BAND_LAT, 180.0, bbox::TILE_BAND_LAT],
        1e-9
    );
}

#[tokio::test]
async fn test_declared_nodata_is_transparent() {
    let mut samples = vec![10u16; 16];
    samples[5] = 255;

    let result = load(
        GeoTiffBuilder::u16(4, 4, samples)
            .bounds([0.0, 0.0, 1113194.9, 1118890.0])
            .projected_code(3857)
            .nodata("255"),
        RenderOptions::default(),
    )
    .await;

    assert_eq!(alpha(&result, 1, 1), 0);
    assert_eq!(alpha(&result, 0, 0), 255);

    let (lng, lat) = result.dataset.pixel_center(1, 1);
    assert_eq!(query(&result.dataset, lng, lat), None);
    let (lng, lat) = result.dataset.pixel_center(2, 1);
    assert_eq!(query(&result.dataset, lng, lat), Some(10.0));
}

#[tokio::test]
async fn test_zero_is_valid_data() {
    let result = load(
        GeoTiffBuilder::f32(2, 1, vec![0.0, 10.0])
            .bounds([0.0, 0.0, 2.0, 1.0])
            .model_type(2),
        RenderOptions {
            rescale: Some((0.0, 10.0)),
            ..Default::default()
        },
    )
    .await;

    let ds = &result.dataset;
    assert!(ds.samples().iter().all(|v| !v.is_nan()));
    for y in 0..ds.height() {
        for x in 0..ds.width() {
            assert_eq!(alpha(&result, x, y), 255);
        }
    }
    assert_eq!(query(ds, 0.1, 0.5), Some(0.0));
}

#[tokio::test]
async fn test_nodata_threshold_override() {
    let options = RenderOptions {
        nodata_threshold: Some(50.0),
        ..Default::default()
    };
    let result = load(
        GeoTiffBuilder::f32(4, 1, vec![1.0, 49.0, 51.0, 100.0])
            .bounds([0.0, 0.0, 1113194.9, 278298.7])
            .projected_code(3857),
        options,
    )
    .await;

    assert_eq!(result.dataset.value_range(), Some((1.0, 49.0)));
    assert_eq!(alpha(&result, 2, 0), 0);
    assert_eq!(alpha(&result, 3, 0), 0);
}

#[tokio::test]
async fn test_debug_mode_paints_valid_pixels() {
    let result = load(
        GeoTiffBuilder::f32(4, 4, with_nan_holes(uniform_grid(4, 4, 2.0), 3))
            .bounds([0.0, 0.0, 1113194.9, 1118890.0])
            .projected_code(3857),
        RenderOptions {
            debug_mode: true,
            ..Default::default()
        },
    )
    .await;

    let debug = renderer::DEBUG_COLOR.to_bytes();
    for (pixel, value) in result.image.chunks_exact(4).zip(result.dataset.samples()) {
        if value.is_nan() {
            assert_eq!(pixel[3], 0);
        } else {
            assert_eq!(pixel, &debug[..]);
        }
    }
}

#[tokio::test]
async fn test_missing_file_is_decode_error() {
    let err = engine()
        .load_and_process("/nonexistent/layer.tif", &RenderOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RasterError::Decode { .. }));
}

#[tokio::test]
async fn test_png_output() {
    let result = load(
        GeoTiffBuilder::f32(16, 8, create_gradient_grid(16, 8))
            .bounds(bbox::AFRICA_EUROPE)
            .geographic_code(4326),
        RenderOptions::default(),
    )
    .await;

    let png = result.to_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert_approx_eq!(result.domain.0, 0.0, 1e-6);
}
