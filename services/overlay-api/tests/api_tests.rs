//! Router-level tests against on-disk GeoTIFF fixtures.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use overlay_api::{build_router, config::ServiceConfig, state::AppState};
use serde_json::Value;
use tower::ServiceExt;
use test_utils::{bbox, create_gradient_grid, GeoTiffBuilder};

fn app() -> Router {
    let state = AppState::new(ServiceConfig::default()).unwrap();
    build_router(Arc::new(state))
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn fixture() -> tempfile::NamedTempFile {
    GeoTiffBuilder::f32(40, 20, create_gradient_grid(40, 20))
        .bounds(bbox::AFRICA_EUROPE)
        .geographic_code(4326)
        .build_temp_file()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["bucket"], "planeo");
}

#[tokio::test]
async fn test_layer_lifecycle() {
    let app = app();
    let file = fixture();
    let path = file.path().display().to_string();

    let (status, summary) =
        send_json(&app, Method::PUT, &format!("/layers/risk?url={}&rescale=0,100", path)).await;
    assert_eq!(status, StatusCode::OK, "{}", summary);
    assert_eq!(summary["id"], "risk");
    assert_eq!(summary["source_projection"], "geographic");
    assert_eq!(summary["bounds"][0].as_f64(), Some(-20.0));
    assert_eq!(summary["corners"][0][1].as_f64(), Some(40.0));
    assert_eq!(summary["domain"][1].as_f64(), Some(100.0));

    let (status, list) = send_json(&app, Method::GET, "/layers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["layers"], serde_json::json!(["risk"]));

    let (status, png) = send(&app, Method::GET, "/layers/risk/image.png").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let (status, value) = send_json(&app, Method::GET, "/layers/risk/query?lng=-19.9&lat=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["value"].as_f64(), Some(0.0));

    let (status, value) = send_json(&app, Method::GET, "/layers/risk/query?lng=100&lat=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(value["value"].is_null());

    let (status, _) = send(&app, Method::DELETE, "/layers/risk").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/layers/risk/image.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_statuses() {
    let app = app();
    let file = fixture();
    let path = file.path().display().to_string();

    let (status, _) = send(&app, Method::GET, "/layers/nope/query?lng=0&lat=0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send_json(&app, Method::PUT, &format!("/layers/a?url={}&rescale=5,1", path)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rescale"));

    let (status, _) = send(&app, Method::PUT, "/layers/a?url=unknown/a.tif").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/layers/a?url=/nonexistent/a.tif").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = send(&app, Method::DELETE, "/layers/a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
