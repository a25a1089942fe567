#![allow(unused)]
//! REST conversion harness.
//!
//! # What this covers
//!
//! - **Health**: `GET /` and `GET /health` report service liveness.
//! - **Conversion**: all three table shapes convert through `POST /convert`
//!   and yield a renderer URL carrying the serialized chart spec and the
//!   format/width/height parameters.
//! - **Defaults**: omitted options fall back to the configured format and
//!   dimensions; explicit options override them.
//! - **Validation**: missing table, unsupported shapes, and oversized tables
//!   are 400s with an `{error, message}` body; the size guard runs before
//!   normalization.
//! - **Renderer key**: the `key` query parameter appears exactly when an API
//!   key is configured.
//! - **CORS**: wildcard headers on every response when enabled, preflight
//!   short-circuit, nothing when disabled.
//! - **Routing**: unknown paths 404 with the endpoint list.
//!
//! # What this does NOT cover
//!
//! - The rendering service itself (tabviz only constructs its URL)
//! - Cell-level coercion rules (unit-tested in tabviz-core)
//!
//! # Running
//!
//! ```sh
//! cargo test --test convert_harness
//! ```

mod common;
use common::*;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[rstest]
#[case::root("/")]
#[case::health("/health")]
#[tokio::test]
async fn health_reports_liveness(#[case] uri: &str) {
    let (status, body) = get_json(app(), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("tabviz"));
    assert!(body["timestamp"].is_string());
}

// ---------------------------------------------------------------------------
// Conversion happy paths
// ---------------------------------------------------------------------------

#[rstest]
#[case::headers_rows(headers_rows_table())]
#[case::records(records_table())]
#[case::grid(grid_table())]
#[tokio::test]
async fn all_three_shapes_convert(#[case] table: Value) {
    let (status, body) = post_json(app(), "/convert", &json!({"table": table})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["format"], json!("png"));

    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("https://quickchart.io/chart?c=%7B"), "url: {url}");
    assert!(url.contains("&format=png&width=800&height=600"), "url: {url}");
}

#[tokio::test]
async fn explicit_options_override_defaults() {
    let payload = json!({
        "table": headers_rows_table(),
        "format": "svg",
        "width": 400,
        "height": 300,
    });
    let (status, body) = post_json(app(), "/convert", &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["format"], json!("svg"));
    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.contains("&format=svg&width=400&height=300"), "url: {url}");
}

#[tokio::test]
async fn configured_defaults_flow_into_the_url() {
    let app = app_with(|cfg| {
        cfg.defaults.width = 1024;
        cfg.defaults.height = 256;
    });
    let (_, body) = post_json(app, "/convert", &json!({"table": grid_table()})).await;
    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.contains("&width=1024&height=256"), "url: {url}");
}

#[tokio::test]
async fn renderer_key_appears_only_when_configured() {
    let (_, body) = post_json(app(), "/convert", &json!({"table": grid_table()})).await;
    assert!(!body["imageUrl"].as_str().unwrap().contains("key="));

    let app = app_with(|cfg| cfg.renderer.api_key = Some("test-key".into()));
    let (_, body) = post_json(app, "/convert", &json!({"table": grid_table()})).await;
    assert!(body["imageUrl"].as_str().unwrap().ends_with("&key=test-key"));
}

#[tokio::test]
async fn style_tag_is_accepted_and_alters_the_spec() {
    // The minimal preset hides the title; the encoded spec reflects it.
    let (status, body) = post_json(
        app(),
        "/convert",
        &json!({"table": headers_rows_table(), "style": "minimal"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["imageUrl"].as_str().unwrap();
    // "display":false under title — urlencoded form of %22display%22%3Afalse
    assert!(url.contains("%22display%22%3Afalse"), "url: {url}");
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_table_is_a_validation_error() {
    let (status, body) = post_json(app(), "/convert", &json!({"format": "png"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Validation Error"));
    assert_eq!(body["message"], json!("missing table data"));
}

#[rstest]
#[case::empty_array(json!([]))]
#[case::empty_object(json!({}))]
#[case::scalar(json!(42))]
#[case::null(json!(null))]
#[tokio::test]
async fn unsupported_shapes_are_rejected(#[case] table: Value) {
    let (status, body) = post_json(app(), "/convert", &json!({"table": table})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Validation Error"));
    assert!(
        body["message"].as_str().unwrap().contains("unsupported table format"),
        "message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn oversized_table_is_rejected_before_normalization() {
    let app = app_with(|cfg| cfg.limits.max_table_size = 6);
    // 2 columns × (3 rows + 1) = 8 cells > 6.
    let (status, body) = post_json(app, "/convert", &json!({"table": sized_table(2, 3)})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"].as_str().unwrap().contains("table too large"),
        "message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn size_guard_runs_before_shape_detection() {
    // Oversized AND unsupported (first element is a scalar): the guard's
    // verdict wins, proving it gates the pipeline.
    let app = app_with(|cfg| cfg.limits.max_table_size = 10);
    let big_row: Vec<i64> = (0..50).collect();
    let (status, body) = post_json(app, "/convert", &json!({"table": [0, big_row]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"].as_str().unwrap().contains("table too large"),
        "message: {}",
        body["message"]
    );
}

#[tokio::test]
async fn table_at_exactly_the_limit_passes() {
    let app = app_with(|cfg| cfg.limits.max_table_size = 6);
    // 2 columns × (2 rows + 1) = 6 cells.
    let (status, _) = post_json(app, "/convert", &json!({"table": sized_table(2, 2)})).await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn responses_carry_cors_headers_when_enabled() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = send_raw(app(), request).await;
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "GET, POST, OPTIONS"
    );
}

#[tokio::test]
async fn preflight_short_circuits() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/convert")
        .body(Body::empty())
        .unwrap();
    let response = send_raw(app(), request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn cors_headers_absent_when_disabled() {
    let app = app_with(|cfg| cfg.server.enable_cors = false);
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = send_raw(app, request).await;
    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_routes_list_available_endpoints() {
    let (status, body) = get_json(app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Not Found"));
    assert!(body["message"].as_str().unwrap().contains("/convert"));
}
