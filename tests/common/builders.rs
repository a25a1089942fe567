//! Request builders — drive the router in-process via `tower::ServiceExt`.
//!
//! These helpers panic on transport-level failures rather than returning
//! `Result`; a harness only cares about status codes and bodies.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tabviz_core::config::Config;
use tower::ServiceExt;

/// A router over the built-in default config.
pub fn app() -> Router {
    tabviz::server::router(Arc::new(Config::defaults()))
}

/// A router over a tweaked config.
///
/// ```rust
/// let app = app_with(|cfg| cfg.limits.max_table_size = 4);
/// ```
pub fn app_with<F: FnOnce(&mut Config)>(tweak: F) -> Router {
    let mut cfg = Config::defaults();
    tweak(&mut cfg);
    tabviz::server::router(Arc::new(cfg))
}

/// POST a JSON body and decode the JSON response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// GET a route and decode the JSON response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Run an arbitrary request and return the raw response, for harnesses that
/// need to assert on headers.
pub async fn send_raw(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
