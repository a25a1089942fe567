//! HTTP surface — router, request/response types, CORS, and the mapping from
//! pipeline failures to status codes.
//!
//! Handlers stay thin: every data-shape decision lives in `tabviz-core`, and
//! [`run_pipeline`] is the single path through it (shared with the MCP
//! envelope in [`crate::mcp`]). Errors out of the core are 400s; only a
//! serialization failure — which would indicate a bug — maps to 500.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tabviz_core::{
    chart::{self, ChartStyle, RenderParams},
    config::Config,
    normalizer, validate, ImageFormat,
};

pub type SharedConfig = Arc<Config>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the application router over a shared, read-only config.
pub fn router(cfg: SharedConfig) -> Router {
    let mcp = crate::mcp::router(cfg.clone());
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/convert", post(convert))
        .nest("/mcp", mcp)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(cfg.clone(), cors))
        .with_state(cfg)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// An error response: a status code plus the `{error, message}` JSON body
/// every failure path produces.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Validation Error",
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Invalid Request",
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "Unauthorized",
            message: message.into(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Internal Server Error",
            message: err.to_string(),
        }
    }
}

impl From<tabviz_core::ConvertError> for ApiError {
    fn from(err: tabviz_core::ConvertError) -> Self {
        // Both core variants are request-scoped validation failures.
        Self::validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({"error": self.error, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Conversion pipeline (shared with the MCP surface)
// ---------------------------------------------------------------------------

pub(crate) struct Conversion {
    pub image_url: String,
    pub format: ImageFormat,
}

/// Size guard → normalize → build spec → render URL, with request options
/// falling back to the configured defaults.
pub(crate) fn run_pipeline(
    cfg: &Config,
    table: &Value,
    format: Option<ImageFormat>,
    width: Option<u32>,
    height: Option<u32>,
    style: Option<&str>,
) -> Result<Conversion, ApiError> {
    validate::check_size(table, cfg.limits.max_table_size)
        .inspect_err(|err| tracing::warn!(%err, "table rejected by size guard"))?;
    let canonical = normalizer::normalize(table)
        .inspect_err(|err| tracing::warn!(%err, "normalization failed"))?;

    let style = ChartStyle::from_tag(style.unwrap_or("default"));
    let spec = chart::build_spec(&canonical, style);

    let format = format.unwrap_or(cfg.defaults.format);
    let width = width.unwrap_or(cfg.defaults.width);
    let height = height.unwrap_or(cfg.defaults.height);

    let params = RenderParams::new(&spec, format, width, height, cfg.renderer.api_key.clone())
        .map_err(ApiError::internal)?;
    let image_url = chart::render_url(&cfg.renderer.base_url, &params).map_err(ApiError::internal)?;

    tracing::debug!(
        columns = canonical.headers.len(),
        rows = canonical.rows.len(),
        %format,
        "table converted"
    );

    Ok(Conversion { image_url, format })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub table: Option<Value>,
    #[serde(default)]
    pub format: Option<ImageFormat>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub format: ImageFormat,
    pub timestamp: DateTime<Utc>,
}

async fn convert(
    State(cfg): State<SharedConfig>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let table = req
        .table
        .as_ref()
        .ok_or_else(|| ApiError::validation("missing table data"))?;

    let conversion = run_pipeline(
        &cfg,
        table,
        req.format,
        req.width,
        req.height,
        req.style.as_deref(),
    )?;

    Ok(Json(ConvertResponse {
        success: true,
        image_url: conversion.image_url,
        format: conversion.format,
        timestamp: Utc::now(),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "tabviz",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        error: "Not Found",
        message: "available endpoints: /health, /convert, /mcp".to_string(),
    }
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

/// Wildcard CORS, matching the original deployment surface: applied to every
/// response when enabled, with OPTIONS preflights short-circuited before
/// routing (so a preflight never 404s).
async fn cors(State(cfg): State<SharedConfig>, req: Request, next: Next) -> Response {
    if !cfg.server.enable_cors {
        return next.run(req).await;
    }

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
}
