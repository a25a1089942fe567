//! MCP dialect — an RPC-style envelope around the same conversion pipeline.
//!
//! The surface mirrors the `mcp/1.0` contract: discovery endpoints (`/mcp`,
//! `/mcp/capabilities`, `/mcp/schema`) and a single method, `convert_table`,
//! posted to `/mcp/convert`. When an API key is configured, every route in
//! this module requires a matching `Authorization: Bearer` header.

use crate::server::{run_pipeline, ApiError, SharedConfig};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tabviz_core::ImageFormat;

/// Routes nested under `/mcp`.
pub fn router(cfg: SharedConfig) -> Router<SharedConfig> {
    Router::new()
        .route("/", get(info))
        .route("/capabilities", get(capabilities))
        .route("/schema", get(schema))
        .route("/convert", post(convert))
        .route_layer(middleware::from_fn_with_state(cfg, require_bearer))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Bearer-token equality check. No configured key means no auth.
async fn require_bearer(State(cfg): State<SharedConfig>, req: Request, next: Next) -> Response {
    let Some(expected) = cfg.mcp.api_key.as_deref() else {
        return next.run(req).await;
    };

    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if provided == Some(expected) {
        next.run(req).await
    } else {
        tracing::warn!("mcp request rejected: missing or invalid bearer token");
        ApiError::unauthorized("missing or invalid bearer token").into_response()
    }
}

// ---------------------------------------------------------------------------
// Convert
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<McpParams>,
}

#[derive(Debug, Deserialize)]
pub struct McpParams {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub options: Option<McpOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct McpOptions {
    #[serde(default)]
    pub format: Option<ImageFormat>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub style: Option<String>,
}

async fn convert(
    State(cfg): State<SharedConfig>,
    Json(req): Json<McpRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.method.as_deref() != Some("convert_table") {
        return Err(ApiError::invalid_request("method must be \"convert_table\""));
    }

    let params = req.params.as_ref();
    let data = params
        .and_then(|p| p.data.as_ref())
        .ok_or_else(|| ApiError::invalid_request("missing params.data"))?;
    let options = params
        .and_then(|p| p.options.clone())
        .unwrap_or_default();

    let conversion = run_pipeline(
        &cfg,
        data,
        options.format,
        options.width,
        options.height,
        options.style.as_deref(),
    )?;

    Ok(Json(json!({
        "result": {
            "imageUrl": conversion.image_url,
            "format": conversion.format,
            "success": true,
        },
        "metadata": {
            "timestamp": Utc::now(),
            "provider": "quickchart",
            "mcp_version": "1.0",
        },
    })))
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

async fn info() -> Json<Value> {
    Json(json!({
        "name": "tabviz",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "mcp/1.0",
        "description": "Convert table data to chart images via a QuickChart-compatible renderer",
        "capabilities": ["convert_table", "format_support", "style_options"],
        "endpoints": {
            "convert": "/mcp/convert",
            "capabilities": "/mcp/capabilities",
            "schema": "/mcp/schema",
        },
        "timestamp": Utc::now(),
    }))
}

async fn capabilities(State(cfg): State<SharedConfig>) -> Json<Value> {
    Json(json!({
        "capabilities": [
            {
                "name": "convert_table",
                "description": "Convert table data to an image URL",
                "input": {
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "description": "Table data in any supported shape"},
                        "options": {"type": "object", "description": "Conversion options"},
                    },
                },
                "output": {
                    "type": "object",
                    "properties": {
                        "imageUrl": {"type": "string", "description": "URL of the rendered image"},
                        "format": {"type": "string", "description": "Image format (png, jpg, svg)"},
                    },
                },
            },
            {
                "name": "format_support",
                "description": "List supported table formats",
                "output": {"type": "array", "items": {"type": "string"}},
            },
        ],
        "formats": {
            "input": ["headers_rows", "array_of_records", "2d_array"],
            "output": ["png", "jpg", "svg"],
        },
        "limits": {
            "maxCells": cfg.limits.max_table_size,
            "maxWidth": 4096,
            "maxHeight": 4096,
            "requestsPerMinute": cfg.limits.rate_limit,
        },
    }))
}

async fn schema() -> Json<Value> {
    Json(json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "tabviz MCP envelope",
        "type": "object",
        "properties": {
            "method": {
                "type": "string",
                "enum": ["convert_table", "format_support"],
                "description": "MCP method to invoke",
            },
            "params": {
                "type": "object",
                "properties": {
                    "data": {
                        "oneOf": [
                            {
                                "type": "object",
                                "properties": {
                                    "headers": {"type": "array", "items": {"type": "string"}},
                                    "rows": {"type": "array", "items": {"type": "array"}},
                                },
                            },
                            {"type": "array", "items": {"type": "object"}},
                            {"type": "array", "items": {"type": "array"}},
                        ],
                    },
                    "options": {
                        "type": "object",
                        "properties": {
                            "format": {"type": "string", "enum": ["png", "jpg", "svg"]},
                            "width": {"type": "number", "minimum": 100, "maximum": 4096},
                            "height": {"type": "number", "minimum": 100, "maximum": 4096},
                            "style": {
                                "type": "string",
                                "enum": ["default", "minimal", "dark", "light"],
                            },
                        },
                    },
                },
            },
        },
        "required": ["method"],
    }))
}
