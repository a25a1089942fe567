//! Configuration types for tabviz.
//!
//! [`Config::load`] layers three sources: the embedded TOML defaults, an
//! optional config file, and `TABVIZ__`-prefixed environment variables
//! (`TABVIZ__LIMITS__MAX_TABLE_SIZE=2000`, `TABVIZ__RENDERER__API_KEY=…`).
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem or environment (useful in tests).
//!
//! The core reads this config; it never writes it. Everything here is
//! request-invariant for the lifetime of the process.

use crate::types::ImageFormat;
use serde::Deserialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
listen      = "0.0.0.0:8787"
enable_cors = true

[renderer]
base_url = "https://quickchart.io/chart"

[limits]
max_table_size = 10000
rate_limit     = 60

[defaults]
format = "png"
width  = 800
height = 600
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub defaults: RenderDefaults,
    #[serde(default)]
    pub mcp: McpConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

/// `[renderer]` section — the external chart-rendering service.
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as the `key` query parameter when present.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// `[limits]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Cell-count ceiling, evaluated before normalization.
    #[serde(default = "default_max_table_size")]
    pub max_table_size: usize,
    /// Requests per minute, advertised via MCP capabilities. Enforcement is
    /// the deployment's concern.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
}

/// `[defaults]` section — render options used when a request omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderDefaults {
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

/// `[mcp]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct McpConfig {
    /// When set, all `/mcp/*` routes require `Authorization: Bearer <key>`.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_listen() -> String { "0.0.0.0:8787".to_string() }
fn default_enable_cors() -> bool { true }
fn default_base_url() -> String { "https://quickchart.io/chart".to_string() }
fn default_max_table_size() -> usize { 10_000 }
fn default_rate_limit() -> u32 { 60 }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: default_listen(), enable_cors: default_enable_cors() }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), api_key: None }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_table_size: default_max_table_size(),
            rate_limit: default_rate_limit(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Config {
    /// Load configuration: embedded defaults, then the given file (if any),
    /// then `TABVIZ__SECTION__KEY` environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        // An explicitly requested file must exist; absence is an error.
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder
            .add_source(
                config::Environment::with_prefix("TABVIZ")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching filesystem or environment.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
