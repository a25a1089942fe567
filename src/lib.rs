//! tabviz — table-to-chart-image relay.
//!
//! Accepts tabular data over HTTP, normalizes it into a canonical
//! headers+rows form, builds a bar-chart specification, and returns the URL
//! at which a QuickChart-compatible renderer will serve the image. The same
//! conversion is exposed twice: as plain REST (`POST /convert`) and wrapped
//! in an MCP-style RPC envelope (`/mcp/*`).
//!
//! # Architecture
//!
//! ```text
//! HTTP request ──► Size guard ──► Normalizer ──► Chart builder ──► render URL
//!      │                (all data-shape logic lives in tabviz-core)
//!      └── /mcp envelope re-encodes the same pipeline
//! ```
//!
//! Fully stateless: every request runs the pipeline to completion and nothing
//! is shared across requests beyond the read-only [`tabviz_core::config::Config`].

pub mod mcp;
pub mod server;
