//! tabviz-core — table normalization and chart-spec construction.
//!
//! This crate is the logical core of tabviz: everything that reasons about
//! data shapes lives here, with no HTTP dependencies. The binary crate wires
//! these layers into an axum server.
//!
//! # Architecture
//!
//! ```text
//! input value ──► Size guard ──► Normalizer ──► Chart builder ──► RenderParams
//! ```
//!
//! Each layer is a pure, stateless function over its input; a request either
//! flows through all four or stops at the first failing gate. Nothing is
//! shared or persisted across invocations.

pub mod chart;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod types;
pub mod validate;

pub use error::ConvertError;
pub use types::{CanonicalTable, ImageFormat};
