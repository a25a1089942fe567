//! Core types shared across the pipeline layers: the canonical table every
//! input shape converges to, and the image format tag understood by the
//! renderer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The canonical columnar table all supported input shapes normalize into.
///
/// `headers` ordering is significant — it defines column identity and display
/// order. Row lengths are *not* enforced against `headers.len()`: a short row
/// simply has missing cells, which the chart builder coerces to `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl CanonicalTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }
}

/// Output image format requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Svg,
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Jpg => write!(f, "jpg"),
            ImageFormat::Svg => write!(f, "svg"),
        }
    }
}
