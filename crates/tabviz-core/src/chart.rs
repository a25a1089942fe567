//! Chart builder — turns a [`CanonicalTable`] into a Chart.js-shaped bar-chart
//! description plus the query parameters the external renderer consumes.
//!
//! The chart type is fixed (`bar`): one label per table row, one dataset per
//! header column. Cell values go through a lossy numeric coercion — anything
//! that does not parse as a number renders as `0.0`, silently. That fallback
//! is part of the contract, not an error.
//!
//! The core only *describes* the render request. Issuing it is the caller's
//! concern; [`render_url`] produces the full `<base>?c=…&format=…` URL.

use crate::types::{CanonicalTable, ImageFormat};
use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Style presets
// ---------------------------------------------------------------------------

/// Rendering style tag. Unrecognized tags behave as [`ChartStyle::Default`];
/// the tag itself is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    #[default]
    Default,
    Minimal,
    Dark,
    Light,
}

impl ChartStyle {
    /// Resolve a raw style tag. Unknown tags map to the baseline.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "minimal" => ChartStyle::Minimal,
            "dark" => ChartStyle::Dark,
            "light" => ChartStyle::Light,
            _ => ChartStyle::Default,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart spec (serializes to Chart.js configuration JSON)
// ---------------------------------------------------------------------------

/// A renderer-agnostic bar-chart description. Opaque to callers; its only
/// consumer is the external rendering service, via [`RenderParams::c`].
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One dataset per header column, positionally aligned to the labels.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartOptions {
    pub title: TitleOptions,
    pub responsive: bool,
    #[serde(rename = "maintainAspectRatio")]
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendOptions>,
    pub plugins: PluginOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleOptions {
    pub display: bool,
    pub text: &'static str,
    #[serde(rename = "fontColor", skip_serializing_if = "Option::is_none")]
    pub font_color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LegendLabels>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendLabels {
    #[serde(rename = "fontColor")]
    pub font_color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginOptions {
    pub datalabels: DataLabelOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataLabelOptions {
    pub display: bool,
    pub anchor: &'static str,
    pub align: &'static str,
}

const TITLE_TEXT: &str = "Table Data Visualization";

impl ChartOptions {
    /// The baseline options object. This shape is a stable contract — the
    /// `default` style (and any unrecognized tag) must produce exactly this.
    fn baseline() -> Self {
        Self {
            title: TitleOptions {
                display: true,
                text: TITLE_TEXT,
                font_color: None,
            },
            responsive: true,
            maintain_aspect_ratio: false,
            legend: None,
            plugins: PluginOptions {
                datalabels: DataLabelOptions {
                    display: true,
                    anchor: "end",
                    align: "top",
                },
            },
        }
    }

    fn for_style(style: ChartStyle) -> Self {
        let mut options = Self::baseline();
        match style {
            ChartStyle::Default => {}
            ChartStyle::Minimal => {
                options.title.display = false;
                options.legend = Some(LegendOptions {
                    display: Some(false),
                    labels: None,
                });
                options.plugins.datalabels.display = false;
            }
            ChartStyle::Dark => tint(&mut options, "#e8e8e8"),
            ChartStyle::Light => tint(&mut options, "#333333"),
        }
        options
    }
}

fn tint(options: &mut ChartOptions, color: &'static str) {
    options.title.font_color = Some(color);
    options.legend = Some(LegendOptions {
        display: None,
        labels: Some(LegendLabels { font_color: color }),
    });
}

// ---------------------------------------------------------------------------
// Spec construction
// ---------------------------------------------------------------------------

/// Build the bar-chart description for a canonical table.
///
/// `labels[i]` is the generated row identifier `"Row {i+1}"` regardless of row
/// content; dataset `j` carries the numeric coercion of column `j` across all
/// rows. Infallible: malformed cells become `0.0`, never errors.
pub fn build_spec(table: &CanonicalTable, style: ChartStyle) -> ChartSpec {
    let labels = (1..=table.rows.len()).map(|i| format!("Row {i}")).collect();

    let datasets = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| Dataset {
            label: header.clone(),
            data: table.rows.iter().map(|row| coerce_cell(row.get(col))).collect(),
        })
        .collect();

    ChartSpec {
        kind: "bar",
        data: ChartData { labels, datasets },
        options: ChartOptions::for_style(style),
    }
}

/// Numeric coercion: numbers pass through, strings are parsed as f64, and
/// everything else — null, bool, nested structures, missing cells — is `0.0`.
/// Non-finite parses ("NaN", "inf") also coerce to `0.0`; the spec JSON must
/// stay renderable.
fn coerce_cell(cell: Option<&Value>) -> f64 {
    match cell {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Renderer hand-off parameters
// ---------------------------------------------------------------------------

/// The flattened parameter map appended to the renderer's query string:
/// `c` (serialized chart spec), `format`, `width`, `height`, and `key` only
/// when a renderer API key is configured.
#[derive(Debug, Clone, Serialize)]
pub struct RenderParams {
    pub c: String,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl RenderParams {
    pub fn new(
        spec: &ChartSpec,
        format: ImageFormat,
        width: u32,
        height: u32,
        key: Option<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            c: serde_json::to_string(spec)?,
            format,
            width,
            height,
            key,
        })
    }
}

/// Assemble the full renderer URL: `<base>?c=<json>&format=<fmt>&width=<w>&height=<h>[&key=<k>]`.
pub fn render_url(base: &str, params: &RenderParams) -> anyhow::Result<String> {
    Ok(format!("{base}?{}", serde_urlencoded::to_string(params)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
