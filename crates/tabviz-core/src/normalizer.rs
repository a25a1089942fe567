//! Normalizer — converts the three accepted table shapes into [`CanonicalTable`].
//!
//! Detection runs in priority order: headers/rows object → array of records →
//! 2D array. The first matching predicate wins and dictates the interpretation
//! of the *entire* input; heterogeneous arrays are never rejected, later
//! elements that do not match the detected shape degrade to empty rows or
//! missing cells rather than failing.
//!
//! Missing cells (a record lacking one of the first record's keys, a row
//! shorter than the header count) are stored as [`Value::Null`] and resolved to
//! `0.0` by the chart builder, not here.

use crate::error::ConvertError;
use crate::types::CanonicalTable;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Shape detection
// ---------------------------------------------------------------------------

/// The recognized input shapes, resolved by [`detect_shape`]. Each variant
/// borrows the parts its conversion function needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableShape<'a> {
    /// An object already exposing `headers` and `rows` arrays.
    HeadersRows {
        headers: &'a [Value],
        rows: &'a [Value],
    },
    /// A non-empty array whose first element is a record (keyed object).
    Records {
        first: &'a Map<String, Value>,
        items: &'a [Value],
    },
    /// A non-empty array whose first element is itself an array.
    Grid { items: &'a [Value] },
}

/// Classify an input value against the recognized shapes, first match wins.
///
/// Only the first element of an array input is inspected; `None` means the
/// input is unsupported (empty array, empty object, scalar, null, or an array
/// whose first element is neither a record nor an array).
pub fn detect_shape(input: &Value) -> Option<TableShape<'_>> {
    match input {
        Value::Object(map) => match (map.get("headers"), map.get("rows")) {
            (Some(Value::Array(headers)), Some(Value::Array(rows))) => {
                Some(TableShape::HeadersRows { headers, rows })
            }
            _ => None,
        },
        Value::Array(items) => match items.first() {
            Some(Value::Object(first)) => Some(TableShape::Records { first, items }),
            Some(Value::Array(_)) => Some(TableShape::Grid { items }),
            _ => None,
        },
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Convert any recognized input shape into a [`CanonicalTable`].
///
/// Fails with [`ConvertError::UnsupportedFormat`] when no shape predicate
/// matches. Never fails on internal inconsistency — see the module docs.
pub fn normalize(input: &Value) -> Result<CanonicalTable, ConvertError> {
    let shape = detect_shape(input).ok_or(ConvertError::UnsupportedFormat)?;
    Ok(match shape {
        TableShape::HeadersRows { headers, rows } => from_headers_rows(headers, rows),
        TableShape::Records { first, items } => from_records(first, items),
        TableShape::Grid { items } => from_grid(items),
    })
}

/// Shape 1: pass through, stringifying header labels.
fn from_headers_rows(headers: &[Value], rows: &[Value]) -> CanonicalTable {
    CanonicalTable::new(
        headers.iter().map(header_label).collect(),
        rows.iter().map(row_cells).collect(),
    )
}

/// Shape 2: headers are the *first* record's keys in insertion order; every
/// element is projected positionally against those keys. Extra keys on later
/// records are dropped, absent keys become `Null` cells, and a later element
/// that is not a record at all projects to an all-`Null` row.
fn from_records(first: &Map<String, Value>, items: &[Value]) -> CanonicalTable {
    let headers: Vec<String> = first.keys().cloned().collect();
    let rows = items
        .iter()
        .map(|item| {
            let record = item.as_object();
            headers
                .iter()
                .map(|key| {
                    record
                        .and_then(|r| r.get(key))
                        .cloned()
                        .unwrap_or(Value::Null)
                })
                .collect()
        })
        .collect();
    CanonicalTable::new(headers, rows)
}

/// Shape 3: first inner array → headers, remaining elements → rows verbatim.
fn from_grid(items: &[Value]) -> CanonicalTable {
    let headers = match items.first() {
        Some(Value::Array(first)) => first.iter().map(header_label).collect(),
        // detect_shape only yields Grid for a leading array
        _ => Vec::new(),
    };
    CanonicalTable::new(headers, items[1..].iter().map(row_cells).collect())
}

/// String headers pass through; anything else uses its JSON rendering.
fn header_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A row that is not an array has no addressable cells; it contributes an
/// empty row whose cells all resolve as missing downstream.
fn row_cells(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(row) => row.clone(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
