//! Static table payloads and envelope constructors used across harnesses.

use serde_json::{json, Value};

/// The canonical headers/rows table from the conversion contract.
pub fn headers_rows_table() -> Value {
    json!({"headers": ["A", "B"], "rows": [[1, 2], [3, 4]]})
}

/// Record-shaped input with a non-numeric column.
pub fn records_table() -> Value {
    json!([{"x": 1, "y": "foo"}, {"x": 2, "y": "bar"}])
}

/// 2D-array input, first row as headers.
pub fn grid_table() -> Value {
    json!([["H1", "H2"], [10, 20], [30, 40]])
}

/// A headers/rows table counting `columns × (rows + 1)` cells under the
/// size-guard convention.
pub fn sized_table(columns: usize, rows: usize) -> Value {
    json!({
        "headers": (0..columns).map(|c| format!("c{c}")).collect::<Vec<_>>(),
        "rows": (0..rows)
            .map(|_| (0..columns).map(|c| c as i64).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    })
}

/// A well-formed `convert_table` MCP envelope.
pub fn mcp_envelope(data: Value) -> Value {
    json!({"method": "convert_table", "params": {"data": data}})
}

/// An MCP envelope with explicit conversion options.
pub fn mcp_envelope_with(data: Value, options: Value) -> Value {
    json!({"method": "convert_table", "params": {"data": data, "options": options}})
}
