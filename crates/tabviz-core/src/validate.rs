//! Size guard — the first validation gate, evaluated before normalization.
//!
//! The cell-count convention intentionally mirrors the shape dispatch without
//! running it: a headers/rows object counts `headers × (rows + 1)` (the +1
//! charges for the header row), an array input sums each element's own
//! element/key count, and anything else counts zero cells — the normalizer
//! rejects those shapes immediately afterwards.

use crate::error::ConvertError;
use serde_json::Value;

/// Count the cells of an input value under the guard's convention.
pub fn cell_count(input: &Value) -> usize {
    match input {
        Value::Object(map) => match (map.get("headers"), map.get("rows")) {
            (Some(Value::Array(headers)), Some(Value::Array(rows))) => {
                headers.len() * (rows.len() + 1)
            }
            _ => 0,
        },
        Value::Array(items) => items
            .iter()
            .map(|row| match row {
                Value::Array(cells) => cells.len(),
                Value::Object(record) => record.len(),
                _ => 0,
            })
            .sum(),
        _ => 0,
    }
}

/// Reject tables whose cell count exceeds `max`.
pub fn check_size(input: &Value, max: usize) -> Result<(), ConvertError> {
    let cells = cell_count(input);
    if cells > max {
        return Err(ConvertError::TableTooLarge { cells, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::headers_rows(json!({"headers": ["A", "B"], "rows": [[1, 2], [3, 4]]}), 6)]
    #[case::headers_only(json!({"headers": ["A", "B", "C"], "rows": []}), 3)]
    #[case::grid(json!([["H1", "H2"], [10, 20], [30]]), 5)]
    #[case::records(json!([{"a": 1, "b": 2}, {"a": 3}]), 3)]
    #[case::mixed_array(json!([[1, 2], {"a": 1}, "junk"]), 3)]
    #[case::scalar(json!(42), 0)]
    #[case::empty(json!([]), 0)]
    fn counts_follow_the_convention(#[case] input: Value, #[case] expected: usize) {
        assert_eq!(cell_count(&input), expected);
    }

    #[test]
    fn oversized_table_is_rejected() {
        let input = json!({"headers": ["A", "B"], "rows": [[1, 2], [3, 4]]});
        assert_eq!(
            check_size(&input, 5),
            Err(ConvertError::TableTooLarge { cells: 6, max: 5 })
        );
        assert_eq!(check_size(&input, 6), Ok(()));
    }

    #[test]
    fn unsupported_shapes_pass_the_guard() {
        // Zero cells — the normalizer is the gate that rejects these.
        assert_eq!(check_size(&json!(null), 0), Ok(()));
        assert_eq!(check_size(&json!({}), 0), Ok(()));
    }
}
