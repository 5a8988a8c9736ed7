//! Pre-tokenized rows supplied as JSON.

use serde_json::Value;

use super::{Result, RowTokenizer};
use crate::error::TokenizeError;
use crate::rows::RawRow;

/// Accepts a JSON array of rows, each row an array of cells.
///
/// `null` cells become empty strings, numbers and booleans are stringified.
/// Anything that is not an array of arrays is malformed output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRowTokenizer;

impl JsonRowTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl RowTokenizer for JsonRowTokenizer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn tokenize(&self, data: &[u8]) -> Result<Vec<RawRow>> {
        let value: Value = serde_json::from_slice(data)?;

        let Value::Array(rows) = value else {
            return Err(TokenizeError::Malformed(
                "expected an array of rows".to_string(),
            ));
        };

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::Array(cells) => cells
                    .into_iter()
                    .map(|cell| cell_text(cell, index))
                    .collect::<Result<RawRow>>(),
                other => Err(TokenizeError::Malformed(format!(
                    "row {} is not an array: {}",
                    index, other
                ))),
            })
            .collect()
    }
}

fn cell_text(cell: Value, row: usize) -> Result<String> {
    match cell {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(TokenizeError::Malformed(format!(
            "row {} has a nested cell: {}",
            row, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_mixed_cells() {
        let rows = JsonRowTokenizer::new()
            .tokenize(br#"[["PO: 1"], [null, 12, "x", true]]"#)
            .unwrap();
        assert_eq!(rows, vec![vec!["PO: 1"], vec!["", "12", "x", "true"]]);
    }

    #[test]
    fn test_non_array_is_malformed() {
        let err = JsonRowTokenizer::new().tokenize(br#"{"rows": []}"#).unwrap_err();
        assert!(matches!(err, TokenizeError::Malformed(_)));

        let err = JsonRowTokenizer::new().tokenize(br#"[["a"], "b"]"#).unwrap_err();
        assert!(matches!(err, TokenizeError::Malformed(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = JsonRowTokenizer::new().tokenize(b"not json").unwrap_err();
        assert!(matches!(err, TokenizeError::Json(_)));
    }
}
