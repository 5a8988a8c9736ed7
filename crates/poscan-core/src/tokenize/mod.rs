//! Document-to-rows tokenizers.
//!
//! The extraction engine never looks at document bytes. A tokenizer turns
//! them into rows of cell strings, either by reading a text PDF or by
//! accepting rows that were tokenized elsewhere.

mod json;
mod pdf;

pub use json::JsonRowTokenizer;
pub use pdf::{PdfRowTokenizer, split_cells};

use std::path::Path;

use crate::error::{PoError, TokenizeError};
use crate::models::config::PdfConfig;
use crate::rows::RawRow;

/// Result type for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizeError>;

/// Trait for document tokenizers.
pub trait RowTokenizer {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Turn document bytes into rows, or fail for the whole document.
    fn tokenize(&self, data: &[u8]) -> Result<Vec<RawRow>>;
}

/// Pick a tokenizer from the file extension.
///
/// `.pdf` files go through the PDF text tokenizer, `.json` files are
/// treated as pre-tokenized rows. Anything else is rejected.
pub fn tokenizer_for_path(
    path: &Path,
    config: &PdfConfig,
) -> std::result::Result<Box<dyn RowTokenizer + Send + Sync>, PoError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Ok(Box::new(PdfRowTokenizer::from_config(config))),
        "json" => Ok(Box::new(JsonRowTokenizer::new())),
        _ => Err(PoError::UnsupportedInput(format!(
            "only PDF files (or pre-tokenized JSON rows) are allowed: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_selection() {
        let config = PdfConfig::default();
        assert_eq!(tokenizer_for_path(Path::new("a/PO-1.PDF"), &config).unwrap().name(), "pdf");
        assert_eq!(tokenizer_for_path(Path::new("rows.json"), &config).unwrap().name(), "json");

        let err = tokenizer_for_path(Path::new("scan.png"), &config).err().unwrap();
        assert!(matches!(err, PoError::UnsupportedInput(_)));
    }
}
