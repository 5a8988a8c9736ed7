//! Error types for the poscan-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::order::FailureKind;

/// Main error type for the poscan library.
///
/// Only document-level failures live here. Row-level mismatches (a row that
/// looks like nothing in particular, a quantity cell reading `N/A`) are
/// absorbed by the extractors and never surface as errors.
#[derive(Error, Debug)]
pub enum PoError {
    /// The source document never became readable within the retry budget.
    #[error("file not found or unreadable after {attempts} attempts: {}", path.display())]
    SourceUnreadable { path: PathBuf, attempts: u32 },

    /// The row tokenizer failed or produced malformed output.
    #[error("tokenization failed: {0}")]
    Tokenize(#[from] TokenizeError),

    /// The input is not a document type we can tokenize.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PoError {
    /// Classify this error for the per-document result.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            PoError::SourceUnreadable { .. } | PoError::Io(_) => FailureKind::SourceUnreadable,
            PoError::Tokenize(_) => FailureKind::TokenizationFailed,
            PoError::UnsupportedInput(_) => FailureKind::UnsupportedInput,
            PoError::Config(_) => FailureKind::Internal,
        }
    }
}

/// Errors reported by a row tokenizer.
#[derive(Error, Debug)]
pub enum TokenizeError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Pre-tokenized rows were not valid JSON.
    #[error("invalid row JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The tokenizer output was not a sequence of rows.
    #[error("malformed rows: {0}")]
    Malformed(String),
}

/// Result type for the poscan library.
pub type Result<T> = std::result::Result<T, PoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_message_names_path() {
        let err = PoError::SourceUnreadable {
            path: PathBuf::from("/tmp/missing.pdf"),
            attempts: 10,
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.pdf"));
        assert!(message.contains("10 attempts"));
        assert_eq!(err.failure_kind(), FailureKind::SourceUnreadable);
    }

    #[test]
    fn test_tokenize_errors_are_tokenization_failures() {
        let err = PoError::from(TokenizeError::Malformed("expected an array".to_string()));
        assert_eq!(err.failure_kind(), FailureKind::TokenizationFailed);
        assert!(err.to_string().starts_with("tokenization failed"));
    }
}
