//! Core library for purchase-order sheet extraction.
//!
//! This crate provides:
//! - Document tokenizers (text PDF and pre-tokenized JSON rows)
//! - Row normalization and label-anchored field extraction
//! - Line-item classification (UPC rows, positional rows, color subtotals)
//! - Merged export rows with PO / garment size ordering

pub mod error;
pub mod export;
pub mod models;
pub mod order;
pub mod rows;
pub mod source;
pub mod tokenize;

pub use error::{PoError, Result, TokenizeError};
pub use export::{
    flatten_outcomes, flatten_result, sort_rows, DocumentOutcome, ExportReport, FlatRow,
};
pub use models::config::PoConfig;
pub use models::order::{
    DocumentMetadata, ExtractionResult, FailureKind, LineItem, PurchaseOrderHeader, ShippingInfo,
};
pub use order::{PurchaseOrderExtractor, RowKind};
pub use rows::{normalize_rows, RawRow, Row};
pub use source::read_source;
pub use tokenize::{tokenizer_for_path, JsonRowTokenizer, PdfRowTokenizer, RowTokenizer};
