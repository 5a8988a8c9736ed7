//! Purchase-order extraction: field rules, row classification and the
//! single-pass assembler.

pub mod classifier;
mod extractor;
pub mod rules;

pub use classifier::{classify, line_item, RowKind};
pub use extractor::{PurchaseOrderExtractor, RowScanner};
pub use rules::{FieldAccumulator, FieldExtractor};
