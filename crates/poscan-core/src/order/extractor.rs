//! Single-pass purchase-order extraction.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::classifier::line_item;
use super::rules::{
    BrandExtractor, CommercialGoodsExtractor, DateExtractor, FieldAccumulator, FieldExtractor,
    PoNumberExtractor, ShippingExtractor, StyleExtractor, StyleProtoExtractor, DEFAULT_WINDOW,
};
use crate::error::PoError;
use crate::models::config::{ExtractionConfig, SourceConfig};
use crate::models::order::{ExtractionResult, LineItem};
use crate::rows::{normalize_rows, Row};
use crate::source::read_source;
use crate::tokenize::RowTokenizer;

/// Walks normalized rows once, top to bottom.
///
/// Each row is offered to every field extractor and, independently, to the
/// line-item classifier. The scanner is consumed by [`RowScanner::finish`],
/// so a finished pass cannot be resumed.
pub struct RowScanner {
    extractors: Vec<Box<dyn FieldExtractor>>,
    fields: FieldAccumulator,
    items: Vec<LineItem>,
}

impl RowScanner {
    /// Scanner with the given extractors, in the order they see each row.
    pub fn new(extractors: Vec<Box<dyn FieldExtractor>>) -> Self {
        Self {
            extractors,
            fields: FieldAccumulator::default(),
            items: Vec::new(),
        }
    }

    /// Offer row `index` to every extractor and to the classifier.
    pub fn scan_row(&mut self, rows: &[Row], index: usize) {
        for extractor in &self.extractors {
            let before = self.fields.filled();
            extractor.scan(rows, index, &mut self.fields);
            if self.fields.filled() > before {
                trace!("row {} -> {}", index, extractor.name());
            }
        }

        if let Some(item) = line_item(&rows[index]) {
            trace!("row {} -> item {} {}", index, item.color, item.size);
            self.items.push(item);
        }
    }

    /// Scan every row in order.
    pub fn scan_all(&mut self, rows: &[Row]) {
        for index in 0..rows.len() {
            self.scan_row(rows, index);
        }
    }

    /// End the pass and package the record groups.
    pub fn finish(self) -> ExtractionResult {
        let FieldAccumulator {
            header,
            shipping,
            metadata,
        } = self.fields;
        ExtractionResult::completed(header, shipping, metadata, self.items)
    }
}

/// Extracts a purchase-order record set from tokenized rows.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseOrderExtractor {
    multiline_window: usize,
    brand_lookahead: usize,
}

impl PurchaseOrderExtractor {
    /// Create an extractor with default lookahead settings.
    pub fn new() -> Self {
        Self {
            multiline_window: DEFAULT_WINDOW,
            brand_lookahead: 2,
        }
    }

    /// Create an extractor from the `extraction` config section.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_multiline_window(config.multiline_window)
            .with_brand_lookahead(config.brand_lookahead)
    }

    /// Set the window used for style description and commercial goods.
    pub fn with_multiline_window(mut self, window: usize) -> Self {
        self.multiline_window = window;
        self
    }

    /// Set how many rows the brand fallback looks at.
    pub fn with_brand_lookahead(mut self, lookahead: usize) -> Self {
        self.brand_lookahead = lookahead;
        self
    }

    fn scanner(&self) -> RowScanner {
        RowScanner::new(vec![
            Box::new(PoNumberExtractor::new()),
            Box::new(ShippingExtractor::new()),
            Box::new(StyleExtractor::new().with_window(self.multiline_window)),
            Box::new(BrandExtractor::new().with_lookahead(self.brand_lookahead)),
            Box::new(CommercialGoodsExtractor::new().with_window(self.multiline_window)),
            Box::new(DateExtractor::new()),
            Box::new(StyleProtoExtractor::new()),
        ])
    }

    /// Extract from raw tokenizer rows. Never fails.
    pub fn extract_rows<R: AsRef<[String]>>(&self, rows: &[R]) -> ExtractionResult {
        let start = Instant::now();
        let rows = normalize_rows(rows);

        let mut scanner = self.scanner();
        scanner.scan_all(&rows);
        let result = scanner.finish();

        debug!(
            "Extracted PO {} with {} items from {} rows in {:?}",
            result.header.po.as_deref().unwrap_or("-"),
            result.items.len(),
            rows.len(),
            start.elapsed()
        );

        result
    }

    /// Tokenize document bytes and extract from the rows.
    pub fn extract_bytes(&self, data: &[u8], tokenizer: &dyn RowTokenizer) -> ExtractionResult {
        match tokenizer.tokenize(data) {
            Ok(rows) => self.extract_rows(&rows),
            Err(e) => {
                warn!("{} tokenizer failed: {}", tokenizer.name(), e);
                ExtractionResult::failure(&PoError::from(e))
            }
        }
    }

    /// Wait for `path` to become readable, then tokenize and extract it.
    pub fn extract_path(
        &self,
        path: &Path,
        tokenizer: &dyn RowTokenizer,
        source: &SourceConfig,
    ) -> ExtractionResult {
        info!("Extracting {}", path.display());

        match read_source(path, source) {
            Ok(data) => self.extract_bytes(&data, tokenizer),
            Err(e) => {
                warn!("{}", e);
                ExtractionResult::failure(&e)
            }
        }
    }
}

impl Default for PurchaseOrderExtractor {
    fn default() -> Self {
        Self::new()
    }
}
