//! Rule-based field extractors for purchase-order sheets.
//!
//! Every extractor looks for one labeled field. The scan offers each row to
//! every extractor; an extractor commits the first value it finds and ignores
//! the label from then on.

pub mod dates;
pub mod descriptions;
pub mod header;
pub mod multiline;
pub mod numbers;
pub mod patterns;
pub mod style;

pub use dates::DateExtractor;
pub use descriptions::{BrandExtractor, CommercialGoodsExtractor};
pub use header::{PoNumberExtractor, ShippingExtractor};
pub use multiline::{resolve_multiline, DEFAULT_WINDOW};
pub use numbers::{digits_only, parse_cost, parse_quantity};
pub use style::{StyleExtractor, StyleProtoExtractor};

use crate::models::order::{DocumentMetadata, PurchaseOrderHeader, ShippingInfo};
use crate::rows::Row;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// Name used in trace output.
    fn name(&self) -> &'static str;

    /// Offer row `index` to the extractor. Writes into `fields` only while
    /// the extractor's own fields are still unset.
    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator);
}

/// Field values collected during the pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAccumulator {
    pub header: PurchaseOrderHeader,
    pub shipping: ShippingInfo,
    pub metadata: DocumentMetadata,
}

impl FieldAccumulator {
    /// Number of fields that hold a value.
    pub fn filled(&self) -> usize {
        let header = [&self.header.po];
        let shipping = [
            &self.shipping.buyer,
            &self.shipping.vendor,
            &self.shipping.shipping_destination,
        ];
        let metadata = [
            &self.metadata.style,
            &self.metadata.style_description,
            &self.metadata.brand_desc,
            &self.metadata.commercial_goods,
            &self.metadata.original_crd_date,
            &self.metadata.original_in_dc_date,
            &self.metadata.style_proto,
        ];

        header
            .iter()
            .chain(shipping.iter())
            .chain(metadata.iter())
            .filter(|field| field.is_some())
            .count()
    }
}

/// Guarded write: store `value` if the slot is empty and the value is not
/// blank. Returns whether the slot was written.
pub fn set_once(slot: &mut Option<String>, value: Option<String>) -> bool {
    if slot.is_some() {
        return false;
    }

    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::rows::{normalize_rows, Row};

    /// Normalize single-cell rows from plain lines.
    pub fn lines(lines: &[&str]) -> Vec<Row> {
        let raw: Vec<Vec<String>> = lines.iter().map(|l| vec![l.to_string()]).collect();
        normalize_rows(&raw)
    }

    /// Run one extractor over every row.
    pub fn run<E: super::FieldExtractor>(extractor: &E, rows: &[Row]) -> super::FieldAccumulator {
        let mut fields = super::FieldAccumulator::default();
        for index in 0..rows.len() {
            extractor.scan(rows, index, &mut fields);
        }
        fields
    }
}
