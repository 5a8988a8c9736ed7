//! PO number and shipping block extraction.

use super::patterns::{BUYER_LABEL, PO_NUMBER};
use super::{set_once, FieldAccumulator, FieldExtractor};
use crate::rows::Row;

/// Captures the digit run after a `PO` / `Purchase Order` label.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoNumberExtractor;

impl PoNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for PoNumberExtractor {
    fn name(&self) -> &'static str {
        "po_number"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        if fields.header.po.is_some() {
            return;
        }

        let po = PO_NUMBER
            .captures(rows[index].text())
            .map(|caps| caps[1].to_string());
        set_once(&mut fields.header.po, po);
    }
}

/// Reads buyer, vendor and destination from the three rows after `buyer:`.
///
/// The rows are taken verbatim; no further parsing is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingExtractor;

impl ShippingExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for ShippingExtractor {
    fn name(&self) -> &'static str {
        "shipping"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        if fields.shipping.buyer.is_some() || !BUYER_LABEL.is_match(rows[index].text()) {
            return;
        }

        let row_text = |offset: usize| rows.get(index + offset).map(|r| r.text().to_string());

        let shipping = &mut fields.shipping;
        set_once(&mut shipping.buyer, row_text(1));
        set_once(&mut shipping.vendor, row_text(2));
        set_once(&mut shipping.shipping_destination, row_text(3));
    }
}
