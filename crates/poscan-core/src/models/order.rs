//! Purchase-order record set produced by a single extraction pass.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::PoError;

/// Date format used by the purchase-order sheets (`MM/DD/YYYY`).
pub const SHEET_DATE_FORMAT: &str = "%m/%d/%Y";

/// Purchase order header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderHeader {
    /// Numeric purchase order identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po: Option<String>,
}

/// Shipping block read from the three rows after the `buyer:` label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_destination: Option<String>,
}

/// Style, brand and date fields. Each one is resolved at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_goods: Option<String>,

    /// Original CRD date as printed (`MM/DD/YYYY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_crd_date: Option<String>,

    /// Original in-DC date as printed (`MM/DD/YYYY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_in_dc_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_proto: Option<String>,
}

impl DocumentMetadata {
    /// Original CRD date as a calendar date.
    pub fn crd_date(&self) -> Option<NaiveDate> {
        parse_sheet_date(self.original_crd_date.as_deref()?)
    }

    /// Original in-DC date as a calendar date.
    pub fn in_dc_date(&self) -> Option<NaiveDate> {
        parse_sheet_date(self.original_in_dc_date.as_deref()?)
    }
}

/// Parse a `MM/DD/YYYY` sheet date.
pub fn parse_sheet_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), SHEET_DATE_FORMAT).ok()
}

/// A single row of the item table.
///
/// Color subtotal rows are carried as line items too: they have an empty
/// size and UPC and a zero unit cost, see [`LineItem::is_color_subtotal`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub color: String,

    pub color_description: String,

    pub size: String,

    /// Digits only; empty when the row had no UPC cell.
    pub upc: String,

    pub original_quantity: u32,

    pub current_quantity: u32,

    pub shipped_quantity: u32,

    pub unit_cost: Decimal,

    pub total_cost: Decimal,
}

impl LineItem {
    /// Whether this item came from a `Total For Color:` row.
    pub fn is_color_subtotal(&self) -> bool {
        self.size.is_empty() && self.upc.is_empty() && self.unit_cost.is_zero()
    }
}

/// Why a document produced no record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Bytes could not be obtained within the retry budget.
    SourceUnreadable,
    /// The tokenizer errored or returned something other than rows.
    TokenizationFailed,
    /// Not a document type the tokenizers accept.
    UnsupportedInput,
    /// Anything else (configuration, worker crash).
    Internal,
}

/// Outcome of extracting one document.
///
/// Serialized successes always carry `items`, empty or not; failures carry
/// no item list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,

    #[serde(default)]
    pub header: PurchaseOrderHeader,

    #[serde(default)]
    pub shipping: ShippingInfo,

    #[serde(default)]
    pub metadata: DocumentMetadata,

    /// Line items in document row order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl ExtractionResult {
    /// Successful result from the four record groups.
    pub fn completed(
        header: PurchaseOrderHeader,
        shipping: ShippingInfo,
        metadata: DocumentMetadata,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            success: true,
            header,
            shipping,
            metadata,
            items,
            error: None,
            failure: None,
        }
    }

    /// Terminal failure for a document.
    pub fn failure(err: &PoError) -> Self {
        Self::failed(err.failure_kind(), err.to_string())
    }

    /// Terminal failure with an explicit kind and message.
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            failure: Some(kind),
            ..Self::default()
        }
    }

    /// Reasons a successful result is still not usable downstream.
    ///
    /// A missing PO number or an empty item table is not an extraction error,
    /// callers decide what to do with such documents.
    pub fn usability_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.success {
            issues.push(self.error.clone().unwrap_or_else(|| "Extraction failed".to_string()));
            return issues;
        }

        if self.header.po.is_none() {
            issues.push("Missing PO number".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        issues
    }

    /// Whether the result has both a PO number and at least one line item.
    pub fn is_usable(&self) -> bool {
        self.usability_issues().is_empty()
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExtractionResult", 7)?;
        state.serialize_field("success", &self.success)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("shipping", &self.shipping)?;
        state.serialize_field("metadata", &self.metadata)?;

        if self.success {
            state.serialize_field("items", &self.items)?;
        } else {
            state.skip_field("items")?;
        }

        match &self.error {
            Some(error) => state.serialize_field("error", error)?,
            None => state.skip_field("error")?,
        }
        match &self.failure {
            Some(failure) => state.serialize_field("failure", failure)?,
            None => state.skip_field("failure")?,
        }

        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_date_parsing() {
        let metadata = DocumentMetadata {
            original_crd_date: Some("03/15/2024".to_string()),
            original_in_dc_date: Some("13/40/2024".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.crd_date(), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(metadata.in_dc_date(), None);
    }

    #[test]
    fn test_color_subtotal_detection() {
        let subtotal = LineItem {
            color: "001".to_string(),
            original_quantity: 120,
            total_cost: Decimal::new(30000, 2),
            ..Default::default()
        };
        assert!(subtotal.is_color_subtotal());

        let product = LineItem {
            size: "M".to_string(),
            upc: "123456789012".to_string(),
            unit_cost: Decimal::new(250, 2),
            ..Default::default()
        };
        assert!(!product.is_color_subtotal());
    }

    #[test]
    fn test_usability_issues() {
        let empty = ExtractionResult::completed(
            PurchaseOrderHeader::default(),
            ShippingInfo::default(),
            DocumentMetadata::default(),
            Vec::new(),
        );
        assert!(empty.success);
        assert_eq!(empty.usability_issues(), vec!["Missing PO number", "No line items"]);

        let failed = ExtractionResult::failed(FailureKind::TokenizationFailed, "bad rows");
        assert!(!failed.is_usable());
        assert_eq!(failed.usability_issues(), vec!["bad rows"]);
    }

    #[test]
    fn test_failure_serialization_has_no_items() {
        let failed = ExtractionResult::failed(FailureKind::SourceUnreadable, "gone");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["failure"], "source_unreadable");
        assert!(json.get("items").is_none());
    }

    #[test]
    fn test_empty_success_serializes_items() {
        let empty = ExtractionResult::completed(
            PurchaseOrderHeader {
                po: Some("1".to_string()),
            },
            ShippingInfo::default(),
            DocumentMetadata::default(),
            Vec::new(),
        );
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["items"], serde_json::json!([]));
        assert!(json.get("error").is_none());

        let back: ExtractionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, empty);
    }
}
