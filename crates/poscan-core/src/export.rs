//! Merged export of many extracted documents.
//!
//! Every line item of every usable document becomes one [`FlatRow`] carrying
//! its document's PO and metadata. Rows are ordered by PO, then by garment
//! size (`XS < S < M < L < XL < 2XL = XXL < 3XL < 4XL < 5XL`).

use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::order::ExtractionResult;

/// Canonical sizes, smallest first. `XXL` normalizes to `2XL`.
pub const SIZE_ORDER: [&str; 9] = ["XS", "S", "M", "L", "XL", "2XL", "3XL", "4XL", "5XL"];

lazy_static! {
    static ref LEADING_EXTRA: Regex = Regex::new(r"^EXTRA[\s-]*").unwrap();
    static ref REPEATED_X: Regex = Regex::new(r"^(X{2,})([LS])$").unwrap();
}

/// One processed document, as reported per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub file: String,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Extracted record groups.
    pub tables: ExtractionResult,
}

impl DocumentOutcome {
    pub fn new(file: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            file: file.into(),
            success: result.success,
            error: result.error.clone(),
            tables: result,
        }
    }
}

/// A line item joined with its document's header and metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    #[serde(rename = "PO")]
    pub po: String,
    #[serde(rename = "Style")]
    pub style: String,
    #[serde(rename = "Style Description")]
    pub style_description: String,
    #[serde(rename = "Brand")]
    pub brand_desc: String,
    #[serde(rename = "Commercial Goods")]
    pub commercial_goods: String,
    #[serde(rename = "Original CRD")]
    pub original_crd_date: String,
    #[serde(rename = "Original In-DC")]
    pub original_in_dc_date: String,
    #[serde(rename = "Style Proto")]
    pub style_proto: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Color Description")]
    pub color_description: String,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "UPC")]
    pub upc: String,
    #[serde(rename = "Original Qty")]
    pub original_quantity: u32,
    #[serde(rename = "Current Qty")]
    pub current_quantity: u32,
    #[serde(rename = "Shipped Qty")]
    pub shipped_quantity: u32,
    #[serde(rename = "Unit Cost")]
    pub unit_cost: Decimal,
    #[serde(rename = "Total Cost")]
    pub total_cost: Decimal,
}

/// Merged rows plus per-file problems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Sorted rows of every usable document.
    pub rows: Vec<FlatRow>,
    /// One message per skipped document.
    pub errors: Vec<String>,
    /// Documents whose extraction succeeded.
    pub processed_files: usize,
    pub total_files: usize,
}

/// Flatten outcomes into sorted rows.
///
/// Failed documents and documents without a PO number or line items are
/// skipped with a `File N (name): ...` message; N counts from 1.
pub fn flatten_outcomes(outcomes: &[DocumentOutcome]) -> ExportReport {
    let mut report = ExportReport {
        total_files: outcomes.len(),
        ..Default::default()
    };

    for (index, outcome) in outcomes.iter().enumerate() {
        let label = format!("File {} ({})", index + 1, outcome.file);
        let result = &outcome.tables;

        if !result.success {
            let reason = result.error.as_deref().unwrap_or("extraction failed");
            report.errors.push(format!("{}: {}", label, reason));
            continue;
        }
        report.processed_files += 1;

        if result.header.po.is_none() || result.items.is_empty() {
            report.errors.push(format!("{}: Missing required data", label));
            continue;
        }

        report.rows.extend(flatten_result(result));
    }

    sort_rows(&mut report.rows);

    if !report.errors.is_empty() {
        warn!("{} of {} files skipped in export", report.errors.len(), report.total_files);
    }
    debug!("Flattened {} rows from {} files", report.rows.len(), report.total_files);

    report
}

/// Rows of a single document, in item order. A missing PO becomes an empty
/// cell.
pub fn flatten_result(result: &ExtractionResult) -> Vec<FlatRow> {
    let po = result.header.po.clone().unwrap_or_default();
    let meta = &result.metadata;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    result
        .items
        .iter()
        .map(|item| FlatRow {
            po: po.clone(),
            style: text(&meta.style),
            style_description: text(&meta.style_description),
            brand_desc: text(&meta.brand_desc),
            commercial_goods: text(&meta.commercial_goods),
            original_crd_date: text(&meta.original_crd_date),
            original_in_dc_date: text(&meta.original_in_dc_date),
            style_proto: text(&meta.style_proto),
            color: item.color.clone(),
            color_description: item.color_description.clone(),
            size: item.size.clone(),
            upc: item.upc.clone(),
            original_quantity: item.original_quantity,
            current_quantity: item.current_quantity,
            shipped_quantity: item.shipped_quantity,
            unit_cost: item.unit_cost,
            total_cost: item.total_cost,
        })
        .collect()
}

/// Normalize a printed size for comparison.
///
/// Uppercases, turns each leading `EXTRA` into an `X`, maps the spelled-out
/// `LARGE` / `SMALL` / `MEDIUM`, removes whitespace and writes repeated X as a
/// count (`XXL` and `Extra Extra Large` both become `2XL`).
pub fn normalize_size(size: &str) -> String {
    let mut rest = size.trim().to_uppercase();
    let mut extras = 0;

    while let Some(m) = LEADING_EXTRA.find(&rest) {
        extras += 1;
        rest = rest[m.end()..].to_string();
    }

    let compact: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    let base = match compact.as_str() {
        "LARGE" => "L",
        "SMALL" => "S",
        "MEDIUM" => "M",
        other => other,
    };
    let joined = format!("{}{}", "X".repeat(extras), base);

    match REPEATED_X.captures(&joined) {
        Some(caps) => format!("{}X{}", caps[1].len(), &caps[2]),
        None => joined,
    }
}

/// Position of a size in [`SIZE_ORDER`], `None` for non-canonical sizes.
pub fn size_rank(size: &str) -> Option<usize> {
    let normalized = normalize_size(size);
    SIZE_ORDER.iter().position(|s| *s == normalized)
}

/// Canonical sizes in canonical order, then everything else by normalized
/// text.
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    match (size_rank(a), size_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => normalize_size(a).cmp(&normalize_size(b)),
    }
}

/// PO first, then size.
pub fn compare_rows(a: &FlatRow, b: &FlatRow) -> Ordering {
    a.po.cmp(&b.po).then_with(|| compare_sizes(&a.size, &b.size))
}

/// Stable sort by [`compare_rows`]; equal keys keep document order.
pub fn sort_rows(rows: &mut [FlatRow]) {
    rows.sort_by(compare_rows);
}
