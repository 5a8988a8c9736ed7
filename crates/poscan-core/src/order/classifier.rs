//! Line-item row classification.
//!
//! Item rows are recognized by shape alone. The rules below are tried in
//! order and the first match wins; rows matching none of them (table
//! headers, page footers, stray text) are noise and are dropped.

use tracing::trace;

use super::rules::patterns::{COLOR_CODE, COLOR_SUBTOTAL_LABEL, NUMERIC_CELL};
use super::rules::{digits_only, parse_cost, parse_quantity};
use crate::models::order::LineItem;
use crate::rows::Row;

/// Minimum digit count of a UPC cell.
pub const MIN_UPC_DIGITS: usize = 12;

/// Minimum cell count of a UPC-anchored product row.
pub const MIN_UPC_ROW_CELLS: usize = 7;

/// Minimum cell count of a positional product row.
pub const MIN_POSITIONAL_ROW_CELLS: usize = 8;

/// Exact cell count of a color subtotal row.
pub const COLOR_SUBTOTAL_CELLS: usize = 5;

/// Shape of a normalized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Product line located by its UPC cell.
    UpcAnchored { upc_index: usize },
    /// Product line without a UPC, read at fixed offsets.
    PositionalFallback,
    /// `Total For Color:` aggregate row.
    ColorSubtotal,
    /// Anything else.
    Unrecognized,
}

/// A named classification rule.
struct ClassificationRule {
    name: &'static str,
    matches: fn(&Row) -> Option<RowKind>,
}

/// Rules in priority order.
const RULES: [ClassificationRule; 3] = [
    ClassificationRule {
        name: "upc_anchored",
        matches: upc_anchored,
    },
    ClassificationRule {
        name: "positional_fallback",
        matches: positional_fallback,
    },
    ClassificationRule {
        name: "color_subtotal",
        matches: color_subtotal,
    },
];

/// Classify a row by trying each rule in priority order.
pub fn classify(row: &Row) -> RowKind {
    for rule in &RULES {
        if let Some(kind) = (rule.matches)(row) {
            trace!("row matched {}: {:?}", rule.name, row.cells());
            return kind;
        }
    }
    RowKind::Unrecognized
}

/// Classify a row and build its line item. `None` for noise rows.
pub fn line_item(row: &Row) -> Option<LineItem> {
    match classify(row) {
        RowKind::UpcAnchored { upc_index } => Some(upc_item(row, upc_index)),
        RowKind::PositionalFallback => Some(positional_item(row)),
        RowKind::ColorSubtotal => Some(subtotal_item(row)),
        RowKind::Unrecognized => None,
    }
}

/// Index of the first cell holding at least [`MIN_UPC_DIGITS`] digits.
fn upc_cell(row: &Row) -> Option<usize> {
    row.cells()
        .iter()
        .position(|cell| digits_only(cell).len() >= MIN_UPC_DIGITS)
}

fn upc_anchored(row: &Row) -> Option<RowKind> {
    if row.len() < MIN_UPC_ROW_CELLS {
        return None;
    }
    upc_cell(row).map(|upc_index| RowKind::UpcAnchored { upc_index })
}

fn positional_fallback(row: &Row) -> Option<RowKind> {
    let matches = row.len() >= MIN_POSITIONAL_ROW_CELLS
        && COLOR_CODE.is_match(row.cell(0))
        && upc_cell(row).is_none();
    matches.then_some(RowKind::PositionalFallback)
}

// "Total For Color:" rows are kept as line items on purpose; downstream
// sheets sum them per color. See `subtotal_item`.
fn color_subtotal(row: &Row) -> Option<RowKind> {
    let matches = row.len() == COLOR_SUBTOTAL_CELLS
        && COLOR_SUBTOTAL_LABEL.is_match(row.cell(0))
        && (1..=3).all(|i| NUMERIC_CELL.is_match(row.cell(i)))
        && !NUMERIC_CELL.is_match(row.cell(4));
    matches.then_some(RowKind::ColorSubtotal)
}

/// Color, description and size lead the row; quantities and costs follow
/// the UPC cell at fixed offsets.
fn upc_item(row: &Row, upc_index: usize) -> LineItem {
    let after = |offset: usize| row.cell(upc_index + offset);

    LineItem {
        color: row.cell(0).to_string(),
        color_description: row.cell(1).to_string(),
        size: row.cell(2).to_string(),
        upc: digits_only(row.cell(upc_index)),
        original_quantity: parse_quantity(after(1)),
        current_quantity: parse_quantity(after(2)),
        shipped_quantity: parse_quantity(after(3)),
        unit_cost: parse_cost(after(4)),
        total_cost: parse_cost(after(5)),
    }
}

fn positional_item(row: &Row) -> LineItem {
    LineItem {
        color: row.cell(0).to_string(),
        color_description: row.cell(1).to_string(),
        size: row.cell(2).to_string(),
        upc: String::new(),
        original_quantity: parse_quantity(row.cell(3)),
        current_quantity: parse_quantity(row.cell(4)),
        shipped_quantity: parse_quantity(row.cell(5)),
        unit_cost: parse_cost(row.cell(6)),
        total_cost: parse_cost(row.cell(7)),
    }
}

/// Subtotal rows carry only the aggregate quantities and total cost. Size,
/// UPC and unit cost stay empty/zero, which is what marks them as subtotals.
/// The color code is kept when printed after the label.
fn subtotal_item(row: &Row) -> LineItem {
    let color = COLOR_SUBTOTAL_LABEL
        .captures(row.cell(0))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    LineItem {
        color,
        original_quantity: parse_quantity(row.cell(1)),
        current_quantity: parse_quantity(row.cell(2)),
        shipped_quantity: parse_quantity(row.cell(3)),
        total_cost: parse_cost(row.cell(4)),
        ..LineItem::default()
    }
}
