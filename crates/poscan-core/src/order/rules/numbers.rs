//! Lenient number parsing for item-table cells.
//!
//! Item cells are noisy (`"N/A"`, `"$1,250.00"`, `"12 pcs"`). A cell that
//! does not parse is worth zero; it never fails the row.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{LEADING_DECIMAL, LEADING_INTEGER};

/// Keep only the ASCII digits of `s`.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a quantity cell.
///
/// Reads the leading integer after dropping thousands separators, so
/// `"1,200"` is 1200 and `"12 pcs"` is 12. Unparsable or negative cells are 0.
pub fn parse_quantity(s: &str) -> u32 {
    let cleaned = s.trim().replace(',', "");

    LEADING_INTEGER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Parse a cost cell.
///
/// Everything except digits, `.` and `-` is stripped, then the leading
/// number is read and the rest ignored: `"$1,250.00"` is 1250.00 and
/// `"25.00 ea."` is 25.00. Unparsable or negative values are zero.
pub fn parse_cost(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    LEADING_DECIMAL
        .find(&cleaned)
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
        .filter(|d| d.is_sign_positive())
        .unwrap_or(Decimal::ZERO)
}
