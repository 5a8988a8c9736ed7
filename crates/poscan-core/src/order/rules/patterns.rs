//! Common regex patterns for purchase-order sheet extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // PO number ("PO: 12345", "Purchase Order 12345")
    pub static ref PO_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:PO|Purchase\s+Order)[:\s]*(\d+)"
    ).unwrap();

    // Shipping block
    pub static ref BUYER_LABEL: Regex = Regex::new(
        r"(?i)buyer:"
    ).unwrap();

    // Style
    pub static ref STYLE_LABEL: Regex = Regex::new(
        r"(?i)style:"
    ).unwrap();

    pub static ref STYLE_VALUE: Regex = Regex::new(
        r"(?i)style:\s*(\S+)"
    ).unwrap();

    pub static ref STYLE_DESCRIPTION_LABEL: Regex = Regex::new(
        r"(?i)Style\s+Description:"
    ).unwrap();

    // Brand description
    pub static ref BRAND_LABEL: Regex = Regex::new(
        r"(?i)BRAND\s+DESC:"
    ).unwrap();

    pub static ref BRAND_LABEL_ONLY: Regex = Regex::new(
        r"(?i)^\s*BRAND\s+DESC:\s*$"
    ).unwrap();

    // Labels that end a same-row brand value
    pub static ref KNOWN_LABEL: Regex = Regex::new(
        r"(?i)PRODUCT\s+CATEGORY\s+DESC|STYLE\s+PROTO\s*#|COMMERCIAL\s+GOODS|Style\s+Description:|Original\s+CRD\s+Date:|Original\s+In-DC\s+Date:|\bstyle:|\bbuyer:"
    ).unwrap();

    // Commercial goods
    pub static ref COMMERCIAL_GOODS_LABEL: Regex = Regex::new(
        r"(?i)COMMERCIAL\s+GOODS"
    ).unwrap();

    // Labeled dates (MM/DD/YYYY on the label row)
    pub static ref ORIGINAL_CRD_DATE: Regex = Regex::new(
        r"(?i)Original\s+CRD\s+Date:\s*(\d{2}/\d{2}/\d{4})\b"
    ).unwrap();

    pub static ref ORIGINAL_IN_DC_DATE: Regex = Regex::new(
        r"(?i)Original\s+In-DC\s+Date:\s*(\d{2}/\d{2}/\d{4})\b"
    ).unwrap();

    // Style proto
    pub static ref STYLE_PROTO_LABEL: Regex = Regex::new(
        r"(?i)STYLE\s+PROTO\s*#"
    ).unwrap();

    // Item table
    pub static ref COLOR_CODE: Regex = Regex::new(
        r"^[A-Za-z]+\d+$"
    ).unwrap();

    pub static ref COLOR_SUBTOTAL_LABEL: Regex = Regex::new(
        r"(?i)^Total\s+For\s+Color:\s*(.*)$"
    ).unwrap();

    pub static ref NUMERIC_CELL: Regex = Regex::new(
        r"^-?\d[\d,]*(?:\.\d+)?$"
    ).unwrap();

    pub static ref LEADING_INTEGER: Regex = Regex::new(
        r"^[+-]?\d+"
    ).unwrap();

    pub static ref LEADING_DECIMAL: Regex = Regex::new(
        r"^-?\d*\.?\d+"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
