//! Original CRD / in-DC date extraction.

use regex::Regex;

use super::patterns::{ORIGINAL_CRD_DATE, ORIGINAL_IN_DC_DATE};
use super::{set_once, FieldAccumulator, FieldExtractor};
use crate::models::order::parse_sheet_date;
use crate::rows::Row;

/// Captures the `MM/DD/YYYY` token after each date label.
///
/// The date must sit on the label row; there is no lookahead. Tokens that
/// are not real calendar dates (`13/45/2024`) are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DateExtractor {
    fn name(&self) -> &'static str {
        "dates"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        let text = rows[index].text();
        let metadata = &mut fields.metadata;

        if metadata.original_crd_date.is_none() {
            set_once(&mut metadata.original_crd_date, labeled_date(&ORIGINAL_CRD_DATE, text));
        }

        if metadata.original_in_dc_date.is_none() {
            set_once(&mut metadata.original_in_dc_date, labeled_date(&ORIGINAL_IN_DC_DATE, text));
        }
    }
}

fn labeled_date(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let token = &caps[1];
    parse_sheet_date(token).map(|_| token.to_string())
}
