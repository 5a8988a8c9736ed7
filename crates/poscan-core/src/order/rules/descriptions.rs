//! Brand description and commercial goods extraction.

use super::multiline::{resolve_multiline, DEFAULT_WINDOW};
use super::patterns::{BRAND_LABEL, BRAND_LABEL_ONLY, COMMERCIAL_GOODS_LABEL, KNOWN_LABEL, WHITESPACE_RUN};
use super::{set_once, FieldAccumulator, FieldExtractor};
use crate::rows::Row;

/// Resolves `BRAND DESC:` with three fallbacks, in order:
///
/// 1. text after the label on the same row, up to the next known label;
/// 2. the whole next row, when the row holds nothing but the label;
/// 3. the first of the next `lookahead` rows that is not itself a
///    `label: value` row.
///
/// Whitespace in the result is collapsed to single spaces.
#[derive(Debug, Clone, Copy)]
pub struct BrandExtractor {
    lookahead: usize,
}

impl BrandExtractor {
    pub fn new() -> Self {
        Self { lookahead: 2 }
    }

    /// Set how many rows the last fallback considers.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    fn resolve(&self, rows: &[Row], index: usize) -> Option<String> {
        let text = rows[index].text();

        if let Some(value) = same_row_value(text) {
            return Some(value);
        }

        if BRAND_LABEL_ONLY.is_match(text) {
            return rows.get(index + 1).map(|next| next.text().to_string());
        }

        rows.iter()
            .skip(index + 1)
            .take(self.lookahead)
            .map(|row| row.text().trim())
            .find(|line| !line.is_empty() && !line.contains(':'))
            .map(str::to_string)
    }
}

impl Default for BrandExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BrandExtractor {
    fn name(&self) -> &'static str {
        "brand_desc"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        if fields.metadata.brand_desc.is_some() || !BRAND_LABEL.is_match(rows[index].text()) {
            return;
        }

        let brand = self
            .resolve(rows, index)
            .map(|value| WHITESPACE_RUN.replace_all(&value, " ").trim().to_string());
        set_once(&mut fields.metadata.brand_desc, brand);
    }
}

/// Text between `BRAND DESC:` and the next known label on the same row.
fn same_row_value(text: &str) -> Option<String> {
    let label = BRAND_LABEL.find(text)?;
    let rest = &text[label.end()..];
    let end = KNOWN_LABEL.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    let value = rest[..end].trim();

    (!value.is_empty()).then(|| value.to_string())
}

/// Resolves the `COMMERCIAL GOODS` description through the multi-line
/// resolver.
#[derive(Debug, Clone, Copy)]
pub struct CommercialGoodsExtractor {
    window: usize,
}

impl CommercialGoodsExtractor {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }

    /// Set the lookahead window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

impl Default for CommercialGoodsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CommercialGoodsExtractor {
    fn name(&self) -> &'static str {
        "commercial_goods"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        if fields.metadata.commercial_goods.is_some()
            || !COMMERCIAL_GOODS_LABEL.is_match(rows[index].text())
        {
            return;
        }

        let goods = resolve_multiline(rows, index, &COMMERCIAL_GOODS_LABEL, self.window);
        set_once(&mut fields.metadata.commercial_goods, goods);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::rules::test_support::{lines, run};

    fn brand(rows: &[&str]) -> Option<String> {
        run(&BrandExtractor::new(), &lines(rows)).metadata.brand_desc
    }

    #[test]
    fn test_brand_same_row() {
        assert_eq!(brand(&["BRAND DESC: Acme"]).as_deref(), Some("Acme"));
    }

    #[test]
    fn test_brand_stops_at_next_label() {
        assert_eq!(
            brand(&["BRAND DESC:  Acme   Basics PRODUCT CATEGORY DESC: Knit Tops"]).as_deref(),
            Some("Acme Basics")
        );
    }

    #[test]
    fn test_brand_label_alone_takes_next_row() {
        assert_eq!(
            brand(&["BRAND DESC:", "Division: Mens"]).as_deref(),
            Some("Division: Mens")
        );
    }

    #[test]
    fn test_brand_skips_label_rows() {
        assert_eq!(
            brand(&[
                "BRAND DESC: PRODUCT CATEGORY DESC: Tops",
                "SEASON: FA24",
                "Acme   Outdoor",
            ])
            .as_deref(),
            Some("Acme Outdoor")
        );
    }

    #[test]
    fn test_brand_lookahead_is_bounded() {
        assert_eq!(
            brand(&[
                "BRAND DESC: PRODUCT CATEGORY DESC: Tops",
                "SEASON: FA24",
                "DIVISION: 12",
                "Too Far",
            ]),
            None
        );
    }

    #[test]
    fn test_commercial_goods() {
        let rows = lines(&["COMMERCIAL GOODS", "Knit pullover, 60% cotton 40% polyester"]);
        let fields = run(&CommercialGoodsExtractor::new(), &rows);
        assert_eq!(
            fields.metadata.commercial_goods.as_deref(),
            Some("Knit pullover, 60% cotton 40% polyester")
        );
    }

    #[test]
    fn test_commercial_goods_label_with_wide_spacing() {
        let fields = run(
            &CommercialGoodsExtractor::new(),
            &lines(&["COMMERCIAL  GOODS: Knit pullover"]),
        );
        assert_eq!(fields.metadata.commercial_goods.as_deref(), Some("Knit pullover"));
    }
}
