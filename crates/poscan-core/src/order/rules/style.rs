//! Style, style description and style proto extraction.

use super::multiline::{resolve_multiline, DEFAULT_WINDOW};
use super::patterns::{STYLE_DESCRIPTION_LABEL, STYLE_LABEL, STYLE_PROTO_LABEL, STYLE_VALUE};
use super::{set_once, FieldAccumulator, FieldExtractor};
use crate::rows::Row;

/// Placeholder printed in the proto column when no proto id exists.
pub const PROTO_PLACEHOLDER: &str = "HANGER";

/// Captures the token after `style:` and resolves the style description
/// from the rows starting at the style row.
#[derive(Debug, Clone, Copy)]
pub struct StyleExtractor {
    window: usize,
}

impl StyleExtractor {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }

    /// Set the description lookahead window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

impl Default for StyleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StyleExtractor {
    fn name(&self) -> &'static str {
        "style"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        let text = rows[index].text();
        if fields.metadata.style.is_some() || !STYLE_LABEL.is_match(text) {
            return;
        }

        let style = STYLE_VALUE.captures(text).map(|caps| caps[1].to_string());
        if set_once(&mut fields.metadata.style, style) {
            let description =
                resolve_multiline(rows, index, &STYLE_DESCRIPTION_LABEL, self.window);
            set_once(&mut fields.metadata.style_description, description);
        }
    }
}

/// Captures the token after the first `#` on a `STYLE PROTO #` row.
///
/// `HANGER` is not a proto id: sheets print it when the style has no proto.
/// It is treated as absent, so a later `STYLE PROTO #` row may still supply
/// the real value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleProtoExtractor;

impl StyleProtoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for StyleProtoExtractor {
    fn name(&self) -> &'static str {
        "style_proto"
    }

    fn scan(&self, rows: &[Row], index: usize, fields: &mut FieldAccumulator) {
        let text = rows[index].text();
        if fields.metadata.style_proto.is_some() || !STYLE_PROTO_LABEL.is_match(text) {
            return;
        }

        let proto = proto_token(text).filter(|token| *token != PROTO_PLACEHOLDER);
        set_once(&mut fields.metadata.style_proto, proto.map(str::to_string));
    }
}

/// Token after the first `#`, skipping an optional `:` and whitespace.
fn proto_token(text: &str) -> Option<&str> {
    let (_, after) = text.split_once('#')?;
    let after = after.strip_prefix(':').unwrap_or(after);
    after.split_whitespace().next()
}
