//! Bounded lookahead for values that continue past their label row.

use regex::Regex;

use crate::rows::Row;

/// Default number of rows scanned for a label, counting the start row.
pub const DEFAULT_WINDOW: usize = 3;

/// Resolve a labeled value that may sit on the row after its label.
///
/// Scans `rows[start..start + window]` for the first row matching `label`.
/// The value is the text after the match on that row, with a leading `:`
/// dropped; when nothing follows the label, the whole next row is the
/// value. Returns `None` when the label is not in the window or the value
/// is blank.
///
/// Extractors pass the same pattern they trigger on, so any row that
/// starts a lookup can also anchor it.
pub fn resolve_multiline(
    rows: &[Row],
    start: usize,
    label: &Regex,
    window: usize,
) -> Option<String> {
    let end = start.saturating_add(window).min(rows.len());

    for index in start..end {
        let text = rows[index].text();
        let Some(found) = label.find(text) else {
            continue;
        };

        let after = text[found.end()..].trim_start();
        let after = after.strip_prefix(':').unwrap_or(after).trim();

        let value = if after.is_empty() {
            rows.get(index + 1).map(|next| next.text().trim()).unwrap_or("")
        } else {
            after
        };

        return (!value.is_empty()).then(|| value.to_string());
    }

    None
}
