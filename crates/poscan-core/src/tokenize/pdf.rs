//! Text PDF tokenizer using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, RowTokenizer};
use crate::error::TokenizeError;
use crate::models::config::PdfConfig;
use crate::rows::RawRow;

/// Splits the embedded text of a PDF into rows of cells.
///
/// Every text line becomes a row. Cells are separated by tabs or by runs of
/// at least `min_column_gap` spaces, so single spaces inside a value
/// ("Style Description: Crew Neck Tee") stay within one cell.
#[derive(Debug, Clone)]
pub struct PdfRowTokenizer {
    min_column_gap: usize,
}

impl PdfRowTokenizer {
    /// Create a tokenizer with the default column gap.
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            min_column_gap: config.min_column_gap.max(1),
        }
    }

    /// Load the document, decrypting empty-password PDFs, and return bytes
    /// pdf-extract can read.
    fn readable_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| TokenizeError::Pdf(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(TokenizeError::NoPages);
        }
        debug!("Loaded PDF with {} pages", page_count);

        if !doc.is_encrypted() {
            return Ok(data.to_vec());
        }

        if doc.decrypt("").is_err() {
            return Err(TokenizeError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| TokenizeError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
        Ok(decrypted)
    }
}

impl Default for PdfRowTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RowTokenizer for PdfRowTokenizer {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn tokenize(&self, data: &[u8]) -> Result<Vec<RawRow>> {
        let bytes = self.readable_bytes(data)?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| TokenizeError::TextExtraction(e.to_string()))?;

        let rows: Vec<RawRow> = text
            .lines()
            .map(|line| split_cells(line, self.min_column_gap))
            .collect();

        trace!("Tokenized {} chars of PDF text into {} rows", text.len(), rows.len());
        Ok(rows)
    }
}

/// Split one text line into cells.
///
/// Tabs always separate cells; spaces do when at least `min_gap` of them
/// appear in a row. Empty cells are not produced, blank lines yield an
/// empty row which the normalizer drops later.
pub fn split_cells(line: &str, min_gap: usize) -> RawRow {
    let min_gap = min_gap.max(1);
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut spaces = 0usize;

    for c in line.chars() {
        match c {
            '\t' => {
                spaces = 0;
                flush(&mut current, &mut cells);
            }
            ' ' | '\u{00a0}' => spaces += 1,
            _ => {
                if spaces >= min_gap {
                    flush(&mut current, &mut cells);
                } else if spaces > 0 {
                    current.extend(std::iter::repeat_n(' ', spaces));
                }
                spaces = 0;
                current.push(c);
            }
        }
    }
    flush(&mut current, &mut cells);

    cells
}

fn flush(current: &mut String, cells: &mut Vec<String>) {
    let cell = current.trim();
    if !cell.is_empty() {
        cells.push(cell.to_string());
    }
    current.clear();
}
