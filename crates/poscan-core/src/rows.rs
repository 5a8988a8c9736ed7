//! Tokenizer rows and the row normalizer.

/// One tokenizer row: the ordered cell strings of a single document line.
pub type RawRow = Vec<String>;

/// A normalized row: non-blank, every cell trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
    text: String,
}

impl Row {
    /// Build a row from already-trimmed cells.
    fn from_trimmed(cells: Vec<String>) -> Self {
        let text = cells.join(" ");
        Self { cells, text }
    }

    /// Cells of this row.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell at `index`, empty when the row is shorter.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells joined by a single space. All label matching runs on this.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Drop rows whose cells are all blank and trim the cells of the rest.
pub fn normalize_rows<R: AsRef<[String]>>(rows: &[R]) -> Vec<Row> {
    rows.iter()
        .map(AsRef::as_ref)
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()))
        .map(|cells| Row::from_trimmed(cells.iter().map(|c| c.trim().to_string()).collect()))
        .collect()
}
