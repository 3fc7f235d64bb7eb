use thiserror::Error;

/// An in-memory ordered collection of rows, each a Vec of cell strings.
/// The unit of data passed between pipeline stages; concatenation is plain
/// row-append, with no header reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowTable {
    rows: Vec<Vec<String>>,
}

/// A positional column selection asked for an index a row does not cover.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row} has {width} columns, cannot select index {index}")]
pub struct SelectError {
    pub row: usize,
    pub width: usize,
    pub index: usize,
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Append all of `other`'s rows after this table's rows.
    pub fn append(&mut self, mut other: RowTable) {
        self.rows.append(&mut other.rows);
    }

    /// Row-wise concatenation in iteration order.
    pub fn concat(tables: impl IntoIterator<Item = RowTable>) -> RowTable {
        let mut merged = RowTable::new();
        for t in tables {
            merged.append(t);
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Keep only the given positional columns, in the given order.
    /// Every row must cover every requested index.
    pub fn select(&self, indices: &[usize]) -> Result<RowTable, SelectError> {
        let mut out = Vec::with_capacity(self.rows.len());
        for (row_no, row) in self.rows.iter().enumerate() {
            let mut selected = Vec::with_capacity(indices.len());
            for &idx in indices {
                let cell = row.get(idx).ok_or(SelectError {
                    row: row_no,
                    width: row.len(),
                    index: idx,
                })?;
                selected.push(cell.clone());
            }
            out.push(selected);
        }
        Ok(RowTable { rows: out })
    }

    /// Rows padded with empty strings to the widest row, ready for a
    /// destination with uniform text cells and no native null.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        self.rows
            .iter()
            .map(|row| {
                let mut cells = row.clone();
                cells.resize(width, String::new());
                cells
            })
            .collect()
    }
}

impl From<Vec<Vec<String>>> for RowTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        RowTable { rows }
    }
}
