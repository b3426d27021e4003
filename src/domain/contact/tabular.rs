// ============================================================
// TABULAR ROW TYPES
// ============================================================
// Decoded upload content: one header row plus ordered data rows

use serde::{Deserialize, Serialize};

/// Row number assigned to the header line
pub const HEADER_ROW_NUMBER: usize = 1;

/// A single decoded data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based row number, header included (first data row is 2)
    pub row_number: usize,

    /// Cell values in column order
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<String>) -> Self {
        Self { row_number, cells }
    }

    /// Cell at a column index, if the row is long enough
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|s| s.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Headers plus rows, as produced by any decoding strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl TabularData {
    /// Build from header cells and data rows, numbering rows from 2
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| RawRow::new(idx + HEADER_ROW_NUMBER + 1, cells))
            .collect();

        Self { headers, rows }
    }

    /// Index of a header, compared after trimming
    pub fn column_index(&self, header: &str) -> Option<usize> {
        column_index(&self.headers, header)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

pub fn column_index(headers: &[String], header: &str) -> Option<usize> {
    let wanted = header.trim();
    headers.iter().position(|h| h.trim() == wanted)
}
