//! Header row detection

use crate::types::*;

/// Number of leading rows searched for the header
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 10;

/// Minimum number of non-empty cells a header row carries
pub const DEFAULT_MIN_HEADER_CELLS: usize = 2;

/// Finds the row holding column labels in a table that may carry a preamble
/// (bank name, account number, period) above the real header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocator {
    scan_rows: usize,
    min_cells: usize,
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_SCAN_ROWS, DEFAULT_MIN_HEADER_CELLS)
    }
}

impl HeaderLocator {
    /// Create a locator with a custom scan window and cell threshold
    pub fn new(scan_rows: usize, min_cells: usize) -> Self {
        Self {
            scan_rows,
            min_cells,
        }
    }

    /// Index of the first row within the scan window with enough non-empty
    /// cells, or 0 when no row qualifies.
    pub fn locate(&self, table: &RawTable) -> usize {
        table
            .rows
            .iter()
            .take(self.scan_rows)
            .position(|row| non_empty_cells(row) >= self.min_cells)
            .unwrap_or(0)
    }
}

/// Locate the header row with the default window of ten rows
pub fn locate_header_row(table: &RawTable) -> usize {
    HeaderLocator::default().locate(table)
}

fn non_empty_cells(row: &[Cell]) -> usize {
    row.iter().filter(|cell| !cell.is_empty()).count()
}
