//! Delimited text (CSV) table source

use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::traits::TableSource;
use crate::types::*;

/// Reads a delimited text file with no assumed header row.
///
/// Every record is kept in order and every field stays unparsed text, so the
/// header locator sees preamble lines exactly as the bank exported them.
/// Files that are not valid UTF-8 are decoded as Windows-1252, the usual
/// encoding of spreadsheet-exported statements.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    /// Create a comma-delimited source
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    /// Use another field delimiter, e.g. `b';'`
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> ReconResult<RawTable> {
        let bytes = std::fs::read(&self.path).map_err(|source| ReconError::Io {
            path: self.path.clone(),
            source,
        })?;
        let table = read_csv(&bytes, self.delimiter)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.width(),
            "Loaded CSV table"
        );
        Ok(table)
    }
}

/// Parse delimited bytes into a raw table
pub fn read_csv(bytes: &[u8], delimiter: u8) -> ReconResult<RawTable> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_raw).collect());
    }
    Ok(RawTable::new(rows))
}

fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            tracing::debug!("Input is not valid UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_keep_order_and_raw_text() {
        let input = b"Banco Ejemplo,,\nfecha,debe,haber\n2024-01-02,,1.500\n\n";
        let table = read_csv(input, b',').unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(0, 0), &Cell::from("Banco Ejemplo"));
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(2, 2), &Cell::Text("1.500".to_string()));
    }

    #[test]
    fn test_ragged_records_are_accepted() {
        let table = read_csv(b"title\nfecha,debe,haber\n", b',').unwrap();
        assert_eq!(table.row(0).map(<[Cell]>::len), Some(1));
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_bom_and_semicolon_delimiter() {
        let table = read_csv("\u{feff}fecha;débito\n".as_bytes(), b';').unwrap();
        assert_eq!(table.cell(0, 0), &Cell::from("fecha"));
        assert_eq!(table.cell(0, 1), &Cell::from("débito"));
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "crédito" with é as a single 0xE9 byte
        let table = read_csv(b"d\xe9bito,cr\xe9dito\n", b',').unwrap();
        assert_eq!(table.cell(0, 1), &Cell::from("crédito"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CsvSource::new("/nonexistent/extracto.csv").load().unwrap_err();
        assert!(matches!(err, ReconError::Io { .. }));
    }
}
