//! Spreadsheet table source (xlsx, xls, xlsb, ods)

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::traits::TableSource;
use crate::types::*;

/// Reads one worksheet of a workbook, the first one unless a name is given.
///
/// The grid keeps sheet coordinates: rows and columns before the used range
/// are padded with empty cells.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl SpreadsheetSource {
    /// Create a source reading the first worksheet
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: None,
        }
    }

    /// Read a named worksheet instead of the first
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

impl TableSource for SpreadsheetSource {
    fn name(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}#{}", self.path.display(), sheet),
            None => self.path.display().to_string(),
        }
    }

    fn load(&self) -> ReconResult<RawTable> {
        if !self.path.exists() {
            return Err(ReconError::Io {
                path: self.path.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            ReconError::Spreadsheet(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| ReconError::Spreadsheet(format!("{} contains no sheets", self.path.display())))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ReconError::Spreadsheet(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(cell_from_data));
            rows.push(cells);
        }

        tracing::debug!(
            path = %self.path.display(),
            sheet = %sheet_name,
            rows = rows.len(),
            "Loaded worksheet"
        );
        Ok(RawTable::new(rows))
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::from_raw(text),
        Data::Float(value) => Cell::Float(*value),
        Data::Int(value) => Cell::Int(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => cell_from_serial(dt.as_f64()),
        Data::DateTimeIso(text) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
            .map(Cell::DateTime)
            .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Cell::Date))
            .unwrap_or_else(|_| Cell::from_raw(text)),
        Data::DurationIso(text) => Cell::from_raw(text),
    }
}

/// Excel serial in the 1900 date system: whole days since 1899-12-30 plus a
/// fraction of a day
fn cell_from_serial(serial: f64) -> Cell {
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return Cell::Float(serial);
    };
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    let Some(date) = epoch.checked_add_signed(Duration::days(days as i64)) else {
        return Cell::Float(serial);
    };

    if seconds == 0 {
        Cell::Date(date)
    } else {
        date.and_hms_opt(0, 0, 0)
            .map(|midnight| Cell::DateTime(midnight + Duration::seconds(seconds)))
            .unwrap_or(Cell::Float(serial))
    }
}
