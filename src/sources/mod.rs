//! File-backed table sources

pub mod delimited;
#[cfg(feature = "xlsx")]
pub mod spreadsheet;

pub use delimited::*;
#[cfg(feature = "xlsx")]
pub use spreadsheet::*;

use std::path::Path;

use crate::traits::TableSource;
use crate::types::*;

/// Extensions handled as workbooks
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Pick a source for a path from its extension
pub fn source_for_path(path: impl AsRef<Path>) -> ReconResult<Box<dyn TableSource>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if extension == "csv" {
        return Ok(Box::new(CsvSource::new(path)));
    }
    if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        return spreadsheet_source(path, &extension);
    }
    Err(ReconError::UnsupportedFormat(format!(
        "{} (expected csv or one of {})",
        path.display(),
        SPREADSHEET_EXTENSIONS.join(", ")
    )))
}

#[cfg(feature = "xlsx")]
fn spreadsheet_source(path: &Path, _extension: &str) -> ReconResult<Box<dyn TableSource>> {
    Ok(Box::new(SpreadsheetSource::new(path)))
}

#[cfg(not(feature = "xlsx"))]
fn spreadsheet_source(path: &Path, extension: &str) -> ReconResult<Box<dyn TableSource>> {
    Err(ReconError::UnsupportedFormat(format!(
        "{}: .{} files need the `xlsx` feature",
        path.display(),
        extension
    )))
}

/// Load a table from a CSV or spreadsheet file
pub fn load_table(path: impl AsRef<Path>) -> ReconResult<RawTable> {
    source_for_path(path)?.load()
}
