//! Spreadsheet export of a reconciliation report

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

use crate::report::ReconciliationReport;
use crate::traits::ReportSink;
use crate::types::*;

/// Writes one worksheet per report section, named after the section's
/// `sheet_name`, with a bold header row followed by the data rows.
#[derive(Debug, Clone)]
pub struct XlsxReportWriter {
    path: PathBuf,
}

impl XlsxReportWriter {
    /// Create a writer targeting a `.xlsx` path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for XlsxReportWriter {
    fn write_report(&mut self, report: &ReconciliationReport) -> ReconResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for section in &report.sections {
            let worksheet = workbook
                .add_worksheet()
                .set_name(&section.sheet_name)
                .map_err(|e| {
                    ReconError::Export(format!("Failed to create sheet '{}': {}", section.sheet_name, e))
                })?;

            for (col, label) in section.columns.iter().enumerate() {
                worksheet
                    .write_string_with_format(0, col as u16, label, &header_format)
                    .map_err(|e| ReconError::Export(e.to_string()))?;
            }

            for (row_idx, row) in section.rows.iter().enumerate() {
                let row32 = (row_idx + 1) as u32;
                for (col, value) in row.iter().enumerate() {
                    worksheet
                        .write_string(row32, col as u16, value)
                        .map_err(|e| ReconError::Export(e.to_string()))?;
                }
            }
        }

        workbook.save(&self.path).map_err(|e| {
            ReconError::Export(format!("Failed to save {}: {}", self.path.display(), e))
        })?;

        tracing::info!(
            path = %self.path.display(),
            sheets = report.sections.len(),
            "Report exported"
        );
        Ok(())
    }
}
