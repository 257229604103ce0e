//! Traits for the input and output seams of a reconciliation run

use crate::report::ReconciliationReport;
use crate::types::*;

/// A loader that produces one raw table.
///
/// Implementations must keep the original row and column order and must not
/// interpret cell values beyond what the file format itself types.
pub trait TableSource: Send + Sync {
    /// Human-readable name of the source, used in log events
    fn name(&self) -> String;

    /// Load the full table into memory
    fn load(&self) -> ReconResult<RawTable>;
}

/// A writer that persists or publishes a finished report
pub trait ReportSink {
    /// Write the report
    fn write_report(&mut self, report: &ReconciliationReport) -> ReconResult<()>;
}
