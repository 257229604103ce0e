//! Tabular report built from a reconciliation result
//!
//! The report owns its data: every transaction is already rendered to text,
//! so it can outlive the statements and be handed to any `ReportSink`.

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "xlsx")]
pub use xlsx::XlsxReportWriter;

use serde::Serialize;
use std::io::Write;

use crate::reconciliation::{ReconciliationResult, ReconciliationSummary};
use crate::traits::ReportSink;
use crate::types::*;

/// The four sections a report can carry, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Matches,
    MissingInLedger,
    MissingInBank,
    PartialMatches,
}

impl SectionKind {
    /// All kinds in export order
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Matches,
        SectionKind::MissingInLedger,
        SectionKind::MissingInBank,
        SectionKind::PartialMatches,
    ];

    /// English section title
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Matches => "Matches",
            SectionKind::MissingInLedger => "Missing in Ledger",
            SectionKind::MissingInBank => "Missing in Bank",
            SectionKind::PartialMatches => "Partial Matches",
        }
    }

    /// Worksheet name used on export
    pub fn sheet_name(&self) -> &'static str {
        match self {
            SectionKind::Matches => "Coincidencias",
            SectionKind::MissingInLedger => "Faltantes en Contabilidad",
            SectionKind::MissingInBank => "Faltantes en Banco",
            SectionKind::PartialMatches => "Conciliaciones parciales",
        }
    }

    /// Column labels of the section
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Matches => &[
                "amount",
                "bank_date",
                "bank_reference",
                "ledger_date",
                "ledger_reference",
            ],
            SectionKind::MissingInLedger | SectionKind::MissingInBank => {
                &["amount", "date", "reference", "origin"]
            }
            SectionKind::PartialMatches => &["Movimiento Banco", "Coincidencia Parcial Sistema"],
        }
    }
}

/// One named table of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub title: String,
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportSection {
    fn new(kind: SectionKind, rows: Vec<Vec<String>>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            sheet_name: kind.sheet_name().to_string(),
            columns: kind.columns().iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the section has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summary plus ordered sections, ready for export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub summary: ReconciliationSummary,
    pub sections: Vec<ReportSection>,
}

impl ReconciliationReport {
    /// Shape a result into sections.
    ///
    /// Matches and both missing sections are always present, possibly empty.
    /// The partial section only exists when at least one group was found.
    pub fn build(result: &ReconciliationResult<'_>) -> Self {
        let matches = result
            .matches
            .iter()
            .map(|pair| {
                vec![
                    pair.amount.to_string(),
                    pair.bank.date_label(),
                    pair.bank.reference.to_string(),
                    pair.ledger.date_label(),
                    pair.ledger.reference.to_string(),
                ]
            })
            .collect();

        let mut sections = vec![
            ReportSection::new(SectionKind::Matches, matches),
            ReportSection::new(
                SectionKind::MissingInLedger,
                missing_rows(&result.missing_in_ledger),
            ),
            ReportSection::new(SectionKind::MissingInBank, missing_rows(&result.missing_in_bank)),
        ];

        if !result.partial_matches.is_empty() {
            let rows = result
                .partial_matches
                .iter()
                .flat_map(|group| {
                    group
                        .components
                        .iter()
                        .map(move |component| vec![group.base.to_string(), component.to_string()])
                })
                .collect();
            sections.push(ReportSection::new(SectionKind::PartialMatches, rows));
        }

        Self {
            summary: result.summary(),
            sections,
        }
    }

    /// Get a section by kind
    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

fn missing_rows(transactions: &[&CanonicalTransaction]) -> Vec<Vec<String>> {
    transactions
        .iter()
        .map(|txn| {
            vec![
                txn.amount.to_string(),
                txn.date_label(),
                txn.reference.to_string(),
                txn.origin.to_string(),
            ]
        })
        .collect()
}

/// Writes the report as pretty-printed JSON
#[derive(Debug)]
pub struct JsonReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReportWriter<W> {
    /// Create a writer over any byte sink
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the underlying sink
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonReportWriter<W> {
    fn write_report(&mut self, report: &ReconciliationReport) -> ReconResult<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)
            .map_err(|e| ReconError::Export(e.to_string()))?;
        writeln!(self.writer).map_err(|e| ReconError::Export(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| ReconError::Export(e.to_string()))
    }
}
