//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

static EMPTY_CELL: Cell = Cell::Empty;

/// Untyped value of a single cell in a loaded table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value at all (missing field, blank spreadsheet cell)
    Empty,
    /// Raw text exactly as read from the source
    Text(String),
    /// Integer value from a typed source
    Int(i64),
    /// Floating point value from a typed source
    Float(f64),
    /// Boolean value from a typed source
    Bool(bool),
    /// Calendar date from a typed source
    Date(NaiveDate),
    /// Date and time from a typed source
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Build a cell from a raw text field, mapping the empty field to `Cell::Empty`
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim_start_matches('\u{feff}');
        if raw.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// A cell is empty when it holds nothing or only whitespace
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(text) => write!(f, "{text}"),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Cell::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from_raw(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

/// A 2-D grid of untyped cells with no assumed header row.
///
/// Rows may be ragged; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Rows in their original order
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Create a table from already typed rows
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Create a table from raw text rows, empty fields become `Cell::Empty`
    pub fn from_text_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|v| Cell::from_raw(v.as_ref())).collect())
                .collect(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get a cell, reading past the end of a row or table as empty
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .map(|r| cell_at(r, column))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Get a cell of a row, reading past the end of the row as empty
pub fn cell_at(row: &[Cell], column: usize) -> &Cell {
    row.get(column).unwrap_or(&EMPTY_CELL)
}

/// Which source produced a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// The bank statement
    Bank,
    /// The internal accounting ledger
    Ledger,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Bank => write!(f, "Bank"),
            Origin::Ledger => write!(f, "Ledger"),
        }
    }
}

/// Canonical role a column can play in a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Money leaving the account
    Debit,
    /// Money entering the account
    Credit,
    /// Transaction date
    Date,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Debit => write!(f, "debit"),
            ColumnRole::Credit => write!(f, "credit"),
            ColumnRole::Date => write!(f, "date"),
        }
    }
}

/// Display snapshot of the source row a transaction came from.
///
/// Keeps column order. A repeated column name keeps its first position and
/// takes the later value. Formatting happens only on `Display`/serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    fields: Vec<(String, Cell)>,
}

impl Reference {
    /// Create an empty reference
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a field
    pub fn insert(&mut self, name: impl Into<String>, value: Cell) {
        let name = name.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get the value of a field
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterate over fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the reference has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for Reference {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        let mut reference = Reference::new();
        for (key, value) in iter {
            reference.insert(key, value);
        }
        reference
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A normalized transaction, immutable once produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTransaction {
    /// Signed amount, `credit - debit`, rounded to two decimals
    pub amount: BigDecimal,
    /// Transaction date, `None` when unknown
    pub date: Option<NaiveDate>,
    /// Snapshot of the source row, for display only
    pub reference: Reference,
    /// Source that produced this record
    pub origin: Origin,
}

impl CanonicalTransaction {
    /// Create a new canonical transaction
    pub fn new(
        amount: BigDecimal,
        date: Option<NaiveDate>,
        reference: Reference,
        origin: Origin,
    ) -> Self {
        Self {
            amount,
            date,
            reference,
            origin,
        }
    }

    /// ISO date, or an empty string when the date is unknown
    pub fn date_label(&self) -> String {
        self.date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for CanonicalTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(
                f,
                "{} {} on {} {}",
                self.origin,
                self.amount,
                date.format("%Y-%m-%d"),
                self.reference
            ),
            None => write!(f, "{} {} undated {}", self.origin, self.amount, self.reference),
        }
    }
}

/// Errors that can occur while loading, normalizing or exporting
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// A required role has no matching column in the detected header
    #[error("No {role} column detected in the {origin} statement. Available columns: {available:?}")]
    MissingColumn {
        origin: Origin,
        role: ColumnRole,
        available: Vec<String>,
    },
    /// A source file could not be opened or read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The delimited reader rejected the input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// The workbook could not be opened or has no readable sheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
    /// No reader handles the file extension
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// Configuration failed to parse or validate
    #[error("Configuration error: {0}")]
    Config(String),
    /// Writing the report failed
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
