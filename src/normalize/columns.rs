//! Column role detection over locale-variant labels

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Labels that mark a debit column (matched as substrings of lower-cased names)
pub const DEBIT_SYNONYMS: &[&str] = &["débito", "debito", "debe"];

/// Labels that mark a credit column
pub const CREDIT_SYNONYMS: &[&str] = &["crédito", "credito", "haber"];

/// Labels that mark a date column
pub const DATE_SYNONYMS: &[&str] = &["fecha"];

/// Accepted label substrings per column role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnSynonyms {
    pub debit: Vec<String>,
    pub credit: Vec<String>,
    pub date: Vec<String>,
}

impl Default for ColumnSynonyms {
    fn default() -> Self {
        fn owned(labels: &[&str]) -> Vec<String> {
            labels.iter().map(|label| label.to_string()).collect()
        }

        Self {
            debit: owned(DEBIT_SYNONYMS),
            credit: owned(CREDIT_SYNONYMS),
            date: owned(DATE_SYNONYMS),
        }
    }
}

impl ColumnSynonyms {
    /// Synonyms for a role
    pub fn for_role(&self, role: ColumnRole) -> &[String] {
        match role {
            ColumnRole::Debit => &self.debit,
            ColumnRole::Credit => &self.credit,
            ColumnRole::Date => &self.date,
        }
    }

    /// Copy with every synonym trimmed and lower-cased, matching how column
    /// names are prepared before comparison
    pub fn lowercased(&self) -> Self {
        fn lower(labels: &[String]) -> Vec<String> {
            labels.iter().map(|label| label.trim().to_lowercase()).collect()
        }

        Self {
            debit: lower(&self.debit),
            credit: lower(&self.credit),
            date: lower(&self.date),
        }
    }
}

/// A detected column: its position and prepared name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// Detected columns for one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub debit: ColumnRef,
    pub credit: ColumnRef,
    pub date: Option<ColumnRef>,
}

/// Prepare header cells as column names: stringified, trimmed, lower-cased.
///
/// The result has `width` entries; missing header cells become empty names.
pub fn column_names(header: &[Cell], width: usize) -> Vec<String> {
    (0..width.max(header.len()))
        .map(|i| {
            header
                .get(i)
                .map(|cell| cell.to_string().trim().to_lowercase())
                .unwrap_or_default()
        })
        .collect()
}

/// First column whose name contains any of the synonyms
pub fn find_column(columns: &[String], synonyms: &[String]) -> Option<ColumnRef> {
    columns
        .iter()
        .enumerate()
        .find(|(_, name)| synonyms.iter().any(|s| name.contains(s.as_str())))
        .map(|(index, name)| ColumnRef {
            index,
            name: name.clone(),
        })
}

/// Maps prepared column names to canonical roles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapper {
    synonyms: ColumnSynonyms,
}

impl ColumnMapper {
    /// Create a mapper over a synonym table
    pub fn new(synonyms: ColumnSynonyms) -> Self {
        Self {
            synonyms: synonyms.lowercased(),
        }
    }

    /// The synonym table in use
    pub fn synonyms(&self) -> &ColumnSynonyms {
        &self.synonyms
    }

    /// Detect debit, credit and date columns.
    ///
    /// Debit and credit are required; the date column is optional.
    pub fn map(&self, columns: &[String], origin: Origin) -> ReconResult<ColumnMap> {
        let debit = self.require(columns, ColumnRole::Debit, origin)?;
        let credit = self.require(columns, ColumnRole::Credit, origin)?;
        let date = find_column(columns, self.synonyms.for_role(ColumnRole::Date));

        tracing::debug!(
            %origin,
            debit = %debit.name,
            credit = %credit.name,
            date = date.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
            "Detected statement columns"
        );

        Ok(ColumnMap {
            debit,
            credit,
            date,
        })
    }

    fn require(&self, columns: &[String], role: ColumnRole, origin: Origin) -> ReconResult<ColumnRef> {
        find_column(columns, self.synonyms.for_role(role)).ok_or_else(|| {
            ReconError::MissingColumn {
                origin,
                role,
                available: columns.to_vec(),
            }
        })
    }
}
