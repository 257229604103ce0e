//! Statement normalization: raw table in, canonical transaction sequence out

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::normalize::{column_names, ColumnMap, ColumnMapper, HeaderLocator};
use crate::types::*;
use crate::utils::{parse_amount, parse_date, round_amount, DateOrder};

/// The canonical sequence for one source plus how it was detected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// Source that produced the statement
    pub origin: Origin,
    /// Index of the row used as header in the raw table
    pub header_row: usize,
    /// Columns detected for each role
    pub columns: ColumnMap,
    /// Transactions in original row order, one per row below the header
    pub transactions: Vec<CanonicalTransaction>,
}

impl Statement {
    /// Number of transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the statement has no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of all canonical amounts
    pub fn total(&self) -> BigDecimal {
        self.transactions.iter().map(|t| &t.amount).sum()
    }
}

/// Turns a raw table into a `Statement`
#[derive(Debug, Clone, Default)]
pub struct StatementNormalizer {
    locator: HeaderLocator,
    mapper: ColumnMapper,
    date_order: DateOrder,
}

impl StatementNormalizer {
    /// Create a normalizer from its parts
    pub fn new(locator: HeaderLocator, mapper: ColumnMapper, date_order: DateOrder) -> Self {
        Self {
            locator,
            mapper,
            date_order,
        }
    }

    /// Normalize a table.
    ///
    /// Fails only when the debit or credit column cannot be found. Every row
    /// below the header yields exactly one transaction, blank rows included;
    /// unreadable amounts count as 0 and unreadable dates as unknown.
    pub fn normalize(&self, table: &RawTable, origin: Origin) -> ReconResult<Statement> {
        let header_row = self.locator.locate(table);
        let header = table.row(header_row).unwrap_or(&[]);
        let names = column_names(header, table.width());

        let columns = match self.mapper.map(&names, origin) {
            Ok(columns) => columns,
            Err(err) => {
                tracing::warn!(%origin, header_row, error = %err, "Statement schema not recognized");
                return Err(err);
            }
        };

        let mut coerced_amounts = 0usize;
        let mut unknown_dates = 0usize;
        let zero = BigDecimal::from(0);

        let transactions: Vec<CanonicalTransaction> = table
            .rows
            .iter()
            .skip(header_row + 1)
            .map(|row| {
                let mut read_amount = |index: usize| {
                    let cell = cell_at(row, index);
                    parse_amount(cell).unwrap_or_else(|| {
                        if !cell.is_empty() {
                            coerced_amounts += 1;
                        }
                        zero.clone()
                    })
                };
                let debit = read_amount(columns.debit.index);
                let credit = read_amount(columns.credit.index);
                let amount = round_amount(&(credit - debit));

                let date = columns.date.as_ref().and_then(|column| {
                    let cell = cell_at(row, column.index);
                    let parsed = parse_date(cell, self.date_order);
                    if parsed.is_none() {
                        unknown_dates += 1;
                    }
                    parsed
                });

                let reference = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), cell_at(row, i).clone()))
                    .collect();

                CanonicalTransaction::new(amount, date, reference, origin)
            })
            .collect();

        if coerced_amounts > 0 {
            tracing::warn!(
                %origin,
                cells = coerced_amounts,
                "Non-numeric debit/credit cells read as 0"
            );
        }
        if unknown_dates > 0 {
            tracing::debug!(%origin, rows = unknown_dates, "Rows with unknown date");
        }
        tracing::info!(
            %origin,
            header_row,
            transactions = transactions.len(),
            "Normalized statement"
        );

        Ok(Statement {
            origin,
            header_row,
            columns,
            transactions,
        })
    }
}

/// Normalize a table with the default header window, synonyms and date order
pub fn normalize_statement(table: &RawTable, origin: Origin) -> ReconResult<Statement> {
    StatementNormalizer::default().normalize(table, origin)
}
