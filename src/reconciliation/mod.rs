//! Reconciliation engine for bank statements against the accounting ledger
//!
//! A run normalizes both tables, applies the optional date filter, pairs
//! transactions on equal amounts, and then searches partial matches that
//! explain a leftover bank transaction as the sum of leftover ledger
//! transactions.

pub mod exact;
pub mod filter;
pub mod partial;

pub use exact::*;
pub use filter::*;
pub use partial::*;

use serde::Serialize;

use crate::config::ReconConfig;
use crate::normalize::{ColumnMapper, HeaderLocator, Statement, StatementNormalizer};
use crate::report::ReconciliationReport;
use crate::traits::TableSource;
use crate::types::*;

/// Everything one run derived from the two statements.
///
/// Borrows the transactions from the statements it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationResult<'a> {
    pub matches: Vec<MatchPair<'a>>,
    /// Bank transactions whose amount found no ledger counterpart
    pub missing_in_ledger: Vec<&'a CanonicalTransaction>,
    /// Ledger transactions whose amount found no bank counterpart
    pub missing_in_bank: Vec<&'a CanonicalTransaction>,
    pub partial_matches: Vec<PartialMatchGroup<'a>>,
    /// Bank transactions that entered matching (after the date filter)
    pub bank_count: usize,
    /// Ledger transactions that entered matching (after the date filter)
    pub ledger_count: usize,
}

impl ReconciliationResult<'_> {
    /// Headline counts for the run
    pub fn summary(&self) -> ReconciliationSummary {
        ReconciliationSummary {
            bank_count: self.bank_count,
            ledger_count: self.ledger_count,
            matched: self.matches.len(),
            missing_in_ledger: self.missing_in_ledger.len(),
            missing_in_bank: self.missing_in_bank.len(),
            partial_groups: self.partial_matches.len(),
            completeness_percent: completeness_percent(
                self.matches.len(),
                self.bank_count,
                self.ledger_count,
            ),
        }
    }
}

/// Headline counts of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationSummary {
    pub bank_count: usize,
    pub ledger_count: usize,
    pub matched: usize,
    pub missing_in_ledger: usize,
    pub missing_in_bank: usize,
    pub partial_groups: usize,
    pub completeness_percent: f64,
}

impl ReconciliationSummary {
    /// Completeness with two decimals, e.g. `33.33%`
    pub fn completeness_label(&self) -> String {
        format!("{:.2}%", self.completeness_percent)
    }
}

/// `100 × matches / (bank + ledger)`, or 0 when both sides are empty
pub fn completeness_percent(matches: usize, bank_count: usize, ledger_count: usize) -> f64 {
    let total = bank_count + ledger_count;
    if total == 0 {
        0.0
    } else {
        100.0 * matches as f64 / total as f64
    }
}

/// Main reconciliation engine that orchestrates normalization and matching
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    config: ReconConfig,
    normalizer: StatementNormalizer,
    partial_matcher: PartialMatcher,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::from_prepared(ReconConfig::default())
    }

    /// Create an engine with a custom configuration.
    ///
    /// The configuration goes through the same preparation as one loaded
    /// with `ReconConfig::from_toml`: synonyms are lower-cased and every
    /// setting is validated.
    pub fn with_config(config: ReconConfig) -> ReconResult<Self> {
        Ok(Self::from_prepared(config.prepared()?))
    }

    fn from_prepared(config: ReconConfig) -> Self {
        let normalizer = StatementNormalizer::new(
            HeaderLocator::new(config.header_scan_rows, config.min_header_cells),
            ColumnMapper::new(config.columns.clone()),
            config.date_order,
        );
        let partial_matcher = PartialMatcher::new(config.tolerance.clone(), config.partial.clone());
        Self {
            config,
            normalizer,
            partial_matcher,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Normalize one raw table into a statement
    pub fn normalize(&self, table: &RawTable, origin: Origin) -> ReconResult<Statement> {
        self.normalizer.normalize(table, origin)
    }

    /// Match two normalized statements
    pub fn reconcile<'a>(&self, bank: &'a Statement, ledger: &'a Statement) -> ReconciliationResult<'a> {
        let filter = self.config.date_filter();
        let bank_txns = filter.apply(&bank.transactions);
        let ledger_txns = filter.apply(&ledger.transactions);

        if filter.is_active() {
            tracing::debug!(
                bank_excluded = bank.len() - bank_txns.len(),
                ledger_excluded = ledger.len() - ledger_txns.len(),
                "Applied date filter"
            );
        }

        let exact = match_exact(&bank_txns, &ledger_txns);
        let partial_matches = self
            .partial_matcher
            .find_groups(&exact.leftover_bank, &exact.leftover_ledger);

        let result = ReconciliationResult {
            matches: exact.matches,
            missing_in_ledger: exact.leftover_bank,
            missing_in_bank: exact.leftover_ledger,
            partial_matches,
            bank_count: bank_txns.len(),
            ledger_count: ledger_txns.len(),
        };

        let summary = result.summary();
        tracing::info!(
            bank = summary.bank_count,
            ledger = summary.ledger_count,
            matched = summary.matched,
            missing_in_ledger = summary.missing_in_ledger,
            missing_in_bank = summary.missing_in_bank,
            partial_groups = summary.partial_groups,
            completeness = %summary.completeness_label(),
            "Reconciliation finished"
        );

        result
    }

    /// Normalize both tables, match them and build the report.
    ///
    /// Fails without a partial result when either table lacks a debit or
    /// credit column.
    pub fn reconcile_tables(&self, bank: &RawTable, ledger: &RawTable) -> ReconResult<ReconciliationReport> {
        let bank = self.normalize(bank, Origin::Bank)?;
        let ledger = self.normalize(ledger, Origin::Ledger)?;
        let result = self.reconcile(&bank, &ledger);
        Ok(ReconciliationReport::build(&result))
    }

    /// Load both sources, then reconcile them like `reconcile_tables`
    pub fn reconcile_sources(
        &self,
        bank: &dyn TableSource,
        ledger: &dyn TableSource,
    ) -> ReconResult<ReconciliationReport> {
        tracing::debug!(bank = %bank.name(), ledger = %ledger.name(), "Loading sources");
        let bank_table = bank.load()?;
        let ledger_table = ledger.load()?;
        self.reconcile_tables(&bank_table, &ledger_table)
    }
}
