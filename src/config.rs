//! Run configuration, loadable from TOML

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;

use crate::normalize::{ColumnSynonyms, DEFAULT_HEADER_SCAN_ROWS, DEFAULT_MIN_HEADER_CELLS};
use crate::reconciliation::{DateFilter, PartialStrategy};
use crate::types::*;
use crate::utils::*;

/// Largest absolute difference between a target and a candidate sum that
/// still counts as a partial match
pub const DEFAULT_TOLERANCE: &str = "0.01";

/// Default cap on components tried by the subset strategy
pub const DEFAULT_MAX_COMPONENTS: usize = 4;

/// Default number of leading candidates the subset strategy searches
pub const DEFAULT_MAX_CANDIDATES: usize = 24;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(deserialize_with = "deserialize_decimal")]
    pub tolerance: BigDecimal,
    pub header_scan_rows: usize,
    pub min_header_cells: usize,
    pub date_order: DateOrder,
    /// Inclusive lower date bound applied before matching
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound applied before matching
    pub date_to: Option<NaiveDate>,
    pub partial: PartialConfig,
    pub columns: ColumnSynonyms,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            min_header_cells: DEFAULT_MIN_HEADER_CELLS,
            date_order: DateOrder::default(),
            date_from: None,
            date_to: None,
            partial: PartialConfig::default(),
            columns: ColumnSynonyms::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Partial matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub strategy: PartialStrategy,
    /// Largest combination tried by the subset strategy
    pub max_components: usize,
    /// Candidates beyond this many are ignored by the subset strategy
    pub max_candidates: usize,
    /// Whether one ledger entry may explain several bank entries
    pub reuse_components: bool,
}

impl Default for PartialConfig {
    fn default() -> Self {
        Self {
            strategy: PartialStrategy::default(),
            max_components: DEFAULT_MAX_COMPONENTS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            reuse_components: true,
        }
    }
}

fn default_tolerance() -> BigDecimal {
    BigDecimal::from_str(DEFAULT_TOLERANCE).unwrap_or_default()
}

/// Accepts `0.01`, `"0.01"` or `1`. Floats go through their shortest text
/// form so `0.01` stays exactly one cent.
fn deserialize_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Int(value) => Ok(BigDecimal::from(value)),
        Repr::Float(value) => BigDecimal::from_str(&value.to_string()).map_err(de::Error::custom),
        Repr::Text(text) => BigDecimal::from_str(text.trim()).map_err(de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> ReconResult<Self> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::Config(e.to_string()))?;
        config.prepared()
    }

    /// Lower-case the synonym overrides, then validate
    pub fn prepared(mut self) -> ReconResult<Self> {
        self.columns = self.columns.lowercased();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ReconResult<()> {
        validate_tolerance(&self.tolerance)?;
        validate_at_least_one("header_scan_rows", self.header_scan_rows)?;
        validate_at_least_one("min_header_cells", self.min_header_cells)?;
        validate_at_least_one("partial.max_components", self.partial.max_components)?;
        validate_at_least_one("partial.max_candidates", self.partial.max_candidates)?;
        validate_date_range(self.date_from, self.date_to)?;
        validate_synonyms(ColumnRole::Debit, &self.columns.debit)?;
        validate_synonyms(ColumnRole::Credit, &self.columns.credit)?;
        validate_synonyms(ColumnRole::Date, &self.columns.date)?;
        Ok(())
    }

    /// Date bounds as a pre-matching filter
    pub fn date_filter(&self) -> DateFilter {
        DateFilter::new(self.date_from, self.date_to)
    }
}
