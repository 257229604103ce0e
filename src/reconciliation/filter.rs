//! Date-range pre-filter applied to statements before matching

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::*;

/// Inclusive date bounds.
///
/// With no bound set every transaction passes. With any bound set,
/// transactions with an unknown date are excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateFilter {
    /// Create a filter from optional bounds
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Whether any bound is set
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether a transaction date passes the filter
    pub fn admits(&self, date: Option<NaiveDate>) -> bool {
        if !self.is_active() {
            return true;
        }
        match date {
            Some(date) => {
                self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
            }
            None => false,
        }
    }

    /// Borrow the transactions that pass, keeping their order
    pub fn apply<'a>(&self, transactions: &'a [CanonicalTransaction]) -> Vec<&'a CanonicalTransaction> {
        transactions.iter().filter(|t| self.admits(t.date)).collect()
    }
}
