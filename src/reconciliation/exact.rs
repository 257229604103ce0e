//! Exact matching by signed amount

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::types::*;

/// One bank transaction and one ledger transaction with the same amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPair<'a> {
    pub amount: BigDecimal,
    pub bank: &'a CanonicalTransaction,
    pub ledger: &'a CanonicalTransaction,
}

/// Matches plus what remains on each side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactMatchOutput<'a> {
    pub matches: Vec<MatchPair<'a>>,
    pub leftover_bank: Vec<&'a CanonicalTransaction>,
    pub leftover_ledger: Vec<&'a CanonicalTransaction>,
}

impl<'a> ExactMatchOutput<'a> {
    /// Distinct amounts present in the match set
    pub fn matched_amounts(&self) -> BTreeSet<&BigDecimal> {
        self.matches.iter().map(|pair| &pair.amount).collect()
    }
}

/// Pair bank and ledger transactions on equal amounts.
///
/// At most one pair is produced per distinct amount: the first bank
/// transaction carrying it (in bank order) with the first ledger transaction
/// carrying it. Leftovers are filtered by amount, not by row, so every
/// transaction whose amount appears in the match set is excluded from the
/// leftovers, even duplicates that were not themselves paired.
pub fn match_exact<'a>(
    bank: &[&'a CanonicalTransaction],
    ledger: &[&'a CanonicalTransaction],
) -> ExactMatchOutput<'a> {
    let mut first_in_ledger: BTreeMap<&'a BigDecimal, &'a CanonicalTransaction> = BTreeMap::new();
    for &txn in ledger {
        first_in_ledger.entry(&txn.amount).or_insert(txn);
    }

    let mut matched: BTreeSet<&'a BigDecimal> = BTreeSet::new();
    let mut matches = Vec::new();
    for &txn in bank {
        if matched.contains(&txn.amount) {
            continue;
        }
        if let Some(&counterpart) = first_in_ledger.get(&txn.amount) {
            matched.insert(&txn.amount);
            matches.push(MatchPair {
                amount: txn.amount.clone(),
                bank: txn,
                ledger: counterpart,
            });
        }
    }

    let unmatched = |side: &[&'a CanonicalTransaction]| -> Vec<&'a CanonicalTransaction> {
        side.iter()
            .copied()
            .filter(|txn| !matched.contains(&txn.amount))
            .collect()
    };
    let leftover_bank = unmatched(bank);
    let leftover_ledger = unmatched(ledger);

    tracing::debug!(
        matches = matches.len(),
        leftover_bank = leftover_bank.len(),
        leftover_ledger = leftover_ledger.len(),
        "Exact matching finished"
    );

    ExactMatchOutput {
        matches,
        leftover_bank,
        leftover_ledger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn txns(origin: Origin, amounts: &[&str]) -> Vec<CanonicalTransaction> {
        amounts
            .iter()
            .enumerate()
            .map(|(row, amount)| {
                let mut reference = Reference::new();
                reference.insert("row", Cell::Int(row as i64));
                CanonicalTransaction::new(
                    BigDecimal::from_str(amount).unwrap(),
                    None,
                    reference,
                    origin,
                )
            })
            .collect()
    }

    fn refs(txns: &[CanonicalTransaction]) -> Vec<&CanonicalTransaction> {
        txns.iter().collect()
    }

    fn amounts(side: &[&CanonicalTransaction]) -> Vec<BigDecimal> {
        side.iter().map(|t| t.amount.clone()).collect()
    }

    #[test]
    fn test_duplicates_collapse_to_one_match_per_amount() {
        let bank = txns(Origin::Bank, &["100", "100", "50"]);
        let ledger = txns(Origin::Ledger, &["100"]);
        let out = match_exact(&refs(&bank), &refs(&ledger));

        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].amount, BigDecimal::from(100));
        // Both bank 100s leave the leftovers, not just the paired one
        assert_eq!(amounts(&out.leftover_bank), vec![BigDecimal::from(50)]);
        assert!(out.leftover_ledger.is_empty());
    }

    #[test]
    fn test_first_occurrences_are_paired() {
        let bank = txns(Origin::Bank, &["10", "20", "10"]);
        let ledger = txns(Origin::Ledger, &["20", "10", "10"]);
        let out = match_exact(&refs(&bank), &refs(&ledger));

        assert_eq!(amounts(&[out.matches[0].bank]), vec![BigDecimal::from(10)]);
        assert_eq!(out.matches[0].bank.reference.get("row"), Some(&Cell::Int(0)));
        assert_eq!(out.matches[0].ledger.reference.get("row"), Some(&Cell::Int(1)));
        assert_eq!(out.matches[1].amount, BigDecimal::from(20));
        assert!(out.leftover_bank.is_empty());
        assert!(out.leftover_ledger.is_empty());
    }

    #[test]
    fn test_equality_ignores_scale_and_keeps_sign() {
        let bank = txns(Origin::Bank, &["100.00", "-75.50"]);
        let ledger = txns(Origin::Ledger, &["100", "75.50"]);
        let out = match_exact(&refs(&bank), &refs(&ledger));

        assert_eq!(out.matches.len(), 1);
        assert_eq!(amounts(&out.leftover_bank), vec![BigDecimal::from_str("-75.50").unwrap()]);
        assert_eq!(amounts(&out.leftover_ledger), vec![BigDecimal::from_str("75.50").unwrap()]);
        assert_eq!(out.matched_amounts().len(), 1);
    }

    #[test]
    fn test_empty_sides() {
        let bank = txns(Origin::Bank, &["1"]);
        let out = match_exact(&refs(&bank), &[]);
        assert!(out.matches.is_empty());
        assert_eq!(out.leftover_bank.len(), 1);

        let out = match_exact(&[], &[]);
        assert_eq!(out, ExactMatchOutput::default());
    }
}
