//! Partial matching: one transaction explained as the sum of several others

use bigdecimal::BigDecimal;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::PartialConfig;
use crate::types::*;

/// How candidate groups are searched on the component side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialStrategy {
    /// Growing leading runs of the candidate sequence: the first item, the
    /// first two, the first three and so on. Non-leading subsets are never
    /// tried.
    #[default]
    Prefix,
    /// Any combination of candidates, smallest size first, in index order,
    /// up to `max_components` items. Finds groups the prefix search misses
    /// and therefore reports fewer transactions as unreconciled. Only the
    /// first `max_candidates` available candidates are searched.
    Subset,
}

/// A base transaction and the components whose amounts add up to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialMatchGroup<'a> {
    pub base: &'a CanonicalTransaction,
    pub components: Vec<&'a CanonicalTransaction>,
}

impl PartialMatchGroup<'_> {
    /// Sum of the component amounts
    pub fn components_total(&self) -> BigDecimal {
        self.components.iter().map(|c| &c.amount).sum()
    }
}

/// Searches, for each base transaction, a group of components summing to its
/// amount within a tolerance. Only the first qualifying group per base is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialMatcher {
    tolerance: BigDecimal,
    config: PartialConfig,
}

impl PartialMatcher {
    /// Create a matcher
    pub fn new(tolerance: BigDecimal, config: PartialConfig) -> Self {
        Self { tolerance, config }
    }

    /// Tolerance in use
    pub fn tolerance(&self) -> &BigDecimal {
        &self.tolerance
    }

    /// Find groups for every base in order.
    ///
    /// With `reuse_components` (the default) the component side is never
    /// consumed, so the same component can appear in groups for different
    /// bases. Otherwise a component used once is no longer a candidate.
    pub fn find_groups<'a>(
        &self,
        bases: &[&'a CanonicalTransaction],
        components: &[&'a CanonicalTransaction],
    ) -> Vec<PartialMatchGroup<'a>> {
        let mut available = vec![true; components.len()];
        let mut groups = Vec::new();
        let mut truncation_logged = false;

        for &base in bases {
            let candidates: Vec<usize> = (0..components.len()).filter(|&i| available[i]).collect();
            let found = match self.config.strategy {
                PartialStrategy::Prefix => self.search_prefix(&base.amount, components, &candidates),
                PartialStrategy::Subset => {
                    let limit = self.config.max_candidates.min(candidates.len());
                    if limit < candidates.len() && !truncation_logged {
                        tracing::warn!(
                            candidates = candidates.len(),
                            max_candidates = self.config.max_candidates,
                            "Subset search limited to the leading candidates"
                        );
                        truncation_logged = true;
                    }
                    self.search_subset(&base.amount, components, &candidates[..limit])
                }
            };

            let Some(indices) = found else {
                continue;
            };

            tracing::debug!(
                base = %base.amount,
                components = indices.len(),
                "Partial match found"
            );

            if !self.config.reuse_components {
                for &i in &indices {
                    available[i] = false;
                }
            }
            groups.push(PartialMatchGroup {
                base,
                components: indices.iter().map(|&i| components[i]).collect(),
            });
        }

        groups
    }

    fn within_tolerance(&self, sum: &BigDecimal, target: &BigDecimal) -> bool {
        (sum - target).abs() <= self.tolerance
    }

    fn search_prefix(
        &self,
        target: &BigDecimal,
        components: &[&CanonicalTransaction],
        candidates: &[usize],
    ) -> Option<Vec<usize>> {
        let mut sum = BigDecimal::from(0);
        for (position, &i) in candidates.iter().enumerate() {
            sum += &components[i].amount;
            if self.within_tolerance(&sum, target) {
                return Some(candidates[..=position].to_vec());
            }
        }
        None
    }

    fn search_subset(
        &self,
        target: &BigDecimal,
        components: &[&CanonicalTransaction],
        candidates: &[usize],
    ) -> Option<Vec<usize>> {
        let largest = self.config.max_components.min(candidates.len());
        (1..=largest).find_map(|size| {
            candidates.iter().copied().combinations(size).find(|combo| {
                let sum: BigDecimal = combo.iter().map(|&i| &components[i].amount).sum();
                self.within_tolerance(&sum, target)
            })
        })
    }
}

/// Find partial groups with the default prefix search and a tolerance
pub fn find_partial_matches<'a>(
    bases: &[&'a CanonicalTransaction],
    components: &[&'a CanonicalTransaction],
    tolerance: &BigDecimal,
) -> Vec<PartialMatchGroup<'a>> {
    PartialMatcher::new(tolerance.clone(), PartialConfig::default()).find_groups(bases, components)
}
