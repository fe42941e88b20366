//! Run-wide impression totals.

use adreach_types::{CategoryCounts, Gender};
use serde::{Deserialize, Serialize};

use crate::RecordResult;

/// Totals across every successfully processed record of one run.
///
/// Each total is the plain sum of per-record contributions, which were rounded
/// individually; totals are never re-rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    /// Sum of estimated impressions.
    pub total_impressions: u64,
    /// Impressions per region.
    pub total_by_region: CategoryCounts,
    /// Impressions per gender; always holds male, female and unknown.
    pub total_by_gender: CategoryCounts,
    /// Impressions per age bracket.
    pub total_by_age: CategoryCounts,
    /// Number of records folded in.
    pub records_processed: u64,
    /// Number of records rejected and left out.
    pub records_skipped: u64,
}

impl AggregateTotals {
    /// Creates empty totals.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_impressions: 0,
            total_by_region: CategoryCounts::new(),
            total_by_gender: CategoryCounts::seeded(Gender::NAMES.iter().copied()),
            total_by_age: CategoryCounts::new(),
            records_processed: 0,
            records_skipped: 0,
        }
    }

    /// Adds one record's breakdown to the totals.
    pub fn fold(&mut self, result: &RecordResult) {
        self.total_impressions = self
            .total_impressions
            .saturating_add(result.estimated_impressions);
        self.total_by_region.merge(&result.by_region);
        self.total_by_gender.merge(&result.by_gender);
        self.total_by_age.merge(&result.by_age);
        self.records_processed += 1;
    }

    /// Counts a record that was rejected. Totals are left unchanged.
    pub const fn skip(&mut self) {
        self.records_skipped += 1;
    }

    /// Adds another set of totals, e.g. from a worker that processed a
    /// disjoint share of the records.
    pub fn merge(&mut self, other: &Self) {
        self.total_impressions = self.total_impressions.saturating_add(other.total_impressions);
        self.total_by_region.merge(&other.total_by_region);
        self.total_by_gender.merge(&other.total_by_gender);
        self.total_by_age.merge(&other.total_by_age);
        self.records_processed += other.records_processed;
        self.records_skipped += other.records_skipped;
    }

    /// Returns the number of records seen, processed or skipped.
    #[must_use]
    pub const fn records_seen(&self) -> u64 {
        self.records_processed + self.records_skipped
    }
}

impl Default for AggregateTotals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(impressions: u64, regions: &[(&str, u64)]) -> RecordResult {
        RecordResult {
            estimated_impressions: impressions,
            by_region: regions.iter().map(|(r, n)| (*r, *n)).collect(),
            by_gender: CategoryCounts::from([("male", impressions), ("female", 0), ("unknown", 0)]),
            by_age: CategoryCounts::from([("18-24", impressions)]),
        }
    }

    #[test]
    fn test_new_is_empty_with_gender_seeded() {
        let totals = AggregateTotals::new();
        assert_eq!(totals.total_impressions, 0);
        assert!(totals.total_by_region.is_empty());
        assert_eq!(totals.total_by_gender.len(), 3);
        assert_eq!(totals.records_seen(), 0);
    }

    #[test]
    fn test_fold_adds_and_creates_categories() {
        let mut totals = AggregateTotals::new();
        totals.fold(&result(100, &[("US", 60), ("CA", 40)]));
        totals.fold(&result(50, &[("US", 50)]));

        assert_eq!(totals.total_impressions, 150);
        assert_eq!(
            totals.total_by_region,
            CategoryCounts::from([("US", 110), ("CA", 40)])
        );
        assert_eq!(totals.total_by_gender.get("male"), Some(150));
        assert_eq!(totals.total_by_age.get("18-24"), Some(150));
        assert_eq!(totals.records_processed, 2);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let a = result(100, &[("US", 60), ("CA", 40)]);
        let b = result(51, &[("MX", 51)]);

        let mut ab = AggregateTotals::new();
        ab.fold(&a);
        ab.fold(&b);

        let mut ba = AggregateTotals::new();
        ba.fold(&b);
        ba.fold(&a);

        assert_eq!(ab, ba);
    }

    #[test]
    fn test_skip_leaves_totals_untouched() {
        let mut totals = AggregateTotals::new();
        totals.fold(&result(100, &[("US", 100)]));
        let before = totals.clone();

        totals.skip();

        assert_eq!(totals.total_impressions, before.total_impressions);
        assert_eq!(totals.total_by_region, before.total_by_region);
        assert_eq!(totals.records_skipped, 1);
    }

    #[test]
    fn test_merge_matches_sequential_fold() {
        let a = result(100, &[("US", 60), ("CA", 40)]);
        let b = result(30, &[("CA", 30)]);

        let mut sequential = AggregateTotals::new();
        sequential.fold(&a);
        sequential.fold(&b);

        let mut left = AggregateTotals::new();
        left.fold(&a);
        let mut right = AggregateTotals::new();
        right.fold(&b);
        left.merge(&right);

        assert_eq!(left, sequential);
    }
}
