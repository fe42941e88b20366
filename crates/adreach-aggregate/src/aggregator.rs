//! Streaming record-to-totals aggregation.

use adreach_types::{AdRecord, RecordError};
use tracing::warn;

use crate::{AggregateTotals, RecordProcessor, RecordResult};

/// Streaming impression aggregator.
///
/// Processes records one at a time and folds each successful breakdown into
/// the running totals. A record that fails processing is logged, counted as
/// skipped and otherwise ignored.
#[derive(Debug, Default)]
pub struct ImpressionAggregator {
    processor: RecordProcessor,
    totals: AggregateTotals,
}

impl ImpressionAggregator {
    /// Creates a new aggregator around the given processor.
    #[must_use]
    pub fn new(processor: RecordProcessor) -> Self {
        Self {
            processor,
            totals: AggregateTotals::new(),
        }
    }

    /// Processes a record and folds it into the totals.
    ///
    /// Returns the record's breakdown, or the error that caused it to be
    /// skipped. Either way the aggregator stays usable.
    ///
    /// # Errors
    ///
    /// Returns the [`RecordError`] of a rejected record.
    pub fn process(&mut self, record: &AdRecord) -> Result<RecordResult, RecordError> {
        match self.processor.process(record) {
            Ok(result) => {
                self.totals.fold(&result);
                Ok(result)
            }
            Err(err) => {
                self.totals.skip();
                let id = record.id();
                warn!(
                    id = id.as_deref().unwrap_or("<none>"),
                    error = %err,
                    "skipping ad record"
                );
                Err(err)
            }
        }
    }

    /// Returns the totals so far.
    #[must_use]
    pub const fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    /// Finishes aggregation, returning the totals.
    #[must_use]
    pub fn finish(self) -> AggregateTotals {
        self.totals
    }
}

/// Aggregates a sequence of records with the default processor.
pub fn aggregate_records<'a, I>(records: I) -> AggregateTotals
where
    I: IntoIterator<Item = &'a AdRecord>,
{
    let mut aggregator = ImpressionAggregator::default();
    for record in records {
        // Rejected records are already counted by the aggregator.
        let _ = aggregator.process(record);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::sample_record;
    use adreach_types::{ImpressionRange, RegionShare};

    fn bad_record() -> AdRecord {
        let mut record = sample_record();
        record.delivery_by_region = Some(vec![RegionShare::new("Texas", "n/a")]);
        record
    }

    fn other_record() -> AdRecord {
        let mut record = sample_record();
        record.impressions = Some(ImpressionRange::from_bounds(0, 999));
        record.delivery_by_region = Some(vec![RegionShare::new("Utah", "1")]);
        record
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let good = sample_record();
        let bad = bad_record();

        let with_bad = aggregate_records([&good, &bad]);
        let without_bad = aggregate_records([&good]);

        assert_eq!(with_bad.total_impressions, without_bad.total_impressions);
        assert_eq!(with_bad.total_by_region, without_bad.total_by_region);
        assert_eq!(with_bad.records_processed, 1);
        assert_eq!(with_bad.records_skipped, 1);
    }

    #[test]
    fn test_undecodable_record_is_skipped() {
        let good = sample_record();
        let wrong_type = AdRecord::from_json(
            r#"{"id": "9", "demographic_distribution": [{"gender": "male", "age": 25, "percentage": "1"}]}"#,
        );

        let totals = aggregate_records([&good, &wrong_type]);

        assert_eq!(totals, {
            let mut expected = aggregate_records([&good]);
            expected.skip();
            expected
        });
        assert_eq!(totals.records_processed, 1);
        assert_eq!(totals.records_skipped, 1);
    }

    #[test]
    fn test_order_independent() {
        let a = sample_record();
        let b = other_record();

        assert_eq!(aggregate_records([&a, &b]), aggregate_records([&b, &a]));
    }

    #[test]
    fn test_run_continues_after_failure() {
        let mut aggregator = ImpressionAggregator::default();

        assert!(aggregator.process(&bad_record()).is_err());
        let result = aggregator.process(&other_record()).unwrap();

        // 0..999 -> 499.5 -> 500 (half to even)
        assert_eq!(result.estimated_impressions, 500);
        assert_eq!(aggregator.totals().total_impressions, 500);
        assert_eq!(aggregator.totals().total_by_region.get("Utah"), Some(500));
    }

    #[test]
    fn test_empty_input() {
        let totals = aggregate_records(std::iter::empty());
        assert_eq!(totals, AggregateTotals::new());
    }
}
