//! Draining a record stream into totals.

use adreach_types::{AdRecord, AdreachError};
use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::{AggregateTotals, ImpressionAggregator};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every record of the source was seen.
    Complete,
    /// A fatal error stopped the run; the totals cover only the records seen
    /// before it.
    Partial {
        /// The error that stopped the run.
        error: AdreachError,
    },
}

/// Totals of a run together with how the run ended.
#[derive(Debug)]
pub struct RunReport {
    /// Totals over the records seen.
    pub totals: AggregateTotals,
    /// Whether the totals are complete.
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Returns true if the run saw every record of its source.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.outcome, RunOutcome::Complete)
    }

    /// Returns the error that cut the run short, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&AdreachError> {
        match &self.outcome {
            RunOutcome::Complete => None,
            RunOutcome::Partial { error } => Some(error),
        }
    }
}

/// Drains `stream` into `aggregator`.
///
/// Record errors inside the aggregator are skipped; an `Err` item from the
/// stream itself ends the run and marks the report partial.
pub async fn aggregate_stream<S, E>(stream: S, aggregator: ImpressionAggregator) -> RunReport
where
    S: Stream<Item = Result<AdRecord, E>>,
    E: Into<AdreachError>,
{
    aggregate_stream_with_progress(stream, aggregator, |_| {}).await
}

/// Like [`aggregate_stream`], calling `progress` after every record.
pub async fn aggregate_stream_with_progress<S, E, F>(
    stream: S,
    mut aggregator: ImpressionAggregator,
    mut progress: F,
) -> RunReport
where
    S: Stream<Item = Result<AdRecord, E>>,
    E: Into<AdreachError>,
    F: FnMut(&AggregateTotals),
{
    let mut stream = std::pin::pin!(stream);

    while let Some(item) = stream.next().await {
        match item {
            Ok(record) => {
                // Rejected records are counted and logged by the aggregator.
                let _ = aggregator.process(&record);
                progress(aggregator.totals());
            }
            Err(err) => {
                let error = err.into();
                let totals = aggregator.finish();
                warn!(%error, records = totals.records_seen(), "run cut short");
                return RunReport {
                    totals,
                    outcome: RunOutcome::Partial { error },
                };
            }
        }
    }

    let totals = aggregator.finish();
    info!(
        processed = totals.records_processed,
        skipped = totals.records_skipped,
        impressions = totals.total_impressions,
        "run complete"
    );
    RunReport {
        totals,
        outcome: RunOutcome::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate_records, processor::tests::sample_record};
    use adreach_types::RegionShare;
    use futures::stream;

    fn bad_record() -> AdRecord {
        let mut record = sample_record();
        record.delivery_by_region = Some(vec![RegionShare::new("Texas", "bogus")]);
        record
    }

    #[tokio::test]
    async fn test_complete_run() {
        let records = vec![sample_record(), bad_record(), sample_record()];
        let expected = aggregate_records(&records);

        let items = records.into_iter().map(Ok::<_, AdreachError>);
        let report = aggregate_stream(stream::iter(items), ImpressionAggregator::default()).await;

        assert!(report.is_complete());
        assert!(report.error().is_none());
        assert_eq!(report.totals, expected);
        assert_eq!(report.totals.records_skipped, 1);
    }

    #[tokio::test]
    async fn test_fatal_error_marks_run_partial() {
        let items = vec![
            Ok(sample_record()),
            Err(AdreachError::Http("connection reset".to_string())),
            Ok(sample_record()),
        ];
        let report = aggregate_stream(stream::iter(items), ImpressionAggregator::default()).await;

        assert!(!report.is_complete());
        assert!(matches!(report.error(), Some(AdreachError::Http(_))));
        // Only the record before the failure is counted.
        assert_eq!(report.totals.records_processed, 1);
        assert_eq!(report.totals.total_impressions, 1500);
    }

    #[tokio::test]
    async fn test_progress_called_per_record() {
        let items = vec![Ok::<_, AdreachError>(sample_record()), Ok(bad_record())];
        let mut seen = Vec::new();

        let report = aggregate_stream_with_progress(
            stream::iter(items),
            ImpressionAggregator::default(),
            |totals| seen.push(totals.records_seen()),
        )
        .await;

        assert!(report.is_complete());
        assert_eq!(seen, vec![1, 2]);
    }
}
