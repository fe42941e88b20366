//! File command implementation.
//!
//! Aggregates a pre-fetched archive page instead of crawling the API.

use std::path::Path;
use std::process::ExitCode;

use adreach_lib::prelude::*;
use adreach_lib::{RecordProcessor, RunOutcome};
use anyhow::{Context, Result};

use crate::display::{Format, print_record, print_report};

/// Aggregate every record of a snapshot, or break down only the first one.
pub(crate) fn file(
    path: &Path,
    first: bool,
    format: Format,
    rounding: RoundingMode,
) -> Result<ExitCode> {
    let page = load_snapshot(path)?;
    let processor = RecordProcessor::new(Estimator::new(rounding));

    if first {
        let record = page
            .records
            .first()
            .with_context(|| format!("{} contains no ads", path.display()))?;
        let id = record.id();
        let result = processor
            .process(record)
            .with_context(|| format!("Ad {} cannot be estimated", id.as_deref().unwrap_or("-")))?;
        print_record(id.as_deref(), &result, format)?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut aggregator = ImpressionAggregator::new(processor);
    for record in &page.records {
        // Rejected records are counted and logged by the aggregator.
        let _ = aggregator.process(record);
    }

    let report = RunReport {
        totals: aggregator.finish(),
        outcome: RunOutcome::Complete,
    };
    print_report(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{"data": [
        {
            "id": "1",
            "impressions": {"lower_bound": "10", "upper_bound": "20"},
            "delivery_by_region": [{"region": "US", "percentage": "1"}],
            "demographic_distribution": [{"gender": "female", "age": "18-24", "percentage": "1"}]
        },
        {"id": "2"}
    ]}"#;

    fn snapshot(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_aggregates() {
        let file = snapshot(SNAPSHOT);
        assert!(super::file(file.path(), false, Format::Json, RoundingMode::HalfEven).is_ok());
    }

    #[test]
    fn test_file_first_record() {
        let file = snapshot(SNAPSHOT);
        assert!(super::file(file.path(), true, Format::Text, RoundingMode::HalfEven).is_ok());
    }

    #[test]
    fn test_file_first_record_rejected() {
        let file = snapshot(r#"{"data": [{"id": "2"}]}"#);
        let err = super::file(file.path(), true, Format::Text, RoundingMode::HalfEven).unwrap_err();
        assert!(err.to_string().contains("Ad 2"));
    }

    #[test]
    fn test_file_empty_snapshot_first() {
        let file = snapshot(r#"{"data": []}"#);
        assert!(super::file(file.path(), true, Format::Text, RoundingMode::HalfEven).is_err());
    }

    #[test]
    fn test_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ads.json");
        assert!(super::file(&path, false, Format::Text, RoundingMode::HalfEven).is_err());
    }
}
