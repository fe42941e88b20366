//! Display utilities and output formatting for the adreach CLI.

use std::fmt::Write;
use std::process::ExitCode;

use adreach_lib::prelude::*;
use anyhow::Result;
use clap::ValueEnum;
use serde_json::json;

/// Output format for results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Text,
    Json,
}

impl Format {
    /// Returns the format name.
    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Print the outcome of a run and return the process exit code.
///
/// Partial runs print a warning to stderr and exit non-zero.
pub(crate) fn print_report(report: &RunReport, format: Format) -> Result<ExitCode> {
    match format {
        Format::Text => print!("{}", render_totals(&report.totals)),
        Format::Json => {
            let value = json!({
                "complete": report.is_complete(),
                "error": report.error().map(ToString::to_string),
                "totals": report.totals,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    match report.error() {
        None => Ok(ExitCode::SUCCESS),
        Some(error) => {
            eprintln!(
                "Warning: results are partial ({} records seen): {error}",
                report.totals.records_seen()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the breakdown of a single record.
pub(crate) fn print_record(id: Option<&str>, result: &RecordResult, format: Format) -> Result<()> {
    match format {
        Format::Text => print!("{}", render_record(id, result)),
        Format::Json => {
            let value = json!({ "id": id, "result": result });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

/// Render aggregate totals as text.
pub(crate) fn render_totals(totals: &AggregateTotals) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Records: {} processed, {} skipped",
        totals.records_processed, totals.records_skipped
    );
    let _ = writeln!(out, "Estimated impressions: {}", totals.total_impressions);
    render_counts(&mut out, "By region", &totals.total_by_region);
    render_counts(&mut out, "By gender", &totals.total_by_gender);
    render_counts(&mut out, "By age", &totals.total_by_age);
    out
}

/// Render a single record breakdown as text.
pub(crate) fn render_record(id: Option<&str>, result: &RecordResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ad: {}", id.unwrap_or("-"));
    let _ = writeln!(
        out,
        "Estimated impressions: {}",
        result.estimated_impressions
    );
    render_counts(&mut out, "By region", &result.by_region);
    render_counts(&mut out, "By gender", &result.by_gender);
    render_counts(&mut out, "By age", &result.by_age);
    out
}

fn render_counts(out: &mut String, title: &str, counts: &CategoryCounts) {
    let _ = writeln!(out, "\n{title}:");
    if counts.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, count) in counts.iter() {
        let _ = writeln!(out, "  {name:<width$}  {count:>12}");
    }
}
