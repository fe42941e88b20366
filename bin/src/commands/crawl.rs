//! Crawl command implementation.
//!
//! Walks the ads archive for the requested pages and aggregates every ad
//! returned.

use std::process::ExitCode;
use std::time::Duration;

use adreach_lib::prelude::*;
use adreach_lib::{
    Crawler, RecordProcessor, aggregate_stream_with_progress, flatten_records, page_stream,
};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

use crate::display::{Format, print_report};

/// Command-line options of a crawl.
#[derive(Debug, Clone)]
pub(crate) struct CrawlArgs {
    pub(crate) access_token: String,
    pub(crate) page_ids: Vec<String>,
    pub(crate) countries: Vec<String>,
    pub(crate) since: Option<String>,
    pub(crate) until: Option<String>,
    pub(crate) ad_type: String,
    pub(crate) status: String,
    pub(crate) base_url: String,
    pub(crate) max_pages: Option<usize>,
    pub(crate) timeout_secs: Option<u64>,
}

impl CrawlArgs {
    /// Build the archive query, validating the date window.
    fn query(&self) -> Result<ArchiveQuery> {
        let since = self.since.as_deref().map(parse_date).transpose()?;
        let until = self.until.as_deref().map(parse_date).transpose()?;
        if let (Some(since), Some(until)) = (since, until)
            && since > until
        {
            bail!("--since {since} is after --until {until}");
        }

        Ok(ArchiveQuery::new(self.access_token.clone())
            .with_page_ids(self.page_ids.iter().cloned())
            .with_countries(self.countries.iter().cloned())
            .with_delivery_dates(since, until)
            .with_ad_type(self.ad_type.clone())
            .with_active_status(self.status.clone()))
    }

    /// Crawl limits; the timeout starts counting when this is called.
    fn limits(&self) -> CrawlLimits {
        let mut limits = CrawlLimits::unlimited();
        if let Some(max) = self.max_pages {
            limits = limits.with_max_pages(max);
        }
        if let Some(secs) = self.timeout_secs {
            limits = limits.with_timeout(Duration::from_secs(secs));
        }
        limits
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date: {s}"))
}

/// Crawl the archive and print aggregate totals.
pub(crate) async fn crawl(
    args: CrawlArgs,
    format: Format,
    rounding: RoundingMode,
    quiet: bool,
) -> Result<ExitCode> {
    let query = args.query()?;
    let config = ClientConfig {
        base_url: args.base_url.clone(),
        ..Default::default()
    };
    let client = ArchiveClient::new(config)?;
    let seed = client.seed_url(&query)?;

    // Setup spinner
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} pages, {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let crawler = Crawler::new(&client, seed, args.limits());
    let pages = page_stream(crawler).inspect(|page| {
        if page.is_ok() {
            progress.inc(1);
        }
    });

    let aggregator = ImpressionAggregator::new(RecordProcessor::new(Estimator::new(rounding)));
    let report = aggregate_stream_with_progress(flatten_records(pages), aggregator, |totals| {
        progress.set_message(format!(
            "{} ads, {} impressions",
            totals.records_seen(),
            totals.total_impressions
        ));
    })
    .await;

    progress.finish_and_clear();
    print_report(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CrawlArgs {
        CrawlArgs {
            access_token: "token".to_string(),
            page_ids: vec!["100801038449520".to_string()],
            countries: vec!["US".to_string()],
            since: Some("2020-09-01".to_string()),
            until: Some("2021-12-31".to_string()),
            ad_type: "POLITICAL_AND_ISSUE_ADS".to_string(),
            status: "ALL".to_string(),
            base_url: adreach_lib::url::BASE_URL.to_string(),
            max_pages: Some(5),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_query_from_args() {
        let query = args().query().unwrap();
        assert_eq!(query.search_page_ids, vec!["100801038449520"]);
        assert_eq!(query.ad_delivery_date_min, NaiveDate::from_ymd_opt(2020, 9, 1));
        assert_eq!(query.ad_delivery_date_max, NaiveDate::from_ymd_opt(2021, 12, 31));
    }

    #[test]
    fn test_query_rejects_bad_date() {
        let mut args = args();
        args.since = Some("09/01/2020".to_string());
        assert!(args.query().is_err());
    }

    #[test]
    fn test_query_rejects_inverted_window() {
        let mut args = args();
        args.since = Some("2022-01-01".to_string());
        assert!(args.query().is_err());
    }

    #[tokio::test]
    async fn test_limits_from_args() {
        let limits = args().limits();
        assert_eq!(limits.max_pages, Some(5));
        assert!(limits.deadline.is_none());

        let mut with_timeout = args();
        with_timeout.timeout_secs = Some(30);
        assert!(with_timeout.limits().deadline.is_some());
    }
}
