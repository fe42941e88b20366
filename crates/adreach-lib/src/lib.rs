//! Estimate and aggregate ad impressions from ads archive records.
//!
//! This is a facade crate that re-exports functionality from the adreach
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use adreach_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArchiveClient::with_defaults()?;
//!     let query = ArchiveQuery::new("TOKEN").with_page_ids(["100801038449520"]);
//!     let seed = client.seed_url(&query)?;
//!
//!     let records = crawl(&client, seed, CrawlLimits::unlimited());
//!     let report = aggregate_stream(records, ImpressionAggregator::default()).await;
//!
//!     println!("{} impressions", report.totals.total_impressions);
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/adreach/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use adreach_types::*;

// Re-export estimation
pub use adreach_estimate::{
    Estimator, RoundingMode, RoundingModeParseError, distribute, estimate,
};

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use adreach_fetch::{
    ArchiveClient, ClientConfig, CrawlLimits, CrawlState, Crawler, DecodeError, FetchError, Page,
    PageSource, SnapshotError, Url, crawl, decode_page, flatten_records, load_snapshot, page_stream,
    url,
};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use adreach_aggregate::{
    AggregateTotals, ImpressionAggregator, RecordProcessor, RecordResult, RunOutcome, RunReport,
    aggregate_records, aggregate_stream, aggregate_stream_with_progress, process_record,
};

/// Prelude module for convenient imports.
///
/// ```
/// use adreach_lib::prelude::*;
/// ```
pub mod prelude {
    pub use adreach_types::{
        AdRecord, AdreachError, CategoryCounts, Dimension, Gender, ImpressionRange, RecordError,
        Result,
    };

    pub use adreach_estimate::{Estimator, RoundingMode, RoundingModeParseError};

    #[cfg(feature = "fetch")]
    pub use adreach_fetch::{
        ArchiveClient, ClientConfig, CrawlLimits, FetchError, Page, PageSource, crawl,
        load_snapshot,
        url::{ArchiveQuery, BASE_URL, SeedUrlError, seed_url},
    };

    #[cfg(feature = "aggregate")]
    pub use adreach_aggregate::{
        AggregateTotals, ImpressionAggregator, RecordResult, RunReport, aggregate_records,
        aggregate_stream,
    };
}
