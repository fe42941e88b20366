//! Ads archive client and cursor-driven crawling for adreach.
//!
//! - [`url::seed_url`] - Builds the first archive request
//! - [`ArchiveClient`] - HTTP client for archive pages
//! - [`decode_page`] - Page JSON decoding
//! - [`crawl`] - Lazy record stream following `paging.next`
//! - [`load_snapshot`] - Reads a pre-fetched page from disk

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/adreach/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod parse;
mod snapshot;
mod source;
mod stream;
pub mod url;

pub use reqwest::Url;

pub use client::{ArchiveClient, ClientConfig, FetchError};
pub use parse::{DecodeError, Page, decode_page};
pub use snapshot::{SnapshotError, load_snapshot};
pub use source::PageSource;
pub use stream::{CrawlLimits, CrawlState, Crawler, crawl, flatten_records, page_stream};
