//! Impression aggregation for the adreach ad impression estimator.
//!
//! This crate provides record processing and accumulation:
//!
//! - [`RecordProcessor`] - Turns one ad record into a [`RecordResult`]
//! - [`AggregateTotals`] - Run-wide totals, grown by [`AggregateTotals::fold`]
//! - [`ImpressionAggregator`] - Streaming processor with skip-and-continue
//! - [`aggregate_stream`] - Drains a record stream into a [`RunReport`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/adreach/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod accumulator;
mod aggregator;
mod processor;
mod run;

pub use accumulator::AggregateTotals;
pub use aggregator::{ImpressionAggregator, aggregate_records};
pub use processor::{RecordProcessor, RecordResult, process_record};
pub use run::{RunOutcome, RunReport, aggregate_stream, aggregate_stream_with_progress};
