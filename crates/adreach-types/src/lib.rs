//! Core types for the adreach ad impression estimator.
//!
//! This crate provides the fundamental data structures used throughout adreach:
//!
//! - [`AdRecord`] - A single ad as returned by the ads archive
//! - [`ImpressionRange`] - Reported low/high impression bounds
//! - [`RawNumber`] - A numeric field that may arrive as a number or as text
//! - [`CategoryWeight`] - A coerced category/fraction pair
//! - [`Dimension`] - A categorical dimension (region, gender, age)
//! - [`CategoryCounts`] - Ordered per-category integer counts
//! - [`Gender`] - The closed gender category set

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/adreach/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod counts;
mod dimension;
mod error;
mod gender;
mod numeric;
mod record;

pub use counts::CategoryCounts;
pub use dimension::Dimension;
pub use error::{AdreachError, RecordError, Result};
pub use gender::{Gender, GenderParseError};
pub use numeric::RawNumber;
pub use record::{AdRecord, CategoryWeight, DemographicShare, ImpressionRange, RegionShare};
