//! Impression estimation for the adreach ad impression estimator.
//!
//! This crate provides the two arithmetic steps applied to every ad record:
//!
//! - [`Estimator::estimate`] - Rounded midpoint of a reported impression range
//! - [`Estimator::distribute`] - Split of an estimate across a dimension's categories
//! - [`RoundingMode`] - The rounding rule shared by both steps
//!
//! [`estimate`] and [`distribute`] are shorthands using the default
//! round-half-to-even estimator.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/adreach/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod distribute;
mod estimator;
mod rounding;

pub use estimator::{Estimator, distribute, estimate};
pub use rounding::{RoundingMode, RoundingModeParseError};
