//! Impression estimation logic.

use std::sync::OnceLock;

use adreach_types::{CategoryCounts, CategoryWeight, Dimension, ImpressionRange, RecordError};
use tracing::debug;

use crate::RoundingMode;

/// Static estimator instance.
static ESTIMATOR: OnceLock<Estimator> = OnceLock::new();

/// Impression estimator.
///
/// Holds the rounding rule applied both to midpoints and to per-category
/// contributions.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    rounding: RoundingMode,
}

impl Estimator {
    /// Creates a new estimator with the given rounding rule.
    #[must_use]
    pub const fn new(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    /// Returns the global estimator instance (round-half-to-even).
    #[must_use]
    pub fn global() -> &'static Self {
        ESTIMATOR.get_or_init(Self::default)
    }

    /// Returns the rounding rule.
    #[must_use]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Estimates the impressions of one ad as the rounded midpoint of its range.
    ///
    /// An inverted range (`lower_bound > upper_bound`) is not clamped; the
    /// midpoint is computed as given.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is missing or not a non-negative integer.
    pub fn estimate(&self, range: &ImpressionRange) -> Result<u64, RecordError> {
        let (lower, upper) = range.bounds()?;
        if lower > upper {
            debug!(lower, upper, "inverted impression range");
        }
        Ok(self.rounding.midpoint(lower, upper))
    }

    /// Splits `total` across the categories of `dimension`.
    ///
    /// Each weight contributes `round(total * fraction)` independently; weights
    /// are not renormalized, so contributions need not sum to `total`.
    /// Repeated categories accumulate. For a fixed dimension every member is
    /// present in the result, zero if unreported.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownCategory`] for a category outside a fixed
    /// dimension and [`RecordError::Malformed`] for a fraction outside `[0, 1]`.
    pub fn distribute<I>(
        &self,
        total: u64,
        weights: I,
        dimension: &Dimension,
    ) -> Result<CategoryCounts, RecordError>
    where
        I: IntoIterator<Item = CategoryWeight>,
    {
        crate::distribute::distribute_with(self.rounding, total, weights, dimension)
    }
}

/// Estimates impressions using the global estimator.
///
/// # Errors
///
/// See [`Estimator::estimate`].
pub fn estimate(range: &ImpressionRange) -> Result<u64, RecordError> {
    Estimator::global().estimate(range)
}

/// Distributes a total using the global estimator.
///
/// # Errors
///
/// See [`Estimator::distribute`].
pub fn distribute<I>(
    total: u64,
    weights: I,
    dimension: &Dimension,
) -> Result<CategoryCounts, RecordError>
where
    I: IntoIterator<Item = CategoryWeight>,
{
    Estimator::global().distribute(total, weights, dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreach_types::RawNumber;

    #[test]
    fn test_estimate_midpoint() {
        let range = ImpressionRange::from_bounds(10, 20);
        assert_eq!(estimate(&range), Ok(15));
    }

    #[test]
    fn test_estimate_half_rounds_to_even() {
        assert_eq!(estimate(&ImpressionRange::from_bounds(10, 11)), Ok(10));
        assert_eq!(estimate(&ImpressionRange::from_bounds(11, 12)), Ok(12));
    }

    #[test]
    fn test_estimate_half_away_from_zero() {
        let estimator = Estimator::new(RoundingMode::HalfAwayFromZero);
        assert_eq!(
            estimator.estimate(&ImpressionRange::from_bounds(10, 11)),
            Ok(11)
        );
    }

    #[test]
    fn test_estimate_from_text_bounds() {
        let range = ImpressionRange::new("1000", "1999");
        assert_eq!(estimate(&range), Ok(1500));
    }

    #[test]
    fn test_estimate_inverted_range_is_not_clamped() {
        let range = ImpressionRange::from_bounds(20, 10);
        assert_eq!(estimate(&range), Ok(15));
    }

    #[test]
    fn test_estimate_non_numeric_bound_is_an_error() {
        let range = ImpressionRange::new("ten", "20");
        assert_eq!(
            estimate(&range),
            Err(RecordError::malformed(
                "impressions.lower_bound",
                RawNumber::from("ten")
            ))
        );
    }

    #[test]
    fn test_estimate_missing_bound_is_an_error() {
        let range = ImpressionRange {
            lower_bound: Some(RawNumber::from(10u64)),
            upper_bound: None,
        };
        assert_eq!(
            estimate(&range),
            Err(RecordError::MissingField("impressions.upper_bound"))
        );
    }

    #[test]
    fn test_global_is_half_even() {
        assert_eq!(Estimator::global().rounding(), RoundingMode::HalfEven);
    }
}
