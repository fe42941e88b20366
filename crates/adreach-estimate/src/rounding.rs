//! Rounding rules.

use thiserror::Error;

/// How a value exactly halfway between two integers is rounded.
///
/// The same mode is used for midpoints and for per-category contributions so
/// that a run is reproducible end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    /// Round half to even (banker's rounding): 10.5 -> 10, 11.5 -> 12.
    #[default]
    HalfEven,
    /// Round half away from zero: 10.5 -> 11, 11.5 -> 12.
    HalfAwayFromZero,
}

impl RoundingMode {
    /// Returns the mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HalfEven => "half-even",
            Self::HalfAwayFromZero => "half-away-from-zero",
        }
    }

    /// Rounds the exact mean of two integers.
    ///
    /// Works on integers throughout, so no precision is lost for large bounds.
    #[must_use]
    pub const fn midpoint(&self, a: u64, b: u64) -> u64 {
        let sum = a as u128 + b as u128;
        let quotient = (sum / 2) as u64;
        if sum % 2 == 0 {
            return quotient;
        }
        match self {
            Self::HalfEven => quotient + (quotient & 1),
            Self::HalfAwayFromZero => quotient + 1,
        }
    }

    /// Rounds a non-negative product to an integer count.
    ///
    /// Negative and non-finite inputs round to zero; values past `u64::MAX`
    /// saturate.
    #[must_use]
    pub fn round(&self, value: f64) -> u64 {
        let rounded = match self {
            Self::HalfEven => value.round_ties_even(),
            Self::HalfAwayFromZero => value.round(),
        };
        // `as` saturates and maps NaN to zero.
        rounded as u64
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = RoundingModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half-even" | "even" | "bankers" => Ok(Self::HalfEven),
            "half-away-from-zero" | "half-up" | "away" => Ok(Self::HalfAwayFromZero),
            _ => Err(RoundingModeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown rounding mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown rounding mode: {0}. Valid options: half-even, half-away-from-zero")]
pub struct RoundingModeParseError(pub String);
