//! Lenient numeric fields.
//!
//! The ads archive reports bounds and percentages as strings (`"1000"`,
//! `"0.25"`), while hand-made snapshots often use plain JSON numbers. Both are
//! accepted at decode time; coercion happens when a record is processed so a
//! bad value only rejects its own record.

use serde::{Deserialize, Serialize};

use crate::RecordError;

/// A numeric field as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// A JSON number.
    Number(serde_json::Number),
    /// A number encoded as text.
    Text(String),
    /// Any other JSON value (always malformed).
    Other(serde_json::Value),
}

impl RawNumber {
    /// Coerces the value to a non-negative integer count.
    ///
    /// Text is trimmed and parsed as base-10. Fractional, negative and
    /// non-numeric values are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] naming `field` if coercion fails.
    pub fn to_count(&self, field: &'static str) -> Result<u64, RecordError> {
        let parsed = match self {
            Self::Number(n) => n.as_u64(),
            Self::Text(s) => s.trim().parse::<u64>().ok(),
            Self::Other(_) => None,
        };
        parsed.ok_or_else(|| RecordError::malformed(field, self))
    }

    /// Coerces the value to a fraction in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] naming `field` if the value is not a
    /// finite number within range.
    pub fn to_fraction(&self, field: &'static str) -> Result<f64, RecordError> {
        let parsed = match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Other(_) => None,
        };
        match parsed {
            Some(f) if is_fraction(f) => Ok(f),
            _ => Err(RecordError::malformed(field, self)),
        }
    }
}

/// Returns true if `value` is a finite number in `[0, 1]`.
#[must_use]
pub(crate) fn is_fraction(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

impl std::fmt::Display for RawNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for RawNumber {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for RawNumber {
    /// Non-finite values have no JSON form and become [`RawNumber::Other`].
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map_or(Self::Other(serde_json::Value::Null), Self::Number)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn from_json(json: &str) -> RawNumber {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_variants() {
        assert!(matches!(from_json("15"), RawNumber::Number(_)));
        assert!(matches!(from_json("\"15\""), RawNumber::Text(_)));
        assert!(matches!(from_json("true"), RawNumber::Other(_)));
        assert!(matches!(from_json("null"), RawNumber::Other(_)));
    }

    #[test]
    fn test_count_from_text_and_number() {
        assert_eq!(from_json("\"1000\"").to_count("lower_bound"), Ok(1000));
        assert_eq!(from_json("\" 42 \"").to_count("lower_bound"), Ok(42));
        assert_eq!(from_json("7").to_count("lower_bound"), Ok(7));
    }

    #[test]
    fn test_count_rejects_non_integers() {
        for json in ["\"abc\"", "\"\"", "-3", "\"-3\"", "1.5", "\"1.5\"", "true"] {
            let err = from_json(json).to_count("upper_bound").unwrap_err();
            assert!(
                matches!(err, RecordError::Malformed { field: "upper_bound", .. }),
                "{json} should be malformed"
            );
        }
    }

    #[test]
    fn test_fraction_from_text_and_number() {
        assert_relative_eq!(from_json("\"0.25\"").to_fraction("percentage").unwrap(), 0.25);
        assert_relative_eq!(from_json("0.6").to_fraction("percentage").unwrap(), 0.6);
        assert_relative_eq!(from_json("1").to_fraction("percentage").unwrap(), 1.0);
    }

    #[test]
    fn test_fraction_rejects_out_of_range() {
        for json in ["\"1.5\"", "-0.1", "\"NaN\"", "\"inf\"", "\"half\"", "[]"] {
            assert!(
                from_json(json).to_fraction("percentage").is_err(),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_keeps_original_form() {
        assert_eq!(RawNumber::from("abc").to_string(), "\"abc\"");
        assert_eq!(RawNumber::from(12u64).to_string(), "12");
    }
}
