//! Error types for adreach.

use thiserror::Error;

/// Result type alias for adreach operations.
pub type Result<T> = std::result::Result<T, AdreachError>;

/// Errors that can end or abort an adreach run.
#[derive(Error, Debug)]
pub enum AdreachError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A page could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A crawl limit (page count or deadline) stopped the run early.
    #[error("Crawl stopped early: {0}")]
    LimitReached(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors scoped to a single ad record.
///
/// A record that fails with any of these is skipped as a whole; the run
/// continues with the next record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but cannot be coerced to the expected number.
    #[error("Malformed value for {field}: {value}")]
    Malformed {
        /// The field that failed coercion.
        field: &'static str,
        /// The offending value as it appeared in the input.
        value: String,
    },

    /// A category outside the fixed set of its dimension.
    #[error("Unknown {dimension} category: {value}")]
    UnknownCategory {
        /// The dimension the category was reported under.
        dimension: &'static str,
        /// The unrecognized category.
        value: String,
    },
}

impl RecordError {
    /// Creates a malformed-value error.
    #[must_use]
    pub fn malformed(field: &'static str, value: impl ToString) -> Self {
        Self::Malformed {
            field,
            value: value.to_string(),
        }
    }

    /// Returns true for missing or malformed input, false for unknown categories.
    #[must_use]
    pub const fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: AdreachError = std::io::Error::new(std::io::ErrorKind::NotFound, "ads.json").into();
        assert!(matches!(err, AdreachError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_record_error_scope() {
        assert!(RecordError::MissingField("impressions").is_malformed_input());
        assert!(RecordError::malformed("record", "bad").is_malformed_input());
        let unknown = RecordError::UnknownCategory {
            dimension: "gender",
            value: "other".to_string(),
        };
        assert!(!unknown.is_malformed_input());
    }
}
