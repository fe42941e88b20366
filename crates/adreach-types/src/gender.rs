//! Gender categories reported in demographic distributions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of gender categories the archive reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Unknown or undisclosed.
    Unknown,
}

impl Gender {
    /// All gender categories.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

    /// Category names of [`Gender::ALL`], in the same order.
    pub const NAMES: &'static [&'static str] = &["male", "female", "unknown"];

    /// Returns the category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for a gender value outside the known set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown gender: {0}")]
pub struct GenderParseError(pub String);

impl std::str::FromStr for Gender {
    type Err = GenderParseError;

    /// Matches exactly; the archive always reports lowercase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unknown" => Ok(Self::Unknown),
            _ => Err(GenderParseError(s.to_string())),
        }
    }
}
