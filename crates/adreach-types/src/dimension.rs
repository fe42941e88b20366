//! Categorical dimensions an impression estimate is split across.

use crate::Gender;

/// A categorical dimension.
///
/// A dimension is either open (any string is a category, and only reported
/// categories appear in a breakdown) or fixed (every member of the set appears
/// in a breakdown, and anything else is rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    name: &'static str,
    fixed_categories: Option<&'static [&'static str]>,
}

impl Dimension {
    /// Geographic region, open.
    pub const REGION: Self = Self::open("region");

    /// Gender, fixed to male/female/unknown.
    pub const GENDER: Self = Self::fixed("gender", Gender::NAMES);

    /// Age bracket, open.
    pub const AGE: Self = Self::open("age");

    /// Creates an open dimension.
    #[must_use]
    pub const fn open(name: &'static str) -> Self {
        Self {
            name,
            fixed_categories: None,
        }
    }

    /// Creates a dimension with a fixed category set.
    #[must_use]
    pub const fn fixed(name: &'static str, categories: &'static [&'static str]) -> Self {
        Self {
            name,
            fixed_categories: Some(categories),
        }
    }

    /// Returns the dimension name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fixed category set, if any.
    #[must_use]
    pub const fn fixed_categories(&self) -> Option<&'static [&'static str]> {
        self.fixed_categories
    }

    /// Returns true if `category` may appear in this dimension.
    #[must_use]
    pub fn accepts(&self, category: &str) -> bool {
        self.fixed_categories
            .is_none_or(|fixed| fixed.iter().any(|c| *c == category))
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
