//! Ordered per-category integer counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Integer counts keyed by category name.
///
/// Entries are created explicitly: either up front with [`CategoryCounts::seeded`]
/// for fixed dimensions, or on first [`CategoryCounts::add`] for open ones.
/// Reads of an absent category go through [`CategoryCounts::get_or_zero`].
/// Iteration order is the category name order, so two equal maps always print
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts(BTreeMap<String, u64>);

impl CategoryCounts {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a map holding a zero entry for every given category.
    #[must_use]
    pub fn seeded<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(categories.into_iter().map(|c| (c.into(), 0)).collect())
    }

    /// Returns the count for `category`, or zero if it has no entry.
    #[must_use]
    pub fn get_or_zero(&self, category: &str) -> u64 {
        self.0.get(category).copied().unwrap_or(0)
    }

    /// Returns the count for `category` if it has an entry.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<u64> {
        self.0.get(category).copied()
    }

    /// Returns true if `category` has an entry (possibly zero).
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Adds `amount` to `category`, creating the entry at zero first if absent.
    pub fn add(&mut self, category: &str, amount: u64) {
        match self.0.get_mut(category) {
            Some(count) => *count = count.saturating_add(amount),
            None => {
                self.0.insert(category.to_string(), amount);
            }
        }
    }

    /// Adds every entry of `other` into this map.
    pub fn merge(&mut self, other: &Self) {
        for (category, amount) in other.iter() {
            self.add(category, amount);
        }
    }

    /// Returns the sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    /// Returns the number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(category, count)` pairs in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for CategoryCounts {
    /// Collects pairs additively; repeated categories are summed.
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (category, amount) in iter {
            let category: String = category.into();
            counts.add(&category, amount);
        }
        counts
    }
}

impl<S: Into<String>, const N: usize> From<[(S, u64); N]> for CategoryCounts {
    fn from(pairs: [(S, u64); N]) -> Self {
        pairs.into_iter().collect()
    }
}
