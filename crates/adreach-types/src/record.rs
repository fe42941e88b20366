//! Ad record representation.

use serde::{Deserialize, Serialize};

use crate::{RawNumber, RecordError, numeric::is_fraction};

/// A single ad as returned by the ads archive.
///
/// Fields the estimator needs are optional at decode time: a missing field
/// rejects only its own record when processed, instead of failing the whole
/// page. Every other field the archive returns (`id`, `spend`, `bylines`,
/// `ad_snapshot_url`, ...) is kept verbatim in [`AdRecord::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    /// Reported impression bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<ImpressionRange>,
    /// Share of delivery per region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_by_region: Option<Vec<RegionShare>>,
    /// Share of delivery per gender and age bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_distribution: Option<Vec<DemographicShare>>,
    /// Remaining fields, untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Set when the record's JSON did not fit this shape. Such a record is
    /// rejected when processed.
    #[serde(skip)]
    pub decode_error: Option<RecordError>,
}

/// Just the id of a record, for records that fail to decode.
#[derive(Deserialize)]
struct RecordId {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

impl AdRecord {
    /// Decodes one record from its JSON text.
    ///
    /// Never fails. A record with a wrong-typed field (`"age": 25`) or a
    /// number outside the JSON range comes back with `decode_error` set and
    /// only its `id` kept, so it can be skipped on its own.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|err| Self::undecodable(raw, &err))
    }

    fn undecodable(raw: &str, err: &serde_json::Error) -> Self {
        let mut extra = serde_json::Map::new();
        if let Ok(RecordId { id: Some(id) }) = serde_json::from_str(raw) {
            extra.insert("id".to_string(), id);
        }
        Self {
            extra,
            decode_error: Some(RecordError::malformed("record", err)),
            ..Self::default()
        }
    }

    /// Returns the decoding failure, if the record had one.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] if the record did not decode.
    pub fn require_decoded(&self) -> Result<(), RecordError> {
        self.decode_error.clone().map_or(Ok(()), Err)
    }

    /// Returns the archive id of the ad, if present.
    ///
    /// Ids are normally strings but numeric ids are accepted too.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.extra.get("id")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns the impression bounds or a missing-field error.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if `impressions` is absent.
    pub fn require_impressions(&self) -> Result<&ImpressionRange, RecordError> {
        self.impressions
            .as_ref()
            .ok_or(RecordError::MissingField("impressions"))
    }

    /// Returns the region shares or a missing-field error.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if `delivery_by_region` is absent.
    pub fn require_regions(&self) -> Result<&[RegionShare], RecordError> {
        self.delivery_by_region
            .as_deref()
            .ok_or(RecordError::MissingField("delivery_by_region"))
    }

    /// Returns the demographic shares or a missing-field error.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if `demographic_distribution` is absent.
    pub fn require_demographics(&self) -> Result<&[DemographicShare], RecordError> {
        self.demographic_distribution
            .as_deref()
            .ok_or(RecordError::MissingField("demographic_distribution"))
    }
}

/// Reported low/high impression bounds.
///
/// `lower_bound <= upper_bound` is expected but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpressionRange {
    /// Lower bound.
    #[serde(default)]
    pub lower_bound: Option<RawNumber>,
    /// Upper bound.
    #[serde(default)]
    pub upper_bound: Option<RawNumber>,
}

impl ImpressionRange {
    /// Creates a range from two bounds.
    #[must_use]
    pub fn new(lower_bound: impl Into<RawNumber>, upper_bound: impl Into<RawNumber>) -> Self {
        Self {
            lower_bound: Some(lower_bound.into()),
            upper_bound: Some(upper_bound.into()),
        }
    }

    /// Creates a range from two integer bounds.
    #[must_use]
    pub fn from_bounds(lower_bound: u64, upper_bound: u64) -> Self {
        Self::new(lower_bound, upper_bound)
    }

    /// Coerces both bounds to integers, returning `(lower, upper)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is missing or not a non-negative integer.
    pub fn bounds(&self) -> Result<(u64, u64), RecordError> {
        let lower = self
            .lower_bound
            .as_ref()
            .ok_or(RecordError::MissingField("impressions.lower_bound"))?
            .to_count("impressions.lower_bound")?;
        let upper = self
            .upper_bound
            .as_ref()
            .ok_or(RecordError::MissingField("impressions.upper_bound"))?
            .to_count("impressions.upper_bound")?;
        Ok((lower, upper))
    }
}

/// One entry of `delivery_by_region`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionShare {
    /// Region name.
    #[serde(default)]
    pub region: Option<String>,
    /// Fraction of impressions delivered to the region.
    #[serde(default)]
    pub percentage: Option<RawNumber>,
}

impl RegionShare {
    /// Creates a region share.
    #[must_use]
    pub fn new(region: impl Into<String>, percentage: impl Into<RawNumber>) -> Self {
        Self {
            region: Some(region.into()),
            percentage: Some(percentage.into()),
        }
    }

    /// Coerces the entry to a region weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the region or percentage is missing or malformed.
    pub fn to_weight(&self) -> Result<CategoryWeight, RecordError> {
        let region = self
            .region
            .as_ref()
            .ok_or(RecordError::MissingField("delivery_by_region.region"))?;
        let fraction = self
            .percentage
            .as_ref()
            .ok_or(RecordError::MissingField("delivery_by_region.percentage"))?
            .to_fraction("delivery_by_region.percentage")?;
        Ok(CategoryWeight::new(region.clone(), fraction))
    }
}

/// One entry of `demographic_distribution`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicShare {
    /// Gender name (`male`, `female` or `unknown`).
    #[serde(default)]
    pub gender: Option<String>,
    /// Age bracket, e.g. `25-34`.
    #[serde(default)]
    pub age: Option<String>,
    /// Fraction of impressions delivered to this gender and age bracket.
    #[serde(default)]
    pub percentage: Option<RawNumber>,
}

impl DemographicShare {
    /// Creates a demographic share.
    #[must_use]
    pub fn new(
        gender: impl Into<String>,
        age: impl Into<String>,
        percentage: impl Into<RawNumber>,
    ) -> Self {
        Self {
            gender: Some(gender.into()),
            age: Some(age.into()),
            percentage: Some(percentage.into()),
        }
    }

    /// Coerces the percentage to a fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage is missing or malformed.
    pub fn fraction(&self) -> Result<f64, RecordError> {
        self.percentage
            .as_ref()
            .ok_or(RecordError::MissingField("demographic_distribution.percentage"))?
            .to_fraction("demographic_distribution.percentage")
    }

    /// Returns the gender as reported.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if absent.
    pub fn require_gender(&self) -> Result<&str, RecordError> {
        self.gender
            .as_deref()
            .ok_or(RecordError::MissingField("demographic_distribution.gender"))
    }

    /// Returns the age bracket as reported.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingField`] if absent.
    pub fn require_age(&self) -> Result<&str, RecordError> {
        self.age
            .as_deref()
            .ok_or(RecordError::MissingField("demographic_distribution.age"))
    }
}

/// A category with a coerced fractional weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    /// Category name.
    pub category: String,
    /// Fraction of the total allotted to the category.
    pub fraction: f64,
}

impl CategoryWeight {
    /// Creates a category weight.
    #[must_use]
    pub fn new(category: impl Into<String>, fraction: f64) -> Self {
        Self {
            category: category.into(),
            fraction,
        }
    }

    /// Returns true if the fraction is finite and within `[0, 1]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_fraction(self.fraction)
    }
}
