//! Per-record impression breakdown.

use adreach_estimate::Estimator;
use adreach_types::{
    AdRecord, CategoryCounts, CategoryWeight, Dimension, Gender, RecordError, RegionShare,
};
use serde::{Deserialize, Serialize};

/// Impression breakdown of a single ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResult {
    /// Rounded midpoint of the reported impression range.
    pub estimated_impressions: u64,
    /// Estimated impressions per region.
    pub by_region: CategoryCounts,
    /// Estimated impressions per gender; always holds male, female and unknown.
    pub by_gender: CategoryCounts,
    /// Estimated impressions per age bracket.
    pub by_age: CategoryCounts,
}

/// Applies the estimator to ad records.
///
/// Stateless apart from the estimator's rounding rule, so one processor can
/// be shared freely and records can be processed in any order.
#[derive(Debug, Clone, Default)]
pub struct RecordProcessor {
    estimator: Estimator,
}

impl RecordProcessor {
    /// Creates a processor using the given estimator.
    #[must_use]
    pub const fn new(estimator: Estimator) -> Self {
        Self { estimator }
    }

    /// Returns the estimator.
    #[must_use]
    pub const fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Estimates impressions for one record and splits them by region,
    /// gender and age.
    ///
    /// The record is processed as a unit: a record that did not decode, a
    /// missing field, a malformed number or an unknown category rejects it and
    /// no partial result is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordError`] encountered.
    pub fn process(&self, record: &AdRecord) -> Result<RecordResult, RecordError> {
        record.require_decoded()?;
        let estimated_impressions = self.estimator.estimate(record.require_impressions()?)?;

        let region_weights = record
            .require_regions()?
            .iter()
            .map(RegionShare::to_weight)
            .collect::<Result<Vec<_>, _>>()?;

        let demographics = record.require_demographics()?;
        let mut gender_weights = Vec::with_capacity(demographics.len());
        let mut age_weights = Vec::with_capacity(demographics.len());
        for share in demographics {
            let gender = share.require_gender()?;
            let gender = gender
                .parse::<Gender>()
                .map_err(|_| RecordError::UnknownCategory {
                    dimension: Dimension::GENDER.name(),
                    value: gender.to_string(),
                })?;
            let age = share.require_age()?;
            let fraction = share.fraction()?;

            gender_weights.push(CategoryWeight::new(gender.as_str(), fraction));
            age_weights.push(CategoryWeight::new(age, fraction));
        }

        Ok(RecordResult {
            estimated_impressions,
            by_region: self.estimator.distribute(
                estimated_impressions,
                region_weights,
                &Dimension::REGION,
            )?,
            by_gender: self.estimator.distribute(
                estimated_impressions,
                gender_weights,
                &Dimension::GENDER,
            )?,
            by_age: self.estimator.distribute(
                estimated_impressions,
                age_weights,
                &Dimension::AGE,
            )?,
        })
    }
}

/// Processes one record with the default round-half-to-even processor.
///
/// # Errors
///
/// See [`RecordProcessor::process`].
pub fn process_record(record: &AdRecord) -> Result<RecordResult, RecordError> {
    RecordProcessor::default().process(record)
}
