//! Proportional redistribution of a count across categories.

use adreach_types::{CategoryCounts, CategoryWeight, Dimension, RecordError};

use crate::RoundingMode;

pub(crate) fn distribute_with<I>(
    rounding: RoundingMode,
    total: u64,
    weights: I,
    dimension: &Dimension,
) -> Result<CategoryCounts, RecordError>
where
    I: IntoIterator<Item = CategoryWeight>,
{
    let mut counts = dimension
        .fixed_categories()
        .map_or_else(CategoryCounts::new, |fixed| {
            CategoryCounts::seeded(fixed.iter().copied())
        });

    for weight in weights {
        if !dimension.accepts(&weight.category) {
            return Err(RecordError::UnknownCategory {
                dimension: dimension.name(),
                value: weight.category,
            });
        }
        if !weight.is_valid() {
            return Err(RecordError::malformed(dimension.name(), weight.fraction));
        }
        // Precision loss above 2^53 impressions is acceptable here.
        let contribution = rounding.round(total as f64 * weight.fraction);
        counts.add(&weight.category, contribution);
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribute;

    fn weights(pairs: &[(&str, f64)]) -> Vec<CategoryWeight> {
        pairs
            .iter()
            .map(|(category, fraction)| CategoryWeight::new(*category, *fraction))
            .collect()
    }

    #[test]
    fn test_open_dimension() {
        let counts = distribute(
            100,
            weights(&[("US", 0.6), ("CA", 0.4)]),
            &Dimension::REGION,
        )
        .unwrap();

        assert_eq!(counts, CategoryCounts::from([("US", 60), ("CA", 40)]));
    }

    #[test]
    fn test_open_dimension_only_reports_present_categories() {
        let counts = distribute(100, weights(&[("25-34", 1.0)]), &Dimension::AGE).unwrap();
        assert_eq!(counts.len(), 1);
        assert!(!counts.contains("18-24"));
        assert_eq!(counts.get_or_zero("18-24"), 0);
    }

    #[test]
    fn test_fixed_dimension_is_seeded() {
        let counts = distribute(100, weights(&[("male", 1.0)]), &Dimension::GENDER).unwrap();

        assert_eq!(
            counts,
            CategoryCounts::from([("male", 100), ("female", 0), ("unknown", 0)])
        );
    }

    #[test]
    fn test_fixed_dimension_with_no_weights() {
        let counts = distribute(100, Vec::new(), &Dimension::GENDER).unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_fixed_dimension_rejects_unknown_category() {
        let err = distribute(100, weights(&[("other", 0.5)]), &Dimension::GENDER).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownCategory {
                dimension: "gender",
                value: "other".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_categories_accumulate() {
        let counts = distribute(
            1000,
            weights(&[("25-34", 0.1), ("35-44", 0.5), ("25-34", 0.2)]),
            &Dimension::AGE,
        )
        .unwrap();

        assert_eq!(counts.get("25-34"), Some(300));
        assert_eq!(counts.get("35-44"), Some(500));
    }

    #[test]
    fn test_each_contribution_is_rounded_independently() {
        // 0.25 * 10 = 2.5 rounds to 2 twice, rather than 5 rounded once.
        let counts = distribute(
            10,
            weights(&[("a", 0.25), ("a", 0.25)]),
            &Dimension::REGION,
        )
        .unwrap();
        assert_eq!(counts.get("a"), Some(4));
    }

    #[test]
    fn test_weights_are_not_renormalized() {
        let counts = distribute(
            100,
            weights(&[("US", 0.5), ("CA", 0.3)]),
            &Dimension::REGION,
        )
        .unwrap();
        assert_eq!(counts.total(), 80);
    }

    #[test]
    fn test_rounding_drift_is_bounded() {
        let thirds = weights(&[("a", 1.0 / 3.0), ("b", 1.0 / 3.0), ("c", 1.0 / 3.0)]);
        let counts = distribute(1001, thirds, &Dimension::REGION).unwrap();

        let drift = counts.total().abs_diff(1001);
        assert!(drift <= counts.len() as u64, "drift {drift} too large");
    }

    #[test]
    fn test_out_of_range_fraction() {
        let err = distribute(100, weights(&[("US", 1.5)]), &Dimension::REGION).unwrap_err();
        assert!(err.is_malformed_input());
    }
}
