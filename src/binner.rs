//! Categorical binning for display annotations
//!
//! Maps a raw answer inside a feature's domain to one of three ordinal
//! descriptive bins. Presentation only: the raw value, not the bin, is what
//! enters the feature vector.

/// Bin index for a raw value within [min, max], always in {0, 1, 2}.
///
/// The `+ 1` in the divisor keeps zero-width domains (min == max) from
/// dividing by zero, and the floor at 1 keeps inverted bounds division-safe
/// too; the clamp covers out-of-range inputs.
pub fn bin_index(raw: i64, min: i64, max: i64) -> usize {
    let width = (max - min + 1).max(1);
    let idx = (raw - min) * 3 / width;
    idx.clamp(0, 2) as usize
}

/// Bin label for a raw value within [min, max]
pub fn bin_label<'a>(raw: i64, min: i64, max: i64, labels: &'a [String; 3]) -> &'a str {
    &labels[bin_index(raw, min, max)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Domain, FeatureSchema};

    #[test]
    fn endpoints_stay_in_range() {
        for &(min, max) in &[(0i64, 5i64), (1, 3), (0, 30), (0, 100), (0, 1)] {
            for raw in min..=max {
                let idx = bin_index(raw, min, max);
                assert!(idx <= 2, "bin {} for {} in [{}, {}]", idx, raw, min, max);
            }
            assert_eq!(bin_index(min, min, max), 0);
        }
        // wide domains reach the top bin at max
        assert_eq!(bin_index(5, 0, 5), 2);
        assert_eq!(bin_index(100, 0, 100), 2);
        // a two-value domain never reaches it
        assert_eq!(bin_index(1, 0, 1), 1);
    }

    #[test]
    fn zero_width_domain_does_not_divide_by_zero() {
        assert_eq!(bin_index(7, 7, 7), 0);
    }

    #[test]
    fn inverted_bounds_do_not_divide_by_zero() {
        // nonsense domain, but a pub fn should not fault on it
        assert_eq!(bin_index(3, 5, 2), 0);
        assert_eq!(bin_index(9, 5, 2), 2);
    }

    #[test]
    fn midpoint_of_percent_range_is_middle_bin() {
        // floor(50 * 3 / 101) = 1
        let labels = ["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(bin_index(50, 0, 100), 1);
        assert_eq!(bin_label(50, 0, 100, &labels), "B");
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(bin_index(-10, 0, 5), 0);
        assert_eq!(bin_index(10, 0, 5), 2);
    }

    #[test]
    fn every_canonical_domain_bins_cleanly() {
        let schema = FeatureSchema::canonical();
        for feature in schema.describe() {
            let (min, max) = feature.domain.bounds();
            for raw in min..=max {
                assert!(bin_index(raw, min, max) <= 2);
            }
            if let Domain::Range { min, max } = feature.domain {
                // low end of the domain always reads as the low bin
                assert_eq!(bin_index(min, min, max), 0);
            }
        }
    }
}
