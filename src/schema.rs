//! Feature schema for the stress questionnaire
//!
//! The schema is the ordered list of indicators collected from the user.
//! Order is load-bearing: the persisted scaler and classifier were fit on
//! vectors in exactly this column order, so `describe()` must return the
//! same sequence every call.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::PredictError;

/// Value domain of a single feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Bounded integer range, inclusive on both ends
    Range { min: i64, max: i64 },
    /// Yes/no indicator stored as {0, 1}
    Binary,
}

impl Domain {
    /// Inclusive (min, max) bounds of the domain
    pub fn bounds(&self) -> (i64, i64) {
        match self {
            Domain::Range { min, max } => (*min, *max),
            Domain::Binary => (0, 1),
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        let (min, max) = self.bounds();
        value >= min && value <= max
    }
}

/// One named indicator collected from the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Column name, matching the reference dataset
    pub name: String,
    /// Question shown to the user
    pub prompt: String,
    /// Value domain
    pub domain: Domain,
    /// Three ordinal bin labels for display, low to high; binary features
    /// have none
    pub bin_labels: Option<[String; 3]>,
}

/// Canonical feature table: column order, prompts, dataset-derived domains
/// and bin labels. `anxiety_level` and `stress_level` are dataset columns
/// that never appear here; the first is excluded from the feature vector
/// and the second is the classification target.
type FeatureRow = (&'static str, &'static str, i64, i64, Option<[&'static str; 3]>);

const CANONICAL_FEATURES: [FeatureRow; 19] = [
    (
        "self_esteem",
        "Seberapa percaya diri kamu sama kemampuan dirimu?",
        0,
        30,
        Some(["Nggak percaya diri", "Cukup percaya diri", "Sangat percaya diri"]),
    ),
    (
        "mental_health_history",
        "Kamu punya riwayat gangguan kesehatan mental nggak?",
        0,
        1,
        None,
    ),
    (
        "depression",
        "Seberapa sering kamu merasa depresi belakangan ini?",
        0,
        27,
        Some(["Jarang merasa depresi", "Kadang-kadang merasa depresi", "Sering merasa depresi"]),
    ),
    (
        "headache",
        "Seberapa sering kamu ngerasa sakit kepala?",
        0,
        5,
        Some(["Jarang sakit kepala", "Kadang-kadang sakit kepala", "Sering sakit kepala"]),
    ),
    (
        "blood_pressure",
        "Gimana tekanan darah kamu akhir-akhir ini?",
        1,
        3,
        Some(["Normal", "Tinggi", "Sangat tinggi"]),
    ),
    (
        "sleep_quality",
        "Gimana kualitas tidur kamu?",
        0,
        5,
        Some(["Buruk", "Sedang", "Baik"]),
    ),
    (
        "breathing_problem",
        "Kamu pernah ngalamin masalah pernapasan nggak?",
        0,
        5,
        Some(["Jarang", "Kadang-kadang", "Sering"]),
    ),
    (
        "noise_level",
        "Seberapa sering kamu terganggu sama kebisingan di lingkungan kamu?",
        0,
        5,
        Some(["Tenang", "Sedang bising", "Sangat bising"]),
    ),
    (
        "living_conditions",
        "Gimana kondisi tempat tinggal kamu?",
        0,
        5,
        Some(["Nggak layak", "Cukup layak", "Sangat layak"]),
    ),
    (
        "safety",
        "Seberapa aman kamu ngerasa di lingkungan sekitar?",
        0,
        5,
        Some(["Nggak aman", "Cukup aman", "Sangat aman"]),
    ),
    (
        "basic_needs",
        "Kebutuhan dasar kamu terpenuhi nggak?",
        0,
        5,
        Some(["Nggak terpenuhi", "Sebagian terpenuhi", "Terpenuhi"]),
    ),
    (
        "academic_performance",
        "Gimana performa akademik kamu sekarang?",
        0,
        5,
        Some(["Buruk", "Sedang", "Baik"]),
    ),
    (
        "study_load",
        "Seberapa banyak beban belajar kamu?",
        0,
        5,
        Some(["Ringan", "Sedang", "Berat"]),
    ),
    (
        "teacher_student_relationship",
        "Gimana hubungan kamu sama guru atau dosen?",
        0,
        5,
        Some(["Buruk", "Cukup baik", "Sangat baik"]),
    ),
    (
        "future_career_concerns",
        "Seberapa khawatir kamu sama masa depan karier kamu?",
        0,
        5,
        Some(["Nggak khawatir", "Cukup khawatir", "Sangat khawatir"]),
    ),
    (
        "social_support",
        "Seberapa besar dukungan sosial yang kamu dapet dari orang-orang sekitar?",
        0,
        3,
        Some(["Nggak ada dukungan", "Sedikit dukungan", "Banyak dukungan"]),
    ),
    (
        "peer_pressure",
        "Seberapa sering kamu merasa tertekan sama teman sebaya?",
        0,
        5,
        Some(["Nggak pernah", "Kadang-kadang", "Sering"]),
    ),
    (
        "extracurricular_activities",
        "Seberapa aktif kamu di kegiatan ekstrakurikuler?",
        0,
        5,
        Some(["Nggak aktif", "Cukup aktif", "Sangat aktif"]),
    ),
    (
        "bullying",
        "Kamu pernah ngalamin bullying nggak?",
        0,
        5,
        Some(["Nggak pernah", "Kadang-kadang", "Sering"]),
    ),
];

/// The ordered feature schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    features: Vec<FeatureDescriptor>,
}

impl FeatureSchema {
    /// Canonical schema with dataset-derived literal ranges.
    ///
    /// This is the authoritative variant: the bounds are the observed
    /// min/max of each StressLevelDataset column, frozen as literals so a
    /// session never depends on a dataset file being present.
    pub fn canonical() -> Self {
        let features = CANONICAL_FEATURES
            .iter()
            .map(|&(name, prompt, min, max, labels)| FeatureDescriptor {
                name: name.to_string(),
                prompt: prompt.to_string(),
                domain: if (min, max) == (0, 1) && labels.is_none() {
                    Domain::Binary
                } else {
                    Domain::Range { min, max }
                },
                bin_labels: labels.map(|l| l.map(String::from)),
            })
            .collect();
        Self { features }
    }

    /// Schema with ranges scanned from a reference dataset.
    ///
    /// Prompts and bin labels come from the canonical table; bounds come
    /// from the dataset's observed per-column min/max. Every canonical
    /// feature must be present as a dataset column. Binary features keep
    /// their {0, 1} domain regardless of what the scan observed.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, PredictError> {
        let mut schema = Self::canonical();
        for feature in &mut schema.features {
            if feature.domain == Domain::Binary {
                continue;
            }
            let (min, max) = dataset.column_bounds(&feature.name).ok_or_else(|| {
                PredictError::Dataset(format!(
                    "reference dataset is missing column '{}'",
                    feature.name
                ))
            })?;
            feature.domain = Domain::Range { min, max };
        }
        Ok(schema)
    }

    /// Schema with one fixed literal range applied to every non-binary
    /// feature.
    ///
    /// Legacy variant for deployments whose scaler was fit on a uniform
    /// range. Not the default; prefer [`FeatureSchema::canonical`] unless
    /// the fitted scaler says otherwise.
    pub fn with_fixed_range(min: i64, max: i64) -> Self {
        let mut schema = Self::canonical();
        for feature in &mut schema.features {
            if feature.domain != Domain::Binary {
                feature.domain = Domain::Range { min, max };
            }
        }
        schema
    }

    /// Schema over caller-supplied descriptors, in the order given
    pub fn from_descriptors(features: Vec<FeatureDescriptor>) -> Self {
        Self { features }
    }

    /// Ordered feature descriptors. Stable across calls within a process.
    pub fn describe(&self) -> &[FeatureDescriptor] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_order_is_stable() {
        let a = FeatureSchema::canonical();
        let b = FeatureSchema::canonical();
        let names_a: Vec<_> = a.describe().iter().map(|f| f.name.clone()).collect();
        let names_b: Vec<_> = b.describe().iter().map(|f| f.name.clone()).collect();
        assert_eq!(names_a, names_b);
        assert_eq!(a.len(), 19);
        assert_eq!(names_a[0], "self_esteem");
        assert_eq!(names_a[18], "bullying");
    }

    #[test]
    fn mental_health_history_is_the_only_binary_feature() {
        let schema = FeatureSchema::canonical();
        let binary: Vec<_> = schema
            .describe()
            .iter()
            .filter(|f| f.domain == Domain::Binary)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(binary, vec!["mental_health_history"]);
    }

    #[test]
    fn binary_features_carry_no_bin_labels() {
        let schema = FeatureSchema::canonical();
        for feature in schema.describe() {
            match feature.domain {
                Domain::Binary => assert!(feature.bin_labels.is_none()),
                Domain::Range { min, max } => {
                    assert!(min < max, "{} has a degenerate range", feature.name);
                    assert!(feature.bin_labels.is_some());
                }
            }
        }
    }

    #[test]
    fn dataset_derived_bounds_override_canonical() {
        // two rows spanning [1, 4] for every ranged column
        let canonical = FeatureSchema::canonical();
        let columns: Vec<&str> = canonical
            .describe()
            .iter()
            .filter(|f| f.domain != Domain::Binary)
            .map(|f| f.name.as_str())
            .collect();
        let csv = format!(
            "{}\n{}\n{}\n",
            columns.join(","),
            vec!["1"; columns.len()].join(","),
            vec!["4"; columns.len()].join(",")
        );
        let dataset = Dataset::parse(&csv).unwrap();

        let derived = FeatureSchema::from_dataset(&dataset).unwrap();
        for feature in derived.describe() {
            match feature.name.as_str() {
                "mental_health_history" => assert_eq!(feature.domain, Domain::Binary),
                _ => assert_eq!(feature.domain, Domain::Range { min: 1, max: 4 }),
            }
        }

        // derivation changes bounds only, never order
        let canonical_names: Vec<_> =
            canonical.describe().iter().map(|f| &f.name).collect();
        let derived_names: Vec<_> = derived.describe().iter().map(|f| &f.name).collect();
        assert_eq!(canonical_names, derived_names);
    }

    #[test]
    fn dataset_missing_a_feature_column_is_rejected() {
        let dataset = Dataset::parse("self_esteem\n3\n").unwrap();
        let err = FeatureSchema::from_dataset(&dataset).unwrap_err();
        assert!(matches!(err, PredictError::Dataset(_)));
        assert!(err.to_string().contains("missing column"));
    }

    #[test]
    fn fixed_range_leaves_binary_domains_alone() {
        let schema = FeatureSchema::with_fixed_range(0, 100);
        for feature in schema.describe() {
            match feature.name.as_str() {
                "mental_health_history" => assert_eq!(feature.domain, Domain::Binary),
                _ => assert_eq!(feature.domain, Domain::Range { min: 0, max: 100 }),
            }
        }
    }

    #[test]
    fn domain_bounds_and_containment() {
        let range = Domain::Range { min: 1, max: 3 };
        assert_eq!(range.bounds(), (1, 3));
        assert!(range.contains(1));
        assert!(range.contains(3));
        assert!(!range.contains(0));
        assert!(!range.contains(4));

        assert_eq!(Domain::Binary.bounds(), (0, 1));
        assert!(!Domain::Binary.contains(2));
    }
}
