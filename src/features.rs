//! Feature derivation applied to raw study-habit records.
//!
//! One derived feature is added on top of the raw inputs: study intensity,
//! hours studied divided by (sleep hours + 1). The same derivation runs on
//! the full dataset at training time and on single records at inference
//! time; the preprocessor's learned statistics assume the two agree.

use crate::data::{
    RawRecord, EXTRACURRICULAR, HOURS_STUDIED, PREVIOUS_SCORES, SAMPLE_PAPERS, SLEEP_HOURS,
};
use serde::{Deserialize, Serialize};

/// Name of the derived feature.
pub const STUDY_INTENSITY: &str = "StudyIntensity";

/// Numeric features in encoding order.
pub const NUMERIC_FEATURES: [&str; 5] = [
    HOURS_STUDIED,
    PREVIOUS_SCORES,
    SLEEP_HOURS,
    SAMPLE_PAPERS,
    STUDY_INTENSITY,
];

/// The single categorical feature, one-hot encoded after the numeric block.
pub const CATEGORICAL_FEATURE: &str = EXTRACURRICULAR;

/// A raw record plus its derived feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    /// The validated raw inputs.
    pub raw: RawRecord,
    /// Hours studied / (sleep hours + 1).
    pub study_intensity: f32,
}

impl DerivedRecord {
    /// Returns the numeric features in encoding order.
    #[must_use]
    pub fn numeric_row(&self) -> [f32; 5] {
        [
            self.raw.hours_studied,
            self.raw.previous_scores,
            self.raw.sleep_hours,
            self.raw.sample_papers as f32,
            self.study_intensity,
        ]
    }

    /// Returns the categorical feature value.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.raw.extracurricular
    }
}

/// Derives the study-intensity feature from a raw record.
///
/// Pure and deterministic. The denominator `sleep_hours + 1` is strictly
/// positive for any validated record (sleep_hours >= 0), so the division is
/// always defined; at the sleep_hours = 0 boundary this is just
/// hours_studied / 1.
///
/// # Examples
///
/// ```
/// use rendimiento::data::RawRecord;
/// use rendimiento::features::derive;
///
/// let raw = RawRecord::new(2.0, 75.0, 7.0, 10, "yes").expect("valid record");
/// let derived = derive(&raw);
/// assert!((derived.study_intensity - 0.25).abs() < 1e-6);
/// ```
#[must_use]
pub fn derive(raw: &RawRecord) -> DerivedRecord {
    DerivedRecord {
        study_intensity: raw.hours_studied / (raw.sleep_hours + 1.0),
        raw: raw.clone(),
    }
}

/// Derives features for a whole dataset.
#[must_use]
pub fn derive_all(records: &[RawRecord]) -> Vec<DerivedRecord> {
    records.iter().map(derive).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hours: f32, sleep: f32) -> RawRecord {
        RawRecord::new(hours, 75.0, sleep, 10, "yes").expect("valid record")
    }

    #[test]
    fn test_derive_study_intensity() {
        let derived = derive(&record(2.0, 7.0));
        assert!((derived.study_intensity - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_derive_zero_sleep_boundary() {
        // sleep_hours = 0 divides by exactly 1
        let derived = derive(&record(3.5, 0.0));
        assert_eq!(derived.study_intensity, 3.5);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let raw = record(4.25, 6.5);
        let a = derive(&raw);
        let b = derive(&raw);
        assert_eq!(a, b);
        assert_eq!(a.study_intensity.to_bits(), b.study_intensity.to_bits());
    }

    #[test]
    fn test_numeric_row_order_matches_feature_names() {
        let derived = derive(&record(2.0, 7.0));
        let row = derived.numeric_row();
        assert_eq!(row.len(), NUMERIC_FEATURES.len());
        assert_eq!(row[0], 2.0); // Hours Studied
        assert_eq!(row[1], 75.0); // Previous Scores
        assert_eq!(row[2], 7.0); // Sleep Hours
        assert_eq!(row[3], 10.0); // Sample Question Papers Practiced
        assert!((row[4] - 0.25).abs() < 1e-6); // StudyIntensity
    }

    #[test]
    fn test_derive_all_preserves_order() {
        let records = vec![record(1.0, 1.0), record(2.0, 3.0)];
        let derived = derive_all(&records);
        assert_eq!(derived.len(), 2);
        assert_eq!(derived[0].study_intensity, 0.5);
        assert_eq!(derived[1].study_intensity, 0.5);
    }
}
