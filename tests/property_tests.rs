//! Property-based tests using proptest.
//!
//! These tests verify invariants of feature derivation and preprocessing.

use proptest::prelude::*;
use rendimiento::prelude::*;

// Strategy for generating valid raw records
fn record_strategy() -> impl Strategy<Value = RawRecord> {
    (
        0.0f32..24.0,
        0.0f32..=100.0,
        0.0f32..24.0,
        0u32..100,
        prop_oneof![Just("yes".to_string()), Just("no".to_string())],
    )
        .prop_map(|(hours, previous, sleep, papers, extracurricular)| {
            RawRecord::new(hours, previous, sleep, papers, &extracurricular)
                .expect("generated record is within valid ranges")
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn derive_is_deterministic(record in record_strategy()) {
        let a = derive(&record);
        let b = derive(&record);
        prop_assert_eq!(a.study_intensity.to_bits(), b.study_intensity.to_bits());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn derive_matches_formula(record in record_strategy()) {
        let derived = derive(&record);
        let expected = record.hours_studied / (record.sleep_hours + 1.0);
        prop_assert_eq!(derived.study_intensity, expected);
    }

    #[test]
    fn derive_is_finite_and_non_negative(record in record_strategy()) {
        // sleep_hours >= 0 keeps the denominator >= 1
        let derived = derive(&record);
        prop_assert!(derived.study_intensity.is_finite());
        prop_assert!(derived.study_intensity >= 0.0);
    }

    #[test]
    fn derive_all_preserves_length(records in proptest::collection::vec(record_strategy(), 0..30)) {
        prop_assert_eq!(derive_all(&records).len(), records.len());
    }

    #[test]
    fn preprocessor_output_has_fixed_width(
        records in proptest::collection::vec(record_strategy(), 2..30)
    ) {
        let derived = derive_all(&records);
        let mut preprocessor = TablePreprocessor::new();
        let encoded = preprocessor.fit_transform(&derived).expect("fit should succeed");

        let n_categories = preprocessor.n_categories().expect("fitted");
        prop_assert_eq!(encoded.shape(), (records.len(), 5 + n_categories));
    }

    #[test]
    fn preprocessor_standardizes_non_degenerate_columns(
        records in proptest::collection::vec(record_strategy(), 2..30)
    ) {
        let derived = derive_all(&records);
        let mut preprocessor = TablePreprocessor::new();
        let encoded = preprocessor.fit_transform(&derived).expect("fit should succeed");

        for j in 0..5 {
            let raw = Vector::from_vec(derived.iter().map(|r| r.numeric_row()[j]).collect());
            if raw.variance() > 1e-3 {
                let col = encoded.column(j);
                prop_assert!(col.mean().abs() < 1e-3, "column {} mean {}", j, col.mean());
                let std = col.variance().sqrt();
                prop_assert!((std - 1.0).abs() < 1e-2, "column {} std {}", j, std);
            }
        }
    }

    #[test]
    fn scaler_standardizes_non_degenerate_columns(
        data in proptest::collection::vec(-100.0f32..100.0, 20)
    ) {
        let x = Matrix::from_vec(20, 1, data.clone()).expect("valid dimensions");
        let raw = Vector::from_vec(data);

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit should succeed");

        let col = scaled.column(0);
        if raw.variance() > 1e-3 {
            prop_assert!(col.mean().abs() < 1e-3);
            let std = col.variance().sqrt();
            prop_assert!((std - 1.0).abs() < 1e-2, "std was {}", std);
        }
    }

    #[test]
    fn encoder_never_fails_on_unseen_values(
        vocabulary in proptest::collection::vec("[a-z]{1,8}", 1..6),
        probe in "[a-z]{1,8}"
    ) {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&vocabulary).expect("fit should succeed");

        let encoded = encoder.transform(&[probe.clone()]).expect("transform never fails");
        let active: f32 = encoded.row(0).sum();
        // Exactly one active column for known values, none for unseen ones
        if vocabulary.contains(&probe) {
            prop_assert_eq!(active, 1.0);
        } else {
            prop_assert_eq!(active, 0.0);
        }
    }

    #[test]
    fn one_record_transform_matches_batch_row(
        records in proptest::collection::vec(record_strategy(), 2..20)
    ) {
        let derived = derive_all(&records);
        let mut preprocessor = TablePreprocessor::new();
        let batch = preprocessor.fit_transform(&derived).expect("fit should succeed");

        for (i, record) in derived.iter().enumerate() {
            let single = preprocessor.transform_one(record).expect("transform should succeed");
            let batch_row = batch.row(i);
            prop_assert_eq!(single.as_slice(), batch_row.as_slice());
        }
    }
}
