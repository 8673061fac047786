//! Model interpretability through feature attribution.
//!
//! [`ShapExplainer`] computes Shapley-style attribution values for a single
//! prediction by Monte Carlo sampling over feature permutations against a
//! fixed background reference sample. Walking each permutation from a
//! background row to the explained sample telescopes exactly, so the
//! attributions satisfy local accuracy by construction:
//!
//! ```text
//! prediction = expected_value + sum(attributions)
//! ```
//!
//! The model is opaque to the explainer: all it sees is a prediction
//! function over encoded feature vectors. This keeps the attribution logic
//! independent of the concrete regression model.
//!
//! # References
//!
//! - Lundberg, S. M., & Lee, S. I. (2017). A Unified Approach to
//!   Interpreting Model Predictions. `NeurIPS`.
//! - Štrumbelj, E., & Kononenko, I. (2014). Explaining prediction models
//!   and individual predictions with feature contributions. KAIS.

use crate::error::{RendimientoError, Result};
use crate::primitives::Vector;

/// Shapley-style attribution explainer over a fixed background sample.
///
/// # Properties
///
/// 1. **Local accuracy**: `prediction = expected_value + sum(values)`,
///    exact up to float summation order.
/// 2. **Missingness**: a feature equal to its background value in every
///    draw receives zero attribution.
/// 3. **Symmetry in expectation**: attributions are averaged over sampled
///    permutations, so no feature is privileged by position.
#[derive(Debug, Clone)]
pub struct ShapExplainer {
    /// Background rows in encoded feature space
    background: Vec<Vector<f32>>,
    /// Mean prediction over the background (the attribution baseline)
    expected_value: f32,
    /// Number of encoded features
    n_features: usize,
    /// Permutations sampled per background row
    n_permutations: usize,
    /// Seed for the permutation draws
    random_state: Option<u64>,
}

impl ShapExplainer {
    /// Binds a prediction function to a background reference sample.
    ///
    /// The expected value (attribution baseline) is the mean prediction
    /// over the background rows, computed once here.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty background, a dimension
    /// mismatch error for ragged background rows, and a computation error
    /// if the prediction function fails on any background row.
    pub fn new<F>(background: Vec<Vector<f32>>, predict_fn: F) -> Result<Self>
    where
        F: Fn(&Vector<f32>) -> Result<f32>,
    {
        let Some(first) = background.first() else {
            return Err(RendimientoError::config("background sample is empty"));
        };
        let n_features = first.len();

        let mut total = 0.0;
        for row in &background {
            if row.len() != n_features {
                return Err(RendimientoError::dimension_mismatch(
                    "background row length",
                    n_features,
                    row.len(),
                ));
            }
            total += predict(&predict_fn, row, "background sample")?;
        }
        let expected_value = total / background.len() as f32;

        Ok(Self {
            background,
            expected_value,
            n_features,
            n_permutations: 16,
            random_state: None,
        })
    }

    /// Sets the number of permutations sampled per background row.
    ///
    /// More permutations tighten the Shapley estimate at linear cost.
    #[must_use]
    pub fn with_n_permutations(mut self, n_permutations: usize) -> Self {
        self.n_permutations = n_permutations.max(1);
        self
    }

    /// Sets the random state for reproducible permutation draws.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Computes per-feature attribution values for one encoded sample.
    ///
    /// For each background row and sampled permutation, features are
    /// switched one at a time from the background value to the sample
    /// value, and each feature is credited with the prediction change its
    /// switch caused. Averaging over all walks yields the attributions.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch error if the sample length differs
    /// from the background rows, and a computation error if the prediction
    /// function fails at any point of any walk.
    pub fn explain<F>(&self, sample: &Vector<f32>, predict_fn: F) -> Result<Vector<f32>>
    where
        F: Fn(&Vector<f32>) -> Result<f32>,
    {
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        if sample.len() != self.n_features {
            return Err(RendimientoError::dimension_mismatch(
                "sample features",
                self.n_features,
                sample.len(),
            ));
        }

        let mut rng = match self.random_state {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };

        let n = self.n_features;
        let mut attributions = vec![0.0f32; n];
        let mut order: Vec<usize> = (0..n).collect();

        for bg_row in &self.background {
            for _ in 0..self.n_permutations {
                order.shuffle(&mut rng);

                let mut current = bg_row.clone();
                let mut prev = predict(&predict_fn, &current, "background sample")?;

                for &feature_idx in &order {
                    current[feature_idx] = sample[feature_idx];
                    let next = predict(&predict_fn, &current, "explained sample")?;
                    attributions[feature_idx] += next - prev;
                    prev = next;
                }
            }
        }

        let n_walks = (self.background.len() * self.n_permutations) as f32;
        for value in &mut attributions {
            *value /= n_walks;
        }

        Ok(Vector::from_vec(attributions))
    }

    /// The attribution baseline: mean prediction over the background.
    #[must_use]
    pub fn expected_value(&self) -> f32 {
        self.expected_value
    }

    /// The background reference rows.
    #[must_use]
    pub fn background(&self) -> &[Vector<f32>] {
        &self.background
    }

    /// Number of encoded features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn predict<F>(predict_fn: &F, row: &Vector<f32>, context: &str) -> Result<f32>
where
    F: Fn(&Vector<f32>) -> Result<f32>,
{
    predict_fn(row).map_err(|e| {
        RendimientoError::computation(format!("prediction function failed on {context}: {e}"))
    })
}
