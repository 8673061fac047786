//! Train/test splitting and background sampling.

use crate::error::{RendimientoError, Result};
use crate::primitives::Vector;

/// Validates inputs for `train_test_split`.
fn validate_split_inputs(n_samples: usize, n_targets: usize, test_size: f32) -> Result<usize> {
    if test_size <= 0.0 || test_size >= 1.0 {
        return Err(RendimientoError::config(format!(
            "test_size must be between 0 and 1, got {test_size}"
        )));
    }

    if n_samples != n_targets {
        return Err(RendimientoError::dimension_mismatch(
            "samples",
            n_samples,
            n_targets,
        ));
    }

    let n_test = (n_samples as f32 * test_size).round() as usize;
    let n_train = n_samples - n_test;

    if n_test == 0 || n_train == 0 {
        return Err(RendimientoError::config(format!(
            "split would leave an empty partition (n_train={n_train}, n_test={n_test})"
        )));
    }

    Ok(n_train)
}

/// Shuffles indices with an optional random seed.
fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut indices: Vec<usize> = (0..n_samples).collect();

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }

    indices
}

/// Splits records and targets into shuffled train/test partitions.
///
/// The split is reproducible under a fixed `random_state`.
///
/// # Errors
///
/// Returns a configuration error for an out-of-range `test_size` or a split
/// that would leave either partition empty, and a dimension mismatch error
/// when records and targets disagree on sample count.
///
/// # Examples
///
/// ```
/// use rendimiento::model_selection::train_test_split;
/// use rendimiento::primitives::Vector;
///
/// let records: Vec<u32> = (0..10).collect();
/// let y = Vector::from_vec((0..10).map(|i| i as f32).collect());
///
/// let (train, test, y_train, y_test) =
///     train_test_split(&records, &y, 0.2, Some(42)).expect("valid split");
/// assert_eq!(train.len(), 8);
/// assert_eq!(test.len(), 2);
/// assert_eq!(y_train.len(), 8);
/// assert_eq!(y_test.len(), 2);
/// ```
#[allow(clippy::type_complexity)]
pub fn train_test_split<T: Clone>(
    records: &[T],
    y: &Vector<f32>,
    test_size: f32,
    random_state: Option<u64>,
) -> Result<(Vec<T>, Vec<T>, Vector<f32>, Vector<f32>)> {
    let n_train = validate_split_inputs(records.len(), y.len(), test_size)?;

    let indices = shuffle_indices(records.len(), random_state);
    let (train_indices, test_indices) = indices.split_at(n_train);

    let gather = |idx: &[usize]| -> (Vec<T>, Vector<f32>) {
        let recs = idx.iter().map(|&i| records[i].clone()).collect();
        let targets = Vector::from_vec(idx.iter().map(|&i| y[i]).collect());
        (recs, targets)
    };

    let (train, y_train) = gather(train_indices);
    let (test, y_test) = gather(test_indices);

    Ok((train, test, y_train, y_test))
}

/// Draws `size` distinct row indices without replacement.
///
/// Used to pick the background reference sample for attribution. When the
/// population has fewer than `size` rows, all rows are returned.
#[must_use]
pub fn sample_indices(n_samples: usize, size: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut indices = shuffle_indices(n_samples, random_state);
    indices.truncate(size.min(n_samples));
    indices
}
