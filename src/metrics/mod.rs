//! Evaluation metrics for the trained regressor.

use crate::error::{RendimientoError, Result};
use crate::primitives::Vector;

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true - y_pred)²`
///
/// # Errors
///
/// Returns an error if the vectors differ in length or are empty.
pub fn mse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> Result<f32> {
    check_lengths(y_pred, y_true)?;

    let n = y_true.len() as f32;
    let sum_sq_error: f32 = y_true
        .as_slice()
        .iter()
        .zip(y_pred.as_slice().iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok(sum_sq_error / n)
}

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`). A constant target yields 0.0.
///
/// # Errors
///
/// Returns an error if the vectors differ in length or are empty.
pub fn r_squared(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> Result<f32> {
    check_lengths(y_pred, y_true)?;

    let y_mean = y_true.mean();

    let ss_res: f32 = y_true
        .as_slice()
        .iter()
        .zip(y_pred.as_slice().iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    let ss_tot: f32 = y_true.as_slice().iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(0.0);
    }

    Ok(1.0 - (ss_res / ss_tot))
}

fn check_lengths(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> Result<()> {
    if y_pred.len() != y_true.len() {
        return Err(RendimientoError::dimension_mismatch(
            "predictions",
            y_true.len(),
            y_pred.len(),
        ));
    }
    if y_true.is_empty() {
        return Err(RendimientoError::config("metrics need at least one value"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_known_value() {
        let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
        let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
        let error = mse(&y_pred, &y_true).expect("valid inputs");
        assert!((error - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_mse_perfect_predictions() {
        let y = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(mse(&y, &y).expect("valid inputs"), 0.0);
    }

    #[test]
    fn test_mse_length_mismatch() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0]);
        assert!(mse(&a, &b).is_err());
    }

    #[test]
    fn test_mse_empty() {
        let empty: Vector<f32> = Vector::from_vec(vec![]);
        assert!(mse(&empty, &empty).is_err());
    }

    #[test]
    fn test_r_squared_good_fit() {
        let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
        let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
        let r2 = r_squared(&y_pred, &y_true).expect("valid inputs");
        assert!(r2 > 0.9);
    }

    #[test]
    fn test_r_squared_constant_target() {
        let y_true = Vector::from_slice(&[4.0, 4.0, 4.0]);
        let y_pred = Vector::from_slice(&[3.0, 4.0, 5.0]);
        assert_eq!(r_squared(&y_pred, &y_true).expect("valid inputs"), 0.0);
    }
}
