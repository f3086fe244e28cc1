//! Evaluation metrics.
//!
//! Includes regression metrics (R², MSE) used as fit diagnostics and the
//! binary confusion matrix used to score risk classifications.

pub mod classification;

pub use classification::ConfusionMatrix;

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// where `SS_res` is the residual sum of squares and `SS_tot` is the total
/// sum of squares. Returns 0.0 when the targets have no variance.
///
/// # Examples
///
/// ```
/// use arrest_bias::metrics::r_squared;
///
/// let y_true = [3.0, -0.5, 2.0, 7.0];
/// let y_pred = [2.5, 0.0, 2.0, 8.0];
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!(r2 > 0.9);
/// ```
///
/// # Panics
///
/// Panics if slices have different lengths.
#[must_use]
pub fn r_squared(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");

    if y_true.is_empty() {
        return 0.0;
    }

    let y_mean = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return 0.0;
    }

    1.0 - (ss_res / ss_tot)
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true` - `y_pred)²`
///
/// # Examples
///
/// ```
/// use arrest_bias::metrics::mse;
///
/// let y_true = [3.0, -0.5, 2.0, 7.0];
/// let y_pred = [2.5, 0.0, 2.0, 8.0];
/// assert!((mse(&y_pred, &y_true) - 0.375).abs() < 1e-12);
/// ```
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let sum_sq_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    sum_sq_error / y_true.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_squared_perfect() {
        let y = [1.0, 2.0, 3.0];
        assert!((r_squared(&y, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r_squared_mean_prediction_is_zero() {
        let y_true = [1.0, 2.0, 3.0];
        let y_pred = [2.0, 2.0, 2.0];
        assert!(r_squared(&y_pred, &y_true).abs() < 1e-12);
    }

    #[test]
    fn test_r_squared_constant_target() {
        let y_true = [4.0, 4.0, 4.0];
        let y_pred = [3.0, 4.0, 5.0];
        assert_eq!(r_squared(&y_pred, &y_true), 0.0);
    }

    #[test]
    fn test_mse() {
        let y_true = [1.0, 2.0, 3.0];
        let y_pred = [1.0, 2.0, 5.0];
        assert!((mse(&y_pred, &y_true) - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_mse_length_mismatch_panics() {
        let _ = mse(&[1.0], &[1.0, 2.0]);
    }
}
