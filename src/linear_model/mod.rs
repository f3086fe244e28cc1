//! Linear models for regression.
//!
//! Includes single-feature Ordinary Least Squares (OLS) linear regression.

use crate::error::{BiasError, Result};
use crate::metrics::r_squared;

/// Ordinary Least Squares (OLS) linear regression on one feature.
///
/// Fits a line by minimizing the residual sum of squares between observed
/// and predicted targets:
///
/// ```text
/// y = β₀ + β₁ x + ε
/// ```
///
/// # Solver
///
/// Closed-form normal equations for one feature:
/// `β₁ = Sxy / Sxx`, `β₀ = ȳ - β₁ x̄`.
///
/// # Examples
///
/// ```
/// use arrest_bias::linear_model::LinearRegression;
///
/// // y = 2x + 1
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [3.0, 5.0, 7.0, 9.0];
///
/// let fit = LinearRegression::new().fit(&x, &y).unwrap();
/// assert!((fit.slope() - 2.0).abs() < 1e-9);
/// assert!((fit.intercept() - 1.0).abs() < 1e-9);
/// assert!(fit.score(&x, &y) > 0.99);
/// ```
///
/// # Performance
///
/// - Time complexity: O(n)
/// - Space complexity: O(1)
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

impl LinearRegression {
    /// Creates a new `LinearRegression`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fits the line using the normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input lengths don't match
    /// - There are zero samples
    /// - The feature has no spread, so the slope is not identifiable
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Result<LinearFit> {
        if x.len() != y.len() {
            return Err(BiasError::dimension_mismatch("targets", x.len(), y.len()));
        }

        if x.is_empty() {
            return Err(BiasError::empty_input("regression training data"));
        }

        let n = x.len() as f64;

        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (xi, yi) in x.iter().zip(y) {
            let dx = xi - x_mean;
            sxx += dx * dx;
            sxy += dx * (yi - y_mean);
        }

        if sxx == 0.0 {
            return Err(BiasError::SingularFit {
                reason: format!("all {} feature values equal {x_mean}", x.len()),
            });
        }

        let slope = sxy / sxx;
        Ok(LinearFit::new(slope, y_mean - slope * x_mean))
    }
}

/// Parameters of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
}

impl LinearFit {
    /// Creates a line from known parameters.
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Returns the slope.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predicts the target for one input.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Predicts targets for many inputs.
    #[must_use]
    pub fn predict_batch(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&v| self.predict(v)).collect()
    }

    /// Computes the R² score.
    #[must_use]
    pub fn score(&self, x: &[f64], y: &[f64]) -> f64 {
        r_squared(&self.predict_batch(x), y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_regression() {
        // y = 2x + 1
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];

        let fit = LinearRegression::new().fit(&x, &y).expect("valid data");

        assert!((fit.slope() - 2.0).abs() < 1e-9);
        assert!((fit.intercept() - 1.0).abs() < 1e-9);

        let predictions = fit.predict_batch(&x);
        for (p, t) in predictions.iter().zip(&y) {
            assert!((p - t).abs() < 1e-9);
        }

        assert!((fit.score(&x, &y) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_noisy_regression() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.1, 2.9, 5.2, 6.8, 9.1, 11.0];

        let fit = LinearRegression::new().fit(&x, &y).expect("valid data");

        assert!((fit.slope() - 2.0).abs() < 0.1);
        assert!((fit.intercept() - 1.0).abs() < 0.2);
        let r2 = fit.score(&x, &y);
        assert!(r2 > 0.99 && r2 < 1.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = LinearRegression::new().fit(&[1.0, 2.0], &[1.0]);
        assert!(matches!(result, Err(BiasError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_empty_data() {
        let result = LinearRegression::new().fit(&[], &[]);
        assert!(matches!(result, Err(BiasError::EmptyInput { .. })));
    }

    #[test]
    fn test_constant_feature_is_singular() {
        let result = LinearRegression::new().fit(&[2.0, 2.0, 2.0], &[1.0, 5.0, 9.0]);
        assert!(matches!(result, Err(BiasError::SingularFit { .. })));
    }

    #[test]
    fn test_extrapolation() {
        let fit = LinearFit::new(0.5, 2.0);
        assert!((fit.predict(1000.0) - 502.0).abs() < 1e-9);
        assert!((fit.predict(-4.0) - 0.0).abs() < 1e-9);
    }
}
