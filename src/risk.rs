//! The risk model: prior-offense count to risk score.
//!
//! Fitted once on the whole cohort (every group) and read-only afterwards.

use crate::data::Cohort;
use crate::error::{BiasError, Result};
use crate::linear_model::{LinearFit, LinearRegression};
use crate::metrics::{mse, r_squared};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default prediction at or above which a defendant is classified high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 5.0;

/// Risk classification of one prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Prediction below the threshold
    Low,
    /// Prediction at or above the threshold
    High,
}

impl RiskLevel {
    /// Classifies a prediction against `threshold`.
    #[must_use]
    pub fn classify(prediction: f64, threshold: f64) -> Self {
        if prediction >= threshold {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Whether this level is the positive (high-risk) class.
    #[must_use]
    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

/// Fitted `(slope, intercept)` mapping prior count to risk score, plus fit
/// diagnostics.
///
/// # Examples
///
/// ```
/// use arrest_bias::risk::{RiskLevel, RiskModel, HIGH_RISK_THRESHOLD};
///
/// let model = RiskModel::from_parameters(0.5, 2.0);
/// assert_eq!(model.predict(2), 3.0);
/// assert_eq!(model.predict(8), 6.0);
/// assert_eq!(model.classify(8, HIGH_RISK_THRESHOLD), RiskLevel::High);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskModel {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    rmse: f64,
    n_samples: usize,
}

impl RiskModel {
    /// Fits `decile_score ~ priors_count` by OLS over every cohort row.
    ///
    /// # Errors
    ///
    /// Returns an error if the cohort is empty or every row has the same
    /// prior count.
    pub fn fit(cohort: &Cohort) -> Result<Self> {
        if cohort.is_empty() {
            return Err(BiasError::empty_input("cohort for risk model fit"));
        }

        let (x, y): (Vec<f64>, Vec<f64>) = cohort
            .records()
            .iter()
            .map(|r| (f64::from(r.priors_count), f64::from(r.decile_score)))
            .unzip();

        let fit = LinearRegression::new().fit(&x, &y)?;
        let predictions = fit.predict_batch(&x);

        let model = Self {
            slope: fit.slope(),
            intercept: fit.intercept(),
            r_squared: r_squared(&predictions, &y),
            rmse: mse(&predictions, &y).sqrt(),
            n_samples: x.len(),
        };

        info!(
            slope = model.slope,
            intercept = model.intercept,
            r_squared = model.r_squared,
            n = model.n_samples,
            "fitted risk model"
        );
        Ok(model)
    }

    /// A model with known parameters and no training diagnostics.
    #[must_use]
    pub fn from_parameters(slope: f64, intercept: f64) -> Self {
        Self {
            slope,
            intercept,
            r_squared: f64::NAN,
            rmse: f64::NAN,
            n_samples: 0,
        }
    }

    /// Predicted risk score for `prior_count`; extrapolates linearly.
    #[must_use]
    pub fn predict(&self, prior_count: u32) -> f64 {
        self.line().predict(f64::from(prior_count))
    }

    /// Risk level of `prior_count` under `threshold`.
    #[must_use]
    pub fn classify(&self, prior_count: u32, threshold: f64) -> RiskLevel {
        RiskLevel::classify(self.predict(prior_count), threshold)
    }

    /// Fitted slope.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted intercept.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// R² against the training data (NaN when not fitted from data).
    #[must_use]
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Root mean squared training error (NaN when not fitted from data).
    #[must_use]
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Number of training rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    fn line(&self) -> LinearFit {
        LinearFit::new(self.slope, self.intercept)
    }
}
