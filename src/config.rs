//! Simulation configuration.
//!
//! A [`SimulationConfig`] is built in code with the `with_*` methods, loaded
//! from a JSON file, or assembled by the CLI (file first, flags on top). It is
//! validated before the input file is opened.

use crate::data::AgeFilter;
use crate::error::{BiasError, Result};
use crate::risk::HIGH_RISK_THRESHOLD;
use crate::sampling::BiasSampler;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default comparison group.
pub const DEFAULT_REFERENCE_GROUP: &str = "Caucasian";

/// Default group whose arrest records are perturbed.
pub const DEFAULT_STUDY_GROUP: &str = "African-American";

/// Parameters of one simulation run.
///
/// # Examples
///
/// ```
/// use arrest_bias::config::SimulationConfig;
/// use arrest_bias::data::AgeFilter;
///
/// let config = SimulationConfig::new("compas-scores-two-years.csv")
///     .with_bias_fraction(0.3)
///     .with_age_filter(AgeFilter::category("25 - 45"))
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.study_group, "African-American");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// CSV input path
    pub input: PathBuf,
    /// Fraction of study-group events removed, in `[0, 1)`
    pub bias_fraction: f64,
    /// Demographic inclusion predicate
    pub age_filter: AgeFilter,
    /// Group evaluated on its recorded outcomes
    pub reference_group: String,
    /// Group whose events are sampled
    pub study_group: String,
    /// RNG seed; entropy when absent
    pub seed: Option<u64>,
    /// Prediction at or above which a defendant is high risk
    pub threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            bias_fraction: 0.0,
            age_filter: AgeFilter::Any,
            reference_group: DEFAULT_REFERENCE_GROUP.to_string(),
            study_group: DEFAULT_STUDY_GROUP.to_string(),
            seed: None,
            threshold: HIGH_RISK_THRESHOLD,
        }
    }
}

impl SimulationConfig {
    /// Default configuration reading `input`.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Loads a configuration serialized as JSON.
    ///
    /// Missing keys take their defaults. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set input path
    #[must_use]
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Set bias-reduction fraction
    #[must_use]
    pub fn with_bias_fraction(mut self, fraction: f64) -> Self {
        self.bias_fraction = fraction;
        self
    }

    /// Set age predicate
    #[must_use]
    pub fn with_age_filter(mut self, age_filter: AgeFilter) -> Self {
        self.age_filter = age_filter;
        self
    }

    /// Set reference group
    #[must_use]
    pub fn with_reference_group(mut self, group: impl Into<String>) -> Self {
        self.reference_group = group.into();
        self
    }

    /// Set study group
    #[must_use]
    pub fn with_study_group(mut self, group: impl Into<String>) -> Self {
        self.study_group = group.into();
        self
    }

    /// Set RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set high-risk threshold
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Checks every parameter without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`BiasError::InvalidConfig`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(BiasError::invalid_config("input", "\"\"", "a CSV file path"));
        }

        BiasSampler::new(self.bias_fraction)?;
        self.age_filter.validate()?;

        if self.reference_group.trim().is_empty() {
            return Err(BiasError::invalid_config(
                "reference_group",
                "\"\"",
                "a non-empty group name",
            ));
        }
        if self.study_group.trim().is_empty() {
            return Err(BiasError::invalid_config(
                "study_group",
                "\"\"",
                "a non-empty group name",
            ));
        }
        if self.study_group == self.reference_group {
            return Err(BiasError::invalid_config(
                "study_group",
                &self.study_group,
                "a group different from reference_group",
            ));
        }

        if !self.threshold.is_finite() {
            return Err(BiasError::invalid_config(
                "threshold",
                self.threshold,
                "a finite number",
            ));
        }

        Ok(())
    }
}
