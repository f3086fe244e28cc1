//! Error types for bias simulation runs.
//!
//! Every variant here is fatal for a run. Degenerate statistics (a rate with a
//! zero denominator) are not errors; they surface as `None` from the
//! [`ConfusionMatrix`](crate::metrics::ConfusionMatrix) rate accessors.

use thiserror::Error;

/// Main error type for arrest-bias operations.
///
/// # Examples
///
/// ```
/// use arrest_bias::error::BiasError;
///
/// let err = BiasError::invalid_field(12, "priors_count", "three");
/// assert!(err.to_string().contains("line 12"));
/// assert!(err.to_string().contains("priors_count"));
/// ```
#[derive(Error, Debug)]
pub enum BiasError {
    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader could not decode a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row does not have the number of fields the column layout expects.
    #[error("Malformed row at line {line}: expected {expected} fields, got {actual}")]
    MalformedRow {
        /// 1-based source line
        line: usize,
        /// Field count required by the layout
        expected: usize,
        /// Field count found
        actual: usize,
    },

    /// A field expected to hold a number (or flag) holds something else.
    #[error("Invalid value at line {line}: field `{field}` = {value:?}")]
    InvalidField {
        /// 1-based source line
        line: usize,
        /// Field name
        field: String,
        /// Offending raw value
        value: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {param} = {value}, expected {constraint}")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Paired inputs have different lengths.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length description
        expected: String,
        /// Actual length found
        actual: String,
    },

    /// An operation received no data to work with.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Least squares has no unique solution (all inputs identical).
    #[error("Singular fit: {reason}")]
    SingularFit {
        /// Why the system is singular
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BiasError {
    /// Create an invalid field error
    #[must_use]
    pub fn invalid_field(line: usize, field: &str, value: &str) -> Self {
        Self::InvalidField {
            line,
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidConfig {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig { .. } | Self::Serialization(_) => 2,
            Self::Io(_) => 3,
            Self::Csv(_) | Self::MalformedRow { .. } | Self::InvalidField { .. } => 4,
            Self::EmptyInput { .. } | Self::SingularFit { .. } | Self::DimensionMismatch { .. } => 5,
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, BiasError>;
