//! Eligibility filtering of raw rows.
//!
//! Rows are kept when they pass, in order:
//!
//! 1. screening-to-arrest gap present and within ±30 days
//! 2. an underlying recidivism case exists (`is_recid != -1`)
//! 3. the charge is not non-custodial (`O`)
//! 4. a risk category was assigned (`score_text != "N/A"`)
//! 5. the configured [`AgeFilter`]
//!
//! Evaluation stops at the first failing predicate, so a later field is never
//! parsed for a row that was already dropped.

use crate::data::schema::{Field, RawRow};
use crate::error::{BiasError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest accepted screening-to-arrest gap, in days, on either side.
pub const MAX_SCREENING_GAP_DAYS: i64 = 30;

/// `is_recid` value meaning no case could be matched.
pub const NO_CASE_SENTINEL: i64 = -1;

/// Charge degree code of an ordinary (non-custodial) traffic offense.
pub const NON_CUSTODIAL_CHARGE: &str = "O";

/// `score_text` value of unscored defendants.
pub const SCORE_NOT_APPLICABLE: &str = "N/A";

/// Demographic inclusion predicate applied after the fixed predicates.
///
/// # Examples
///
/// ```
/// use arrest_bias::data::{AgeFilter, RawRow};
///
/// let row = RawRow { age: "30".into(), age_category: "25 - 45".into(), ..RawRow::default() };
/// assert!(AgeFilter::range(25, 45).admits(&row).unwrap());
/// assert!(AgeFilter::category("25 - 45").admits(&row).unwrap());
/// assert!(!AgeFilter::category("Less than 25").admits(&row).unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgeFilter {
    /// Every age is admitted.
    #[default]
    Any,
    /// Exact match on the age category label.
    Category {
        /// Label to match, e.g. `"25 - 45"`
        value: String,
    },
    /// Inclusive numeric age range.
    Range {
        /// Lowest admitted age
        min: u32,
        /// Highest admitted age
        max: u32,
    },
}

impl AgeFilter {
    /// Exact age-category predicate.
    #[must_use]
    pub fn category(value: impl Into<String>) -> Self {
        Self::Category {
            value: value.into(),
        }
    }

    /// Inclusive age-range predicate.
    #[must_use]
    pub fn range(min: u32, max: u32) -> Self {
        Self::Range { min, max }
    }

    /// Checks the predicate's own parameters.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty category or an inverted range.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Any => Ok(()),
            Self::Category { value } if value.trim().is_empty() => Err(
                BiasError::invalid_config("age_filter.value", "\"\"", "a non-empty age category"),
            ),
            Self::Category { .. } => Ok(()),
            Self::Range { min, max } if min > max => Err(BiasError::invalid_config(
                "age_filter",
                format!("{min}..={max}"),
                "min <= max",
            )),
            Self::Range { .. } => Ok(()),
        }
    }

    /// Whether `row` passes this predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if a range predicate meets a non-integer age.
    pub fn admits(&self, row: &RawRow) -> Result<bool> {
        match self {
            Self::Any => Ok(true),
            Self::Category { value } => Ok(row.age_category == *value),
            Self::Range { min, max } => {
                let age = row.parse_int(Field::Age)?;
                Ok(i64::from(*min) <= age && age <= i64::from(*max))
            }
        }
    }
}

impl std::fmt::Display for AgeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any age"),
            Self::Category { value } => write!(f, "age category {value:?}"),
            Self::Range { min, max } => write!(f, "age {min}..={max}"),
        }
    }
}

/// Selects the analysis-eligible rows of an input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFilter {
    age: AgeFilter,
}

impl RecordFilter {
    /// Creates a filter with the fixed predicates and the given age predicate.
    #[must_use]
    pub fn new(age: AgeFilter) -> Self {
        Self { age }
    }

    /// The configured age predicate.
    #[must_use]
    pub fn age_filter(&self) -> &AgeFilter {
        &self.age
    }

    /// Whether a single row is eligible.
    ///
    /// # Errors
    ///
    /// Returns [`BiasError::InvalidField`] when a predicate that is reached
    /// finds a non-integer in an integer field.
    pub fn admits(&self, row: &RawRow) -> Result<bool> {
        if row.screening_arrest_gap.trim().is_empty() {
            return Ok(false);
        }
        let gap = row.parse_int(Field::ScreeningArrestGap)?;
        if !(-MAX_SCREENING_GAP_DAYS..=MAX_SCREENING_GAP_DAYS).contains(&gap) {
            return Ok(false);
        }

        if row.parse_int(Field::IsRecid)? == NO_CASE_SENTINEL {
            return Ok(false);
        }

        if row.charge_degree.trim() == NON_CUSTODIAL_CHARGE {
            return Ok(false);
        }

        if row.score_text.trim() == SCORE_NOT_APPLICABLE {
            return Ok(false);
        }

        self.age.admits(row)
    }

    /// Returns the eligible rows, preserving their relative order.
    ///
    /// # Errors
    ///
    /// Fails the whole batch on the first invalid field.
    pub fn apply(&self, rows: &[RawRow]) -> Result<Vec<RawRow>> {
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            if self.admits(row)? {
                kept.push(row.clone());
            }
        }

        debug!(
            input = rows.len(),
            kept = kept.len(),
            age_filter = %self.age,
            "filtered rows"
        );
        Ok(kept)
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
