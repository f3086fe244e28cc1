//! Typed defendant records and the analysis cohort.

use crate::data::schema::{Field, RawRow};
use crate::error::{BiasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Charge degree of the screening offense.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeDegree {
    /// Felony (`F`)
    Felony,
    /// Misdemeanor (`M`)
    Misdemeanor,
    /// Any other code, kept verbatim
    Other(String),
}

impl ChargeDegree {
    /// Parses a charge degree code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "F" => Self::Felony,
            "M" => Self::Misdemeanor,
            other => Self::Other(other.to_string()),
        }
    }

    /// The code as it appears in the input.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Felony => "F",
            Self::Misdemeanor => "M",
            Self::Other(code) => code,
        }
    }
}

/// One eligible defendant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefendantRecord {
    /// Unique identifier
    pub id: String,
    /// Race, used as the demographic group
    pub race: String,
    /// Sex
    pub sex: String,
    /// Age in years
    pub age: u32,
    /// Age category label
    pub age_category: String,
    /// Number of prior charges
    pub priors_count: u32,
    /// Ground truth: recidivated within two years
    pub two_year_recid: bool,
    /// Risk decile assigned by the original scoring system
    pub decile_score: i32,
    /// Days between screening and arrest
    pub screening_arrest_gap: i32,
    /// Charge degree of the screening offense
    pub charge_degree: ChargeDegree,
}

impl DefendantRecord {
    /// Creates a record with the fields the simulation reads; the rest take
    /// neutral values.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        race: impl Into<String>,
        priors_count: u32,
        decile_score: i32,
        two_year_recid: bool,
    ) -> Self {
        Self {
            id: id.into(),
            race: race.into(),
            sex: String::new(),
            age: 0,
            age_category: String::new(),
            priors_count,
            two_year_recid,
            decile_score,
            screening_arrest_gap: 0,
            charge_degree: ChargeDegree::Felony,
        }
    }

    /// Converts a filtered row.
    ///
    /// # Errors
    ///
    /// Returns [`BiasError::InvalidField`] for a non-integer or out-of-range
    /// numeric field, a negative prior count, or a recidivism flag other than
    /// `0`/`1`.
    pub fn from_row(row: &RawRow) -> Result<Self> {
        Ok(Self {
            id: row.id.trim().to_string(),
            race: row.race.trim().to_string(),
            sex: row.sex.trim().to_string(),
            age: parse_bounded(row, Field::Age)?,
            age_category: row.age_category.trim().to_string(),
            priors_count: parse_bounded(row, Field::PriorsCount)?,
            two_year_recid: parse_flag(row, Field::TwoYearRecid)?,
            decile_score: parse_bounded(row, Field::DecileScore)?,
            screening_arrest_gap: parse_bounded(row, Field::ScreeningArrestGap)?,
            charge_degree: ChargeDegree::from_code(&row.charge_degree),
        })
    }
}

fn parse_bounded<T: TryFrom<i64>>(row: &RawRow, field: Field) -> Result<T> {
    let value = row.parse_int(field)?;
    T::try_from(value).map_err(|_| BiasError::invalid_field(row.line, field.name(), row.get(field)))
}

fn parse_flag(row: &RawRow, field: Field) -> Result<bool> {
    match row.parse_int(field)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(BiasError::invalid_field(row.line, field.name(), row.get(field))),
    }
}

/// The filtered, analysis-eligible defendants, in input order.
///
/// # Examples
///
/// ```
/// use arrest_bias::data::{Cohort, DefendantRecord};
///
/// let cohort = Cohort::new(vec![
///     DefendantRecord::new("1", "Caucasian", 0, 2, false),
///     DefendantRecord::new("2", "African-American", 4, 7, true),
/// ]);
/// assert_eq!(cohort.len(), 2);
/// assert_eq!(cohort.group("Caucasian").count(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cohort {
    records: Vec<DefendantRecord>,
}

impl Cohort {
    /// Wraps already-typed records.
    #[must_use]
    pub fn new(records: Vec<DefendantRecord>) -> Self {
        Self { records }
    }

    /// Converts filtered rows into a cohort.
    ///
    /// # Errors
    ///
    /// Fails on the first row that cannot be converted, or on a row whose id
    /// was already seen.
    pub fn from_rows(rows: &[RawRow]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let record = DefendantRecord::from_row(row)?;
            if !seen.insert(record.id.clone()) {
                return Err(BiasError::invalid_field(row.line, Field::Id.name(), &row.id));
            }
            records.push(record);
        }
        Ok(Self { records })
    }

    /// Number of defendants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cohort is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in input order.
    #[must_use]
    pub fn records(&self) -> &[DefendantRecord] {
        &self.records
    }

    /// Records whose race equals `group`.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a DefendantRecord> + 'a {
        self.records.iter().filter(move |r| r.race == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawRow {
        RawRow {
            line: 11,
            id: "1001".to_string(),
            sex: "Female".to_string(),
            age: "27".to_string(),
            age_category: "25 - 45".to_string(),
            race: "African-American".to_string(),
            decile_score: "8".to_string(),
            priors_count: "5".to_string(),
            screening_arrest_gap: "-2".to_string(),
            charge_degree: "M".to_string(),
            is_recid: "1".to_string(),
            score_text: "High".to_string(),
            two_year_recid: "1".to_string(),
        }
    }

    #[test]
    fn test_from_row() {
        let record = DefendantRecord::from_row(&row()).expect("valid row");
        assert_eq!(record.id, "1001");
        assert_eq!(record.race, "African-American");
        assert_eq!(record.age, 27);
        assert_eq!(record.priors_count, 5);
        assert_eq!(record.decile_score, 8);
        assert_eq!(record.screening_arrest_gap, -2);
        assert!(record.two_year_recid);
        assert_eq!(record.charge_degree, ChargeDegree::Misdemeanor);
    }

    #[test]
    fn test_negative_priors_is_fatal() {
        let bad = RawRow {
            priors_count: "-3".to_string(),
            ..row()
        };
        let err = DefendantRecord::from_row(&bad).expect_err("negative priors");
        assert!(err.to_string().contains("priors_count"));
        assert!(err.to_string().contains("line 11"));
    }

    #[test]
    fn test_non_integer_priors_is_fatal() {
        let bad = RawRow {
            priors_count: "2.5".to_string(),
            ..row()
        };
        assert!(matches!(
            DefendantRecord::from_row(&bad),
            Err(BiasError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_flag_must_be_binary() {
        let bad = RawRow {
            two_year_recid: "2".to_string(),
            ..row()
        };
        assert!(DefendantRecord::from_row(&bad).is_err());
    }

    #[test]
    fn test_charge_degree_codes() {
        assert_eq!(ChargeDegree::from_code("F"), ChargeDegree::Felony);
        assert_eq!(ChargeDegree::from_code(" M "), ChargeDegree::Misdemeanor);
        let other = ChargeDegree::from_code("X");
        assert_eq!(other.code(), "X");
    }

    #[test]
    fn test_cohort_from_rows_and_group() {
        let rows = vec![
            row(),
            RawRow {
                id: "1002".to_string(),
                race: "Caucasian".to_string(),
                ..row()
            },
        ];
        let cohort = Cohort::from_rows(&rows).expect("valid rows");
        assert_eq!(cohort.len(), 2);
        let ids: Vec<&str> = cohort.group("Caucasian").map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1002"]);
        assert_eq!(cohort.group("Hispanic").count(), 0);
    }

    #[test]
    fn test_cohort_rejects_duplicate_id() {
        let rows = vec![
            row(),
            RawRow {
                line: 12,
                id: " 1001".to_string(),
                race: "Caucasian".to_string(),
                ..row()
            },
        ];
        let err = Cohort::from_rows(&rows).expect_err("duplicate id");
        assert!(matches!(
            err,
            BiasError::InvalidField { line: 12, ref field, .. } if field == "id"
        ));
    }

    #[test]
    fn test_empty_cohort() {
        let cohort = Cohort::from_rows(&[]).expect("empty is fine");
        assert!(cohort.is_empty());
    }
}
