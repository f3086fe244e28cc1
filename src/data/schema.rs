//! Positional column layout and raw row parsing.
//!
//! The input file is positional: each field lives at a fixed zero-based
//! column. [`ColumnLayout`] holds that table and is validated once, so the
//! rest of the crate only ever sees named fields on a [`RawRow`].

use crate::error::{BiasError, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of named fields in a [`RawRow`].
pub const FIELD_COUNT: usize = 12;

/// A named field of the input schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Defendant identifier
    Id,
    /// Sex
    Sex,
    /// Age in years
    Age,
    /// Age category label (e.g. "25 - 45")
    AgeCategory,
    /// Race, the demographic group
    Race,
    /// Assigned risk decile
    DecileScore,
    /// Number of prior charges
    PriorsCount,
    /// Days between screening and arrest
    ScreeningArrestGap,
    /// Charge degree code
    ChargeDegree,
    /// Whether an underlying recidivism case exists (-1 when none)
    IsRecid,
    /// Risk score category text
    ScoreText,
    /// Recidivated within two years
    TwoYearRecid,
}

impl Field {
    /// All fields, in layout-table order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Id,
        Field::Sex,
        Field::Age,
        Field::AgeCategory,
        Field::Race,
        Field::DecileScore,
        Field::PriorsCount,
        Field::ScreeningArrestGap,
        Field::ChargeDegree,
        Field::IsRecid,
        Field::ScoreText,
        Field::TwoYearRecid,
    ];

    /// Column name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Sex => "sex",
            Field::Age => "age",
            Field::AgeCategory => "age_cat",
            Field::Race => "race",
            Field::DecileScore => "decile_score",
            Field::PriorsCount => "priors_count",
            Field::ScreeningArrestGap => "days_b_screening_arrest",
            Field::ChargeDegree => "c_charge_degree",
            Field::IsRecid => "is_recid",
            Field::ScoreText => "score_text",
            Field::TwoYearRecid => "two_year_recid",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed zero-based column positions of every [`Field`], plus the exact row
/// width the file must have.
///
/// # Examples
///
/// ```
/// use arrest_bias::data::{ColumnLayout, Field};
///
/// let layout = ColumnLayout::compas();
/// assert_eq!(layout.width(), 53);
/// assert_eq!(layout.position(Field::PriorsCount), 14);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    width: usize,
    positions: [usize; FIELD_COUNT],
}

impl ColumnLayout {
    /// Creates a layout from `(field, column)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing or mapped twice, or a column
    /// lies outside `width`.
    pub fn new(width: usize, columns: &[(Field, usize)]) -> Result<Self> {
        let mut positions = [usize::MAX; FIELD_COUNT];

        for &(field, column) in columns {
            if column >= width {
                return Err(BiasError::invalid_config(
                    field.name(),
                    column,
                    &format!("a column index below the row width {width}"),
                ));
            }
            if positions[field.slot()] != usize::MAX {
                return Err(BiasError::invalid_config(
                    field.name(),
                    column,
                    "each field mapped exactly once",
                ));
            }
            positions[field.slot()] = column;
        }

        if let Some(missing) = Field::ALL
            .iter()
            .find(|f| positions[f.slot()] == usize::MAX)
        {
            return Err(BiasError::invalid_config(
                missing.name(),
                "unmapped",
                "a column index for every field",
            ));
        }

        Ok(Self { width, positions })
    }

    /// The 53-column layout of the two-year recidivism score export.
    #[must_use]
    pub fn compas() -> Self {
        Self {
            width: 53,
            positions: [0, 5, 7, 8, 9, 11, 14, 15, 22, 24, 40, 52],
        }
    }

    /// Exact number of fields every row must have.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Column index of `field`.
    #[must_use]
    pub fn position(&self, field: Field) -> usize {
        self.positions[field.slot()]
    }

    /// Maps one CSV record onto named fields.
    ///
    /// # Errors
    ///
    /// Returns [`BiasError::MalformedRow`] if the record width differs from the
    /// layout width.
    pub fn parse_record(&self, line: usize, record: &csv::StringRecord) -> Result<RawRow> {
        if record.len() != self.width {
            return Err(BiasError::MalformedRow {
                line,
                expected: self.width,
                actual: record.len(),
            });
        }

        let take = |field: Field| record[self.position(field)].to_string();

        Ok(RawRow {
            line,
            id: take(Field::Id),
            sex: take(Field::Sex),
            age: take(Field::Age),
            age_category: take(Field::AgeCategory),
            race: take(Field::Race),
            decile_score: take(Field::DecileScore),
            priors_count: take(Field::PriorsCount),
            screening_arrest_gap: take(Field::ScreeningArrestGap),
            charge_degree: take(Field::ChargeDegree),
            is_recid: take(Field::IsRecid),
            score_text: take(Field::ScoreText),
            two_year_recid: take(Field::TwoYearRecid),
        })
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::compas()
    }
}

/// One input row with its fields named but still unparsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file
    pub line: usize,
    pub id: String,
    pub sex: String,
    pub age: String,
    pub age_category: String,
    pub race: String,
    pub decile_score: String,
    pub priors_count: String,
    pub screening_arrest_gap: String,
    pub charge_degree: String,
    pub is_recid: String,
    pub score_text: String,
    pub two_year_recid: String,
}

impl RawRow {
    /// Raw text of `field`.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Sex => &self.sex,
            Field::Age => &self.age,
            Field::AgeCategory => &self.age_category,
            Field::Race => &self.race,
            Field::DecileScore => &self.decile_score,
            Field::PriorsCount => &self.priors_count,
            Field::ScreeningArrestGap => &self.screening_arrest_gap,
            Field::ChargeDegree => &self.charge_degree,
            Field::IsRecid => &self.is_recid,
            Field::ScoreText => &self.score_text,
            Field::TwoYearRecid => &self.two_year_recid,
        }
    }

    /// Parses `field` as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`BiasError::InvalidField`] naming this row's line if the value
    /// is not an integer.
    pub fn parse_int(&self, field: Field) -> Result<i64> {
        let raw = self.get(field);
        raw.trim()
            .parse::<i64>()
            .map_err(|_| BiasError::invalid_field(self.line, field.name(), raw))
    }
}

/// Reads rows from CSV text. The first row is a header and is discarded.
///
/// # Errors
///
/// Returns an error on undecodable CSV or on any row whose width differs from
/// the layout.
pub fn read_rows<R: Read>(reader: R, layout: &ColumnLayout) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record
            .position()
            .map_or(rows.len() + 2, |p| p.line() as usize);
        rows.push(layout.parse_record(line, &record)?);
    }

    debug!(rows = rows.len(), "parsed input rows");
    Ok(rows)
}

/// Reads rows from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or [`read_rows`] fails.
pub fn load_rows<P: AsRef<Path>>(path: P, layout: &ColumnLayout) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_rows(std::io::BufReader::new(file), layout)
}
