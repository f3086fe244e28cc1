//! Defendant data: input schema, eligibility filtering and the typed cohort.
//!
//! Raw CSV rows are mapped onto named fields once, at parse time
//! ([`schema`]), filtered for analysis eligibility ([`filter`]), and then
//! converted into immutable [`DefendantRecord`]s ([`record`]).

pub mod filter;
pub mod record;
pub mod schema;

pub use filter::{AgeFilter, RecordFilter};
pub use record::{ChargeDegree, Cohort, DefendantRecord};
pub use schema::{load_rows, read_rows, ColumnLayout, Field, RawRow};
