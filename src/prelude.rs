//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use arrest_bias::prelude::*;
//! ```

pub use crate::config::SimulationConfig;
pub use crate::data::{AgeFilter, Cohort, DefendantRecord, RecordFilter};
pub use crate::error::BiasError;
pub use crate::evaluation::{GroupEvaluator, Outcomes};
pub use crate::events::{GroupEvents, GroupSummary};
pub use crate::metrics::ConfusionMatrix;
pub use crate::pipeline::BiasPipeline;
pub use crate::report::{OutputFormat, SimulationReport, SweepReport};
pub use crate::risk::{RiskLevel, RiskModel, HIGH_RISK_THRESHOLD};
pub use crate::sampling::BiasSampler;
