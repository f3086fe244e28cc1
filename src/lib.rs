//! arrest-bias: how differential arrest rates bias a recidivism risk model.
//!
//! A linear risk model is fitted on the COMPAS two-year recidivism cohort
//! (prior-offense count to decile score). The study group's recorded prior
//! offenses and recidivism events are then thinned by a bias-reduction
//! fraction `p`, simulating a world where that share of its arrests never
//! happened, and the fixed model is re-scored against the thinned records.
//! Confusion matrices for the reference group, the study group and their
//! combination show how the error rates move.
//!
//! # Quick Start
//!
//! ```
//! use arrest_bias::prelude::*;
//! use rand::SeedableRng;
//!
//! let cohort = Cohort::new(vec![
//!     DefendantRecord::new("r1", "Caucasian", 8, 6, true),
//!     DefendantRecord::new("r2", "Caucasian", 0, 2, false),
//!     DefendantRecord::new("s1", "African-American", 2, 3, false),
//!     DefendantRecord::new("s2", "African-American", 8, 6, true),
//! ]);
//!
//! let pipeline = BiasPipeline::new(SimulationConfig::new("unused.csv"))?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let report = pipeline.run_cohort(&cohort, &mut rng)?;
//!
//! assert_eq!(report.combined.counts, ConfusionMatrix::new(2, 2, 0, 0));
//! # Ok::<(), arrest_bias::error::BiasError>(())
//! ```
//!
//! # Modules
//!
//! - [`data`]: CSV column layout, eligibility filter, defendant records
//! - [`events`]: per-group prior-offense and recidivism events
//! - [`linear_model`]: ordinary least squares on one feature
//! - [`risk`]: the risk model and high-risk classification
//! - [`sampling`]: seedable bias-reduction sampling
//! - [`evaluation`]: per-group confusion matrices
//! - [`metrics`]: confusion matrix and regression diagnostics
//! - [`pipeline`]: end-to-end simulation and sweeps
//! - [`report`]: report types and table/JSON/CSV rendering
//! - [`config`]: run configuration
//! - [`cli`]: command-line definitions

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod linear_model;
pub mod metrics;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod risk;
pub mod sampling;

pub use config::SimulationConfig;
pub use error::{BiasError, Result};
pub use pipeline::BiasPipeline;
