//! Command-line interface definitions.
//!
//! Flags are resolved into a [`SimulationConfig`]: a `--config` JSON file is
//! loaded first, then any flag given on the command line replaces its value.

use crate::config::SimulationConfig;
use crate::data::AgeFilter;
use crate::error::Result;
use crate::report::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Simulate how differential arrest rates bias a recidivism risk model
#[derive(Parser, Debug)]
#[command(name = "arrest-bias")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one simulation at a single bias-reduction fraction
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Fraction of study-group events to remove, in [0, 1)
        #[arg(short = 'p', long)]
        bias_fraction: Option<f64>,
    },

    /// Run the simulation for a series of fractions against one fitted model
    Sweep {
        #[command(flatten)]
        run: RunArgs,

        /// Comma-separated fractions (default 0.0,0.1,...,0.9)
        #[arg(long, value_delimiter = ',')]
        fractions: Vec<f64>,
    },
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// COMPAS two-year recidivism CSV
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep only this age category (e.g. "25 - 45")
    #[arg(long, conflicts_with_all = ["age_min", "age_max"])]
    pub age_category: Option<String>,

    /// Lowest age kept (inclusive)
    #[arg(long, requires = "age_max")]
    pub age_min: Option<u32>,

    /// Highest age kept (inclusive)
    #[arg(long, requires = "age_min")]
    pub age_max: Option<u32>,

    /// Random seed for reproducible sampling
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Group evaluated on recorded outcomes
    #[arg(long)]
    pub reference_group: Option<String>,

    /// Group whose arrest records are sampled
    #[arg(long)]
    pub study_group: Option<String>,

    /// Prediction at or above which a defendant is high risk
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

impl RunArgs {
    /// Builds the run configuration. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the `--config` file cannot be read or parsed.
    pub fn resolve(&self, bias_fraction: Option<f64>) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input.clone_from(input);
        }
        if let Some(fraction) = bias_fraction {
            config.bias_fraction = fraction;
        }
        if let Some(age_filter) = self.age_filter() {
            config.age_filter = age_filter;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(group) = &self.reference_group {
            config.reference_group.clone_from(group);
        }
        if let Some(group) = &self.study_group {
            config.study_group.clone_from(group);
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }

        Ok(config)
    }

    fn age_filter(&self) -> Option<AgeFilter> {
        match (&self.age_category, self.age_min, self.age_max) {
            (Some(category), _, _) => Some(AgeFilter::category(category.clone())),
            (None, Some(min), Some(max)) => Some(AgeFilter::range(min, max)),
            _ => None,
        }
    }
}
