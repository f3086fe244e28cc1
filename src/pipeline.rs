//! End-to-end simulation.
//!
//! ```text
//! CSV ─► RecordFilter ─► Cohort ─┬─► RiskModel::fit (all rows)
//!                                ├─► reference group ─► recorded matrix ─────────┐
//!                                └─► study group ─► GroupEvents ─► BiasSampler ─► sampled matrix ─► combined
//! ```
//!
//! The model is fitted on the unperturbed cohort and stays fixed; only the
//! study group's events are sampled.

use crate::config::SimulationConfig;
use crate::data::{load_rows, Cohort, ColumnLayout, RawRow, RecordFilter};
use crate::error::Result;
use crate::evaluation::{GroupEvaluator, Outcomes};
use crate::events::{GroupEvents, GroupSummary};
use crate::metrics::ConfusionMatrix;
use crate::report::{SimulationReport, SweepPoint, SweepReport};
use crate::risk::RiskModel;
use crate::sampling::{simulation_rng, BiasSampler};
use rand::Rng;
use tracing::info;

/// Fractions used by a sweep when none are given: 0.0 to 0.9 in steps of 0.1.
#[must_use]
pub fn default_sweep_fractions() -> Vec<f64> {
    (0..10).map(|i| f64::from(i) / 10.0).collect()
}

/// A validated simulation ready to run.
///
/// # Examples
///
/// ```no_run
/// use arrest_bias::config::SimulationConfig;
/// use arrest_bias::pipeline::BiasPipeline;
///
/// let config = SimulationConfig::new("compas-scores-two-years.csv")
///     .with_bias_fraction(0.3)
///     .with_seed(42);
/// let report = BiasPipeline::new(config)?.run()?;
/// println!("{report}");
/// # Ok::<(), arrest_bias::error::BiasError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BiasPipeline {
    config: SimulationConfig,
    layout: ColumnLayout,
    filter: RecordFilter,
}

impl BiasPipeline {
    /// Validates `config` and builds a pipeline reading the COMPAS layout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BiasError::InvalidConfig`] for a bad parameter.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let filter = RecordFilter::new(config.age_filter.clone());
        Ok(Self {
            config,
            layout: ColumnLayout::compas(),
            filter,
        })
    }

    /// The validated configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Loads, filters and converts the configured input.
    ///
    /// # Errors
    ///
    /// Propagates I/O, CSV, row-width and field errors.
    pub fn load_cohort(&self) -> Result<Cohort> {
        let rows = load_rows(&self.config.input, &self.layout)?;
        info!(path = %self.config.input.display(), rows = rows.len(), "loaded input");
        self.cohort_from_rows(&rows)
    }

    /// Filters and converts already-parsed rows.
    ///
    /// # Errors
    ///
    /// Propagates field errors from the filter or the record conversion.
    pub fn cohort_from_rows(&self, rows: &[RawRow]) -> Result<Cohort> {
        let eligible = self.filter.apply(rows)?;
        let cohort = Cohort::from_rows(&eligible)?;
        info!(
            input = rows.len(),
            cohort = cohort.len(),
            age_filter = %self.filter.age_filter(),
            "built cohort"
        );
        Ok(cohort)
    }

    /// Runs one simulation on the configured input with the configured seed.
    ///
    /// # Errors
    ///
    /// Fails on any input error, an empty cohort or a singular fit.
    pub fn run(&self) -> Result<SimulationReport> {
        let cohort = self.load_cohort()?;
        let mut rng = simulation_rng(self.config.seed);
        self.run_cohort(&cohort, &mut rng)
    }

    /// Runs one simulation on `cohort`, drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Fails on an empty cohort or a singular fit.
    pub fn run_cohort<R: Rng + ?Sized>(&self, cohort: &Cohort, rng: &mut R) -> Result<SimulationReport> {
        let sampler = BiasSampler::new(self.config.bias_fraction)?;
        let model = RiskModel::fit(cohort)?;
        let evaluator = GroupEvaluator::new(&model, self.config.threshold);
        let reference_group = self.config.reference_group.as_str();
        let study_group = self.config.study_group.as_str();

        let reference_events = GroupEvents::extract(cohort, reference_group);
        let study_events = GroupEvents::extract(cohort, study_group);

        let reference = evaluator.evaluate(cohort, reference_group, Outcomes::Recorded);
        let study_observed = evaluator.evaluate(cohort, study_group, Outcomes::Recorded);

        let sampled_events = sampler.sample_events(&study_events, rng);
        let study_sampled =
            evaluator.evaluate(cohort, study_group, Outcomes::Observed(&sampled_events));
        let combined = reference + study_sampled;

        let study_size = cohort.group(study_group).count();
        let groups = vec![
            GroupSummary::new(
                reference_group,
                cohort.group(reference_group).count(),
                &reference_events,
            ),
            GroupSummary::new(study_group, study_size, &study_events),
            GroupSummary::new(
                &format!("{study_group} (sampled)"),
                study_size,
                &sampled_events,
            ),
        ];

        info!(
            bias_fraction = self.config.bias_fraction,
            fpr = ?combined.false_positive_rate(),
            fnr = ?combined.false_negative_rate(),
            "simulation complete"
        );

        Ok(SimulationReport {
            bias_fraction: self.config.bias_fraction,
            threshold: self.config.threshold,
            seed: self.config.seed,
            reference_group: reference_group.to_string(),
            study_group: study_group.to_string(),
            cohort_size: cohort.len(),
            model,
            groups,
            reference: reference.into(),
            study_observed: study_observed.into(),
            study_sampled: study_sampled.into(),
            combined: combined.into(),
        })
    }

    /// Runs the study-group simulation once per fraction on the configured
    /// input. The configured bias fraction is ignored.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range fraction before the input is read, then on
    /// any input error, an empty cohort or a singular fit.
    pub fn sweep(&self, fractions: &[f64]) -> Result<SweepReport> {
        let samplers = sweep_samplers(fractions)?;
        let cohort = self.load_cohort()?;
        let mut rng = simulation_rng(self.config.seed);
        self.sweep_with(&cohort, &samplers, &mut rng)
    }

    /// Sweeps `fractions` over `cohort` against one fitted model. Fractions
    /// draw from `rng` in order.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range fraction, an empty cohort or a singular fit.
    pub fn sweep_cohort<R: Rng + ?Sized>(
        &self,
        cohort: &Cohort,
        fractions: &[f64],
        rng: &mut R,
    ) -> Result<SweepReport> {
        let samplers = sweep_samplers(fractions)?;
        self.sweep_with(cohort, &samplers, rng)
    }

    fn sweep_with<R: Rng + ?Sized>(
        &self,
        cohort: &Cohort,
        samplers: &[BiasSampler],
        rng: &mut R,
    ) -> Result<SweepReport> {
        let model = RiskModel::fit(cohort)?;
        let evaluator = GroupEvaluator::new(&model, self.config.threshold);
        let study_group = self.config.study_group.as_str();

        let reference: ConfusionMatrix =
            evaluator.evaluate(cohort, &self.config.reference_group, Outcomes::Recorded);
        let study_events = GroupEvents::extract(cohort, study_group);

        let points = samplers
            .iter()
            .map(|sampler| {
                let sampled = sampler.sample_events(&study_events, rng);
                let study = evaluator.evaluate(cohort, study_group, Outcomes::Observed(&sampled));
                SweepPoint {
                    bias_fraction: sampler.fraction(),
                    study: study.into(),
                    combined: (reference + study).into(),
                }
            })
            .collect();

        info!(fractions = samplers.len(), "sweep complete");

        Ok(SweepReport {
            threshold: self.config.threshold,
            seed: self.config.seed,
            reference_group: self.config.reference_group.clone(),
            study_group: study_group.to_string(),
            cohort_size: cohort.len(),
            model,
            reference: reference.into(),
            points,
        })
    }
}

fn sweep_samplers(fractions: &[f64]) -> Result<Vec<BiasSampler>> {
    fractions.iter().map(|&p| BiasSampler::new(p)).collect()
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
