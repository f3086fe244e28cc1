//! Simulation reports and their renderings.
//!
//! Reports are plain serde structs. The table rendering is the `Display`
//! impl; JSON and CSV go through `serde_json` and `csv`. Undefined rates
//! print as `undefined` in table and CSV output and as `null` in JSON.

use crate::error::{BiasError, Result};
use crate::events::GroupSummary;
use crate::metrics::classification::Rates;
use crate::metrics::ConfusionMatrix;
use crate::risk::RiskModel;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::fmt;

/// Text printed for a rate whose denominator is zero.
pub const UNDEFINED: &str = "undefined";

/// Report output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// `metric,value` lines (one row per fraction for sweeps)
    Csv,
}

/// A confusion matrix together with its derived rates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatrixReport {
    /// Raw counts
    #[serde(flatten)]
    pub counts: ConfusionMatrix,
    /// Individuals classified
    pub total: usize,
    /// Derived rates; `None` when undefined
    #[serde(flatten)]
    pub rates: Rates,
}

impl From<ConfusionMatrix> for MatrixReport {
    fn from(counts: ConfusionMatrix) -> Self {
        Self {
            counts,
            total: counts.total(),
            rates: counts.rates(),
        }
    }
}

impl MatrixReport {
    fn metric_rows(&self, section: &str, rows: &mut Vec<(String, String)>) {
        let counts = [
            ("true_positive", self.counts.true_positive),
            ("true_negative", self.counts.true_negative),
            ("false_positive", self.counts.false_positive),
            ("false_negative", self.counts.false_negative),
            ("total", self.total),
        ];
        for (name, value) in counts {
            rows.push((format!("{section}.{name}"), value.to_string()));
        }

        let rates = [
            ("accuracy", self.rates.accuracy),
            ("false_positive_rate", self.rates.false_positive_rate),
            ("false_negative_rate", self.rates.false_negative_rate),
            ("precision", self.rates.precision),
        ];
        for (name, value) in rates {
            rows.push((format!("{section}.{name}"), format_rate(value)));
        }
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
        writeln!(
            f,
            "  {:<28} {:>6} {:>6} {:>6} {:>6} {:>10} {:>10} {:>10} {:>10}",
            label,
            self.counts.true_positive,
            self.counts.true_negative,
            self.counts.false_positive,
            self.counts.false_negative,
            format_rate(self.rates.accuracy),
            format_rate(self.rates.false_positive_rate),
            format_rate(self.rates.false_negative_rate),
            format_rate(self.rates.precision),
        )
    }
}

/// Formats a rate to four decimals, or [`UNDEFINED`].
#[must_use]
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| UNDEFINED.to_string(), |r| format!("{r:.4}"))
}

/// Outcome of a single simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Fraction of study-group events removed
    pub bias_fraction: f64,
    /// High-risk threshold
    pub threshold: f64,
    /// Seed used, if any
    pub seed: Option<u64>,
    /// Reference group label
    pub reference_group: String,
    /// Study group label
    pub study_group: String,
    /// Rows that passed the filter
    pub cohort_size: usize,
    /// Fitted risk model
    pub model: RiskModel,
    /// Reference group, study group before and after sampling
    pub groups: Vec<GroupSummary>,
    /// Reference group on recorded outcomes
    pub reference: MatrixReport,
    /// Study group on recorded outcomes
    pub study_observed: MatrixReport,
    /// Study group on sampled events
    pub study_sampled: MatrixReport,
    /// Reference plus sampled study group
    pub combined: MatrixReport,
}

impl SimulationReport {
    /// Renders the report in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
            OutputFormat::Csv => self.to_csv(),
        }
    }

    /// `metric,value` pairs in output order.
    #[must_use]
    pub fn metric_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("bias_fraction".to_string(), self.bias_fraction.to_string()),
            ("threshold".to_string(), self.threshold.to_string()),
            ("cohort_size".to_string(), self.cohort_size.to_string()),
            ("model.slope".to_string(), self.model.slope().to_string()),
            ("model.intercept".to_string(), self.model.intercept().to_string()),
            ("model.r_squared".to_string(), self.model.r_squared().to_string()),
        ];
        self.reference.metric_rows("reference", &mut rows);
        self.study_observed.metric_rows("study_observed", &mut rows);
        self.study_sampled.metric_rows("study_sampled", &mut rows);
        self.combined.metric_rows("combined", &mut rows);
        rows
    }

    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["metric", "value"])?;
        for (metric, value) in self.metric_rows() {
            writer.write_record([metric.as_str(), value.as_str()])?;
        }
        finish_csv(writer)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "Arrest Bias Simulation")?;
        kv(f, "Bias fraction", format!("{:.2}", self.bias_fraction))?;
        kv(f, "Threshold", format!("{:.2}", self.threshold))?;
        kv(f, "Seed", seed_label(self.seed))?;
        kv(f, "Cohort size", self.cohort_size)?;

        section(f, "Groups")?;
        for summary in &self.groups {
            kv(
                f,
                &summary.group,
                format!(
                    "{} defendants, {} prior events, {} recidivism events",
                    summary.defendants, summary.prior_events, summary.recidivism_events
                ),
            )?;
        }

        write_model(f, &self.model)?;

        section(f, "Confusion Matrices")?;
        matrix_header(f, "Group")?;
        self.reference
            .write_row(f, &format!("{} (recorded)", self.reference_group))?;
        self.study_observed
            .write_row(f, &format!("{} (recorded)", self.study_group))?;
        self.study_sampled
            .write_row(f, &format!("{} (sampled)", self.study_group))?;
        self.combined.write_row(f, "Combined")
    }
}

/// One fraction of a bias sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Fraction of study-group events removed
    pub bias_fraction: f64,
    /// Study group on sampled events
    pub study: MatrixReport,
    /// Reference plus sampled study group
    pub combined: MatrixReport,
}

/// Outcome of a bias sweep against one fitted model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepReport {
    /// High-risk threshold
    pub threshold: f64,
    /// Seed used, if any
    pub seed: Option<u64>,
    /// Reference group label
    pub reference_group: String,
    /// Study group label
    pub study_group: String,
    /// Rows that passed the filter
    pub cohort_size: usize,
    /// Fitted risk model
    pub model: RiskModel,
    /// Reference group on recorded outcomes
    pub reference: MatrixReport,
    /// One entry per fraction, in request order
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// Renders the report in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
            OutputFormat::Csv => self.to_csv(),
        }
    }

    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "bias_fraction",
            "study_false_positive_rate",
            "study_false_negative_rate",
            "combined_accuracy",
            "combined_false_positive_rate",
            "combined_false_negative_rate",
        ])?;
        for point in &self.points {
            writer.write_record([
                point.bias_fraction.to_string(),
                format_rate(point.study.rates.false_positive_rate),
                format_rate(point.study.rates.false_negative_rate),
                format_rate(point.combined.rates.accuracy),
                format_rate(point.combined.rates.false_positive_rate),
                format_rate(point.combined.rates.false_negative_rate),
            ])?;
        }
        finish_csv(writer)
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "Arrest Bias Sweep")?;
        kv(f, "Threshold", format!("{:.2}", self.threshold))?;
        kv(f, "Seed", seed_label(self.seed))?;
        kv(f, "Cohort size", self.cohort_size)?;
        kv(f, "Reference group", &self.reference_group)?;
        kv(f, "Study group", &self.study_group)?;

        write_model(f, &self.model)?;

        section(f, "Reference")?;
        matrix_header(f, "Group")?;
        self.reference
            .write_row(f, &format!("{} (recorded)", self.reference_group))?;

        section(f, "Sweep")?;
        writeln!(
            f,
            "  {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "p".bold(),
            "study FPR".bold(),
            "study FNR".bold(),
            "accuracy".bold(),
            "comb. FPR".bold(),
            "comb. FNR".bold(),
        )?;
        for point in &self.points {
            writeln!(
                f,
                "  {:>8.2} {:>12} {:>12} {:>12} {:>12} {:>12}",
                point.bias_fraction,
                format_rate(point.study.rates.false_positive_rate),
                format_rate(point.study.rates.false_negative_rate),
                format_rate(point.combined.rates.accuracy),
                format_rate(point.combined.rates.false_positive_rate),
                format_rate(point.combined.rates.false_negative_rate),
            )?;
        }
        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n{}", format!("=== {title} ===").cyan().bold())
}

fn kv(f: &mut fmt::Formatter<'_>, key: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {}: {}", key.white().bold(), value)
}

fn seed_label(seed: Option<u64>) -> String {
    seed.map_or_else(|| "entropy".to_string(), |s| s.to_string())
}

fn write_model(f: &mut fmt::Formatter<'_>, model: &RiskModel) -> fmt::Result {
    section(f, "Risk Model")?;
    kv(f, "Slope", format!("{:.4}", model.slope()))?;
    kv(f, "Intercept", format!("{:.4}", model.intercept()))?;
    kv(f, "R²", format!("{:.4}", model.r_squared()))?;
    kv(f, "Training rows", model.n_samples())
}

fn matrix_header(f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
    writeln!(
        f,
        "  {:<28} {:>6} {:>6} {:>6} {:>6} {:>10} {:>10} {:>10} {:>10}",
        label.bold(),
        "TP",
        "TN",
        "FP",
        "FN",
        "Accuracy",
        "FPR",
        "FNR",
        "Precision",
    )
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| BiasError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
