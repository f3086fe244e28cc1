//! Per-group confusion matrices from model predictions.
//!
//! For every cohort row in a group the evaluator picks an effective prior
//! count and a ground-truth outcome, asks the [`RiskModel`] for a prediction,
//! thresholds it, and records one cell of a [`ConfusionMatrix`].

use crate::data::Cohort;
use crate::events::GroupEvents;
use crate::metrics::ConfusionMatrix;
use crate::risk::RiskModel;
use tracing::{debug, warn};

/// Where prior counts and outcomes come from.
#[derive(Clone, Copy, Debug)]
pub enum Outcomes<'a> {
    /// The row's own recorded prior count and recidivism flag.
    Recorded,
    /// Multiplicity in, and membership of, a (possibly sampled) event set.
    Observed(&'a GroupEvents),
}

/// Scores groups of a cohort against a fitted model at a fixed threshold.
#[derive(Clone, Copy, Debug)]
pub struct GroupEvaluator<'a> {
    model: &'a RiskModel,
    threshold: f64,
}

impl<'a> GroupEvaluator<'a> {
    /// Creates an evaluator.
    #[must_use]
    pub fn new(model: &'a RiskModel, threshold: f64) -> Self {
        Self { model, threshold }
    }

    /// Confusion matrix of the rows whose race equals `group`.
    ///
    /// A group with no rows yields the zero matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrest_bias::data::{Cohort, DefendantRecord};
    /// use arrest_bias::evaluation::{GroupEvaluator, Outcomes};
    /// use arrest_bias::risk::RiskModel;
    ///
    /// let cohort = Cohort::new(vec![DefendantRecord::new("1", "Caucasian", 8, 6, true)]);
    /// let model = RiskModel::from_parameters(0.5, 2.0);
    /// let cm = GroupEvaluator::new(&model, 5.0).evaluate(&cohort, "Caucasian", Outcomes::Recorded);
    /// assert_eq!(cm.true_positive, 1);
    /// ```
    #[must_use]
    pub fn evaluate(&self, cohort: &Cohort, group: &str, outcomes: Outcomes<'_>) -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::default();

        match outcomes {
            Outcomes::Recorded => {
                for record in cohort.group(group) {
                    let high = self.model.classify(record.priors_count, self.threshold);
                    cm.record(high.is_high(), record.two_year_recid);
                }
            }
            Outcomes::Observed(events) => {
                let prior_counts = events.prior_counts();
                let recidivated = events.recidivated();
                for record in cohort.group(group) {
                    let id = record.id.as_str();
                    let priors = prior_counts.get(id).copied().unwrap_or(0);
                    let high = self.model.classify(priors, self.threshold);
                    cm.record(high.is_high(), recidivated.contains(id));
                }
            }
        }

        if cm.total() == 0 {
            warn!(group, "group has no eligible rows; all rates undefined");
        } else {
            debug!(
                group,
                tp = cm.true_positive,
                tn = cm.true_negative,
                fp = cm.false_positive,
                fn_ = cm.false_negative,
                "evaluated group"
            );
        }
        cm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DefendantRecord;
    use crate::risk::HIGH_RISK_THRESHOLD;

    const STUDY: &str = "African-American";

    fn cohort() -> Cohort {
        Cohort::new(vec![
            DefendantRecord::new("a", STUDY, 2, 3, false),
            DefendantRecord::new("b", STUDY, 8, 7, true),
            DefendantRecord::new("c", STUDY, 9, 9, false),
            DefendantRecord::new("d", STUDY, 1, 2, true),
            DefendantRecord::new("e", "Caucasian", 0, 1, false),
        ])
    }

    fn model() -> RiskModel {
        // predictions: 2 + 0.5 * priors, high at priors >= 6
        RiskModel::from_parameters(0.5, 2.0)
    }

    #[test]
    fn test_recorded_outcomes_fill_each_cell() {
        let model = model();
        let cm = GroupEvaluator::new(&model, HIGH_RISK_THRESHOLD).evaluate(
            &cohort(),
            STUDY,
            Outcomes::Recorded,
        );
        assert_eq!(cm, ConfusionMatrix::new(1, 1, 1, 1));
        assert_eq!(cm.total(), 4);
    }

    #[test]
    fn test_observed_uses_event_multiplicity() {
        let model = model();
        // b keeps 3 of 8 priors (now low risk), c keeps all 9; d's
        // recidivism was sampled away.
        let events = GroupEvents::new(
            ["b", "b", "b", "c", "c", "c", "c", "c", "c", "c", "c", "c"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            vec!["b".to_string()],
        );
        let cm = GroupEvaluator::new(&model, HIGH_RISK_THRESHOLD).evaluate(
            &cohort(),
            STUDY,
            Outcomes::Observed(&events),
        );
        // a: low/neg -> TN, b: low/pos -> FN, c: high/neg -> FP, d: low/neg -> TN
        assert_eq!(cm, ConfusionMatrix::new(0, 2, 1, 1));
    }

    #[test]
    fn test_observed_with_unsampled_events_matches_recorded() {
        let model = model();
        let cohort = cohort();
        let events = GroupEvents::extract(&cohort, STUDY);
        let evaluator = GroupEvaluator::new(&model, HIGH_RISK_THRESHOLD);
        assert_eq!(
            evaluator.evaluate(&cohort, STUDY, Outcomes::Observed(&events)),
            evaluator.evaluate(&cohort, STUDY, Outcomes::Recorded)
        );
    }

    #[test]
    fn test_empty_group_is_zero_matrix() {
        let model = model();
        let cm = GroupEvaluator::new(&model, HIGH_RISK_THRESHOLD).evaluate(
            &cohort(),
            "Asian",
            Outcomes::Recorded,
        );
        assert_eq!(cm, ConfusionMatrix::default());
        let rates = cm.rates();
        assert!(rates.accuracy.is_none());
        assert!(rates.false_positive_rate.is_none());
        assert!(rates.false_negative_rate.is_none());
    }

    #[test]
    fn test_threshold_changes_classification() {
        let model = model();
        let cm = GroupEvaluator::new(&model, 100.0).evaluate(&cohort(), STUDY, Outcomes::Recorded);
        assert_eq!(cm.true_positive + cm.false_positive, 0);
        assert_eq!(cm.total(), 4);
    }
}
