//! Binary classification metrics.
//!
//! Provides the 2×2 [`ConfusionMatrix`] with on-demand accuracy, precision,
//! false-positive rate and false-negative rate.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Tally of predicted-vs-actual outcomes.
///
/// The four counts always sum to the number of individuals recorded. Rates
/// are derived on demand and are `None` when their denominator is zero.
///
/// # Examples
///
/// ```
/// use arrest_bias::metrics::ConfusionMatrix;
///
/// let mut cm = ConfusionMatrix::default();
/// cm.record(true, true);   // predicted high risk, recidivated
/// cm.record(true, false);  // predicted high risk, did not
/// cm.record(false, false); // predicted low risk, did not
///
/// assert_eq!(cm.total(), 3);
/// assert_eq!(cm.false_positive_rate(), Some(0.5));
/// assert_eq!(cm.false_negative_rate(), Some(0.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Predicted positive, actually positive
    pub true_positive: usize,
    /// Predicted negative, actually negative
    pub true_negative: usize,
    /// Predicted positive, actually negative
    pub false_positive: usize,
    /// Predicted negative, actually positive
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// Creates a matrix from its four counts.
    #[must_use]
    pub fn new(
        true_positive: usize,
        true_negative: usize,
        false_positive: usize,
        false_negative: usize,
    ) -> Self {
        Self {
            true_positive,
            true_negative,
            false_positive,
            false_negative,
        }
    }

    /// Increments exactly one cell.
    pub fn record(&mut self, predicted_positive: bool, actual_positive: bool) {
        match (predicted_positive, actual_positive) {
            (true, true) => self.true_positive += 1,
            (true, false) => self.false_positive += 1,
            (false, true) => self.false_negative += 1,
            (false, false) => self.true_negative += 1,
        }
    }

    /// Coordinate-wise sum of two matrices.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            true_positive: self.true_positive + other.true_positive,
            true_negative: self.true_negative + other.true_negative,
            false_positive: self.false_positive + other.false_positive,
            false_negative: self.false_negative + other.false_negative,
        }
    }

    /// Number of individuals recorded.
    #[must_use]
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// Individuals whose outcome was positive.
    #[must_use]
    pub fn actual_positives(&self) -> usize {
        self.true_positive + self.false_negative
    }

    /// Individuals whose outcome was negative.
    #[must_use]
    pub fn actual_negatives(&self) -> usize {
        self.true_negative + self.false_positive
    }

    /// (TP + TN) / total
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// FP / (FP + TN)
    #[must_use]
    pub fn false_positive_rate(&self) -> Option<f64> {
        ratio(self.false_positive, self.actual_negatives())
    }

    /// FN / (FN + TP)
    #[must_use]
    pub fn false_negative_rate(&self) -> Option<f64> {
        ratio(self.false_negative, self.actual_positives())
    }

    /// TP / (TP + FP)
    #[must_use]
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// All derived rates at once.
    #[must_use]
    pub fn rates(&self) -> Rates {
        Rates {
            accuracy: self.accuracy(),
            false_positive_rate: self.false_positive_rate(),
            false_negative_rate: self.false_negative_rate(),
            precision: self.precision(),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

impl Add for ConfusionMatrix {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.combine(&rhs)
    }
}

impl AddAssign for ConfusionMatrix {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.combine(&rhs);
    }
}

impl Sum for ConfusionMatrix {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, cm| acc + cm)
    }
}

/// Derived rates of a [`ConfusionMatrix`]; `None` marks an undefined rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// (TP + TN) / total
    pub accuracy: Option<f64>,
    /// FP / (FP + TN)
    pub false_positive_rate: Option<f64>,
    /// FN / (FN + TP)
    pub false_negative_rate: Option<f64>,
    /// TP / (TP + FP)
    pub precision: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_each_cell() {
        let mut cm = ConfusionMatrix::default();
        cm.record(true, true);
        cm.record(true, false);
        cm.record(false, true);
        cm.record(false, false);
        cm.record(false, false);
        assert_eq!(cm, ConfusionMatrix::new(1, 2, 1, 1));
        assert_eq!(cm.total(), 5);
    }

    #[test]
    fn test_rates() {
        let cm = ConfusionMatrix::new(30, 50, 10, 10);
        assert_eq!(cm.accuracy(), Some(0.8));
        assert_eq!(cm.false_positive_rate(), Some(10.0 / 60.0));
        assert_eq!(cm.false_negative_rate(), Some(0.25));
        assert_eq!(cm.precision(), Some(0.75));
    }

    #[test]
    fn test_zero_matrix_rates_undefined() {
        let rates = ConfusionMatrix::default().rates();
        assert_eq!(rates.accuracy, None);
        assert_eq!(rates.false_positive_rate, None);
        assert_eq!(rates.false_negative_rate, None);
        assert_eq!(rates.precision, None);
    }

    #[test]
    fn test_partial_degenerate_rates() {
        // No actual negatives: FPR undefined, the rest still defined.
        let cm = ConfusionMatrix::new(3, 0, 0, 1);
        assert_eq!(cm.false_positive_rate(), None);
        assert_eq!(cm.false_negative_rate(), Some(0.25));
        assert_eq!(cm.accuracy(), Some(0.75));
        assert_eq!(cm.precision(), Some(1.0));
    }

    #[test]
    fn test_record_fills_one_cell_each() {
        let mut cm = ConfusionMatrix::default();
        for (p, a) in [(true, true), (true, false), (false, true), (false, false)] {
            cm.record(p, a);
        }
        assert_eq!(cm, ConfusionMatrix::new(1, 1, 1, 1));
    }

    #[test]
    fn test_operators_agree_with_combine() {
        let a = ConfusionMatrix::new(1, 2, 3, 4);
        let b = ConfusionMatrix::new(10, 20, 30, 40);
        let mut c = a;
        c += b;
        assert_eq!(a + b, a.combine(&b));
        assert_eq!(c, ConfusionMatrix::new(11, 22, 33, 44));
        let summed: ConfusionMatrix = [a, b].into_iter().sum();
        assert_eq!(summed, c);
    }

    #[test]
    fn test_empty_sum_is_identity() {
        let summed: ConfusionMatrix = std::iter::empty::<ConfusionMatrix>().sum();
        assert_eq!(summed, ConfusionMatrix::default());
    }

    fn matrix_strategy() -> impl Strategy<Value = ConfusionMatrix> {
        (0usize..1000, 0usize..1000, 0usize..1000, 0usize..1000)
            .prop_map(|(tp, tn, fp, fn_)| ConfusionMatrix::new(tp, tn, fp, fn_))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn combine_is_commutative(a in matrix_strategy(), b in matrix_strategy()) {
            prop_assert_eq!(a.combine(&b), b.combine(&a));
        }

        #[test]
        fn combine_is_associative(
            a in matrix_strategy(),
            b in matrix_strategy(),
            c in matrix_strategy(),
        ) {
            prop_assert_eq!(a.combine(&b).combine(&c), a.combine(&b.combine(&c)));
        }

        #[test]
        fn zero_is_identity(a in matrix_strategy()) {
            prop_assert_eq!(a.combine(&ConfusionMatrix::default()), a);
            prop_assert_eq!(ConfusionMatrix::default().combine(&a), a);
        }

        #[test]
        fn total_counts_every_classification(
            pairs in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..200)
        ) {
            let mut cm = ConfusionMatrix::default();
            for &(p, a) in &pairs {
                cm.record(p, a);
            }
            prop_assert_eq!(cm.total(), pairs.len());
        }

        #[test]
        fn defined_rates_are_probabilities(a in matrix_strategy()) {
            let rates = a.rates();
            for rate in [rates.accuracy, rates.false_positive_rate, rates.false_negative_rate, rates.precision]
                .into_iter()
                .flatten()
            {
                prop_assert!((0.0..=1.0).contains(&rate));
            }
        }
    }
}
