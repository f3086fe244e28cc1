//! Per-group event collections.
//!
//! A defendant with `k` recorded priors contributes `k` entries of its id to
//! [`GroupEvents::priors`]; a defendant who recidivated contributes one entry
//! to [`GroupEvents::recidivism`]. Sampling (see [`crate::sampling`]) derives a
//! smaller `GroupEvents` and leaves the original untouched.

use crate::data::Cohort;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Prior-offense and recidivism events of one demographic group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupEvents {
    /// Prior-offense events (multiset of ids)
    pub priors: Vec<String>,
    /// Recidivism events (ids)
    pub recidivism: Vec<String>,
}

impl GroupEvents {
    /// Creates event collections directly.
    #[must_use]
    pub fn new(priors: Vec<String>, recidivism: Vec<String>) -> Self {
        Self { priors, recidivism }
    }

    /// Expands the cohort rows whose race equals `group` into events.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrest_bias::data::{Cohort, DefendantRecord};
    /// use arrest_bias::events::GroupEvents;
    ///
    /// let cohort = Cohort::new(vec![
    ///     DefendantRecord::new("a", "African-American", 2, 5, true),
    ///     DefendantRecord::new("b", "Caucasian", 3, 4, true),
    /// ]);
    /// let events = GroupEvents::extract(&cohort, "African-American");
    /// assert_eq!(events.priors, vec!["a", "a"]);
    /// assert_eq!(events.recidivism, vec!["a"]);
    /// ```
    #[must_use]
    pub fn extract(cohort: &Cohort, group: &str) -> Self {
        let mut priors = Vec::new();
        let mut recidivism = Vec::new();

        for record in cohort.group(group) {
            priors.extend(std::iter::repeat(record.id.clone()).take(record.priors_count as usize));
            if record.two_year_recid {
                recidivism.push(record.id.clone());
            }
        }

        Self { priors, recidivism }
    }

    /// Multiplicity of every id in the prior-offense multiset.
    #[must_use]
    pub fn prior_counts(&self) -> HashMap<&str, u32> {
        let mut counts = HashMap::new();
        for id in &self.priors {
            *counts.entry(id.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Ids present in the recidivism collection.
    #[must_use]
    pub fn recidivated(&self) -> HashSet<&str> {
        self.recidivism.iter().map(String::as_str).collect()
    }
}

/// Counts describing one group of the cohort.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Group label
    pub group: String,
    /// Defendants in the group
    pub defendants: usize,
    /// Prior-offense events
    pub prior_events: usize,
    /// Recidivism events
    pub recidivism_events: usize,
}

impl GroupSummary {
    /// Summarizes a group's events.
    #[must_use]
    pub fn new(group: &str, defendants: usize, events: &GroupEvents) -> Self {
        Self {
            group: group.to_string(),
            defendants,
            prior_events: events.priors.len(),
            recidivism_events: events.recidivism.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DefendantRecord;
    use proptest::prelude::*;

    const STUDY: &str = "African-American";
    const REFERENCE: &str = "Caucasian";

    fn cohort() -> Cohort {
        Cohort::new(vec![
            DefendantRecord::new("1", STUDY, 3, 6, true),
            DefendantRecord::new("2", REFERENCE, 5, 7, true),
            DefendantRecord::new("3", STUDY, 0, 1, false),
            DefendantRecord::new("4", STUDY, 1, 3, true),
        ])
    }

    #[test]
    fn test_extract_multiplicity_matches_priors() {
        let events = GroupEvents::extract(&cohort(), STUDY);
        let counts = events.prior_counts();
        assert_eq!(events.priors.len(), 4);
        assert_eq!(counts.get("1"), Some(&3));
        assert_eq!(counts.get("4"), Some(&1));
        assert_eq!(counts.get("2"), None);
    }

    #[test]
    fn test_extract_recidivism_once_per_defendant() {
        let events = GroupEvents::extract(&cohort(), STUDY);
        assert_eq!(events.recidivism, vec!["1".to_string(), "4".to_string()]);
        let recidivated = events.recidivated();
        assert!(recidivated.contains("1"));
        assert!(!recidivated.contains("3"));
    }

    #[test]
    fn test_extract_unknown_group_is_empty() {
        let events = GroupEvents::extract(&cohort(), "Other");
        assert_eq!(events, GroupEvents::default());
    }

    #[test]
    fn test_prior_counts_map() {
        let events = GroupEvents::extract(&cohort(), STUDY);
        let counts = events.prior_counts();
        assert_eq!(counts.get("1"), Some(&3));
        assert_eq!(counts.get("4"), Some(&1));
        assert_eq!(counts.get("3"), None);
        assert_eq!(events.recidivated().len(), 2);
    }

    #[test]
    fn test_extract_does_not_touch_cohort() {
        let cohort = cohort();
        let before = cohort.clone();
        let _ = GroupEvents::extract(&cohort, STUDY);
        assert_eq!(cohort, before);
    }

    #[test]
    fn test_group_summary() {
        let events = GroupEvents::extract(&cohort(), STUDY);
        let summary = GroupSummary::new(STUDY, 3, &events);
        assert_eq!(summary.prior_events, 4);
        assert_eq!(summary.recidivism_events, 2);
    }

    proptest! {
        #[test]
        fn extract_totals_match_group(
            rows in proptest::collection::vec((0u32..12, any::<bool>(), any::<bool>()), 0..30)
        ) {
            let records: Vec<DefendantRecord> = rows
                .iter()
                .enumerate()
                .map(|(i, &(priors, recid, study))| {
                    let race = if study { STUDY } else { REFERENCE };
                    DefendantRecord::new(i.to_string(), race, priors, 5, recid)
                })
                .collect();
            let cohort = Cohort::new(records);
            let events = GroupEvents::extract(&cohort, STUDY);

            let expected_priors: u32 = cohort.group(STUDY).map(|r| r.priors_count).sum();
            let expected_recid = cohort.group(STUDY).filter(|r| r.two_year_recid).count();
            prop_assert_eq!(events.priors.len() as u32, expected_priors);
            prop_assert_eq!(events.recidivism.len(), expected_recid);
            let counts = events.prior_counts();
            for record in cohort.group(STUDY) {
                let count = counts.get(record.id.as_str()).copied().unwrap_or(0);
                prop_assert_eq!(count, record.priors_count);
            }
        }
    }
}
