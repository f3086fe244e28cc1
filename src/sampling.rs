//! Bias-reduction sampling.
//!
//! Simulates a world with less arrest bias by assuming a fraction `p` of a
//! group's recorded events never happened: `floor((1 - p) * n)` of the `n`
//! events are kept, drawn uniformly without replacement. Collections are
//! multisets, so positions are sampled and a repeated id can be kept up to
//! its multiplicity.

use crate::error::{BiasError, Result};
use crate::events::GroupEvents;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Creates the run's random source: seeded when `seed` is given, otherwise
/// from OS entropy.
#[must_use]
pub fn simulation_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform subsampler at a fixed bias-reduction fraction.
///
/// # Examples
///
/// ```
/// use arrest_bias::sampling::BiasSampler;
/// use rand::SeedableRng;
///
/// let sampler = BiasSampler::new(0.25).unwrap();
/// let events: Vec<String> = ["a", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
///
/// let kept = sampler.sample(&events, &mut rng);
/// assert_eq!(kept.len(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiasSampler {
    fraction: f64,
}

impl BiasSampler {
    /// Creates a sampler that removes `fraction` of the events.
    ///
    /// # Errors
    ///
    /// Returns an error unless `fraction` is in `[0, 1)`.
    pub fn new(fraction: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(BiasError::invalid_config(
                "bias_fraction",
                fraction,
                "a value in [0, 1)",
            ));
        }
        Ok(Self { fraction })
    }

    /// The bias-reduction fraction.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Number of events kept out of `n`.
    #[must_use]
    pub fn keep_count(&self, n: usize) -> usize {
        ((1.0 - self.fraction) * n as f64).floor() as usize
    }

    /// Draws `keep_count(events.len())` events without replacement.
    ///
    /// The input is not modified; the result is in sampling order.
    pub fn sample<T, R>(&self, events: &[T], rng: &mut R) -> Vec<T>
    where
        T: Clone,
        R: Rng + ?Sized,
    {
        let keep = self.keep_count(events.len());
        if keep == 0 {
            return Vec::new();
        }

        rand::seq::index::sample(rng, events.len(), keep)
            .into_iter()
            .map(|i| events[i].clone())
            .collect()
    }

    /// Applies the fraction to both the prior-offense and the recidivism
    /// collections, returning a derived event set.
    pub fn sample_events<R: Rng + ?Sized>(&self, events: &GroupEvents, rng: &mut R) -> GroupEvents {
        let derived = GroupEvents::new(
            self.sample(&events.priors, rng),
            self.sample(&events.recidivism, rng),
        );

        debug!(
            fraction = self.fraction,
            priors_before = events.priors.len(),
            priors_after = derived.priors.len(),
            recidivism_before = events.recidivism.len(),
            recidivism_after = derived.recidivism.len(),
            "sampled group events"
        );
        derived
    }
}
