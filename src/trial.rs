//! Trial specifications: a sampling procedure paired with a success
//! predicate.
//!
//! A [`TrialSpec`] describes one Monte-Carlo experiment, e.g. "roll a
//! fair die, success when the face is 2". The sampling side is any
//! [`Sampler`]; every distribution in [`crate::distributions`] is one,
//! and composite procedures (several dependent draws per outcome)
//! implement it directly.

use std::fmt;

use rand::Rng;

/// Capability to draw one outcome from a random source.
///
/// Implementations must draw all their randomness from `rng` so that a
/// seeded generator reproduces the same outcome sequence.
pub trait Sampler {
    type Outcome;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Outcome;
}

/// Immutable pairing of a sampler and a success predicate.
///
/// # Examples
/// ```
/// use u_probplot::distributions::DiscreteUniform;
/// use u_probplot::random::create_rng;
/// use u_probplot::trial::TrialSpec;
///
/// let die = DiscreteUniform::new(1, 6).unwrap();
/// let spec = TrialSpec::new(die, |&face: &i64| face == 2);
/// let mut rng = create_rng(999);
/// let hits = spec.count_successes(600, &mut rng);
/// assert!(hits <= 600);
/// ```
pub struct TrialSpec<S, P> {
    sampler: S,
    predicate: P,
}

impl<S, P> TrialSpec<S, P>
where
    S: Sampler,
    P: Fn(&S::Outcome) -> bool,
{
    pub fn new(sampler: S, predicate: P) -> Self {
        Self { sampler, predicate }
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Draws a single outcome and reports whether it is a success.
    pub fn trial<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let outcome = self.sampler.sample(rng);
        (self.predicate)(&outcome)
    }

    /// Draws `draws` outcomes and counts the successes. Outcomes are
    /// reduced immediately and never retained.
    pub fn count_successes<R: Rng + ?Sized>(&self, draws: u64, rng: &mut R) -> u64 {
        let mut successes = 0u64;
        for _ in 0..draws {
            if self.trial(rng) {
                successes += 1;
            }
        }
        successes
    }
}

impl<S: fmt::Debug, P> fmt::Debug for TrialSpec<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrialSpec")
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Binomial, DiscreteUniform};
    use crate::random::create_rng;

    #[test]
    fn test_always_and_never_predicates() {
        let die = DiscreteUniform::new(1, 6).unwrap();
        let always = TrialSpec::new(die.clone(), |_: &i64| true);
        let never = TrialSpec::new(die, |_: &i64| false);
        let mut rng = create_rng(1);
        assert_eq!(always.count_successes(250, &mut rng), 250);
        assert_eq!(never.count_successes(250, &mut rng), 0);
    }

    #[test]
    fn test_count_zero_draws() {
        let spec = TrialSpec::new(Binomial::new(3, 0.5).unwrap(), |&k: &u64| k == 3);
        let mut rng = create_rng(1);
        assert_eq!(spec.count_successes(0, &mut rng), 0);
    }

    #[test]
    fn test_same_seed_same_count() {
        let spec = TrialSpec::new(DiscreteUniform::new(1, 6).unwrap(), |&f: &i64| f == 2);
        let a = spec.count_successes(1000, &mut create_rng(999));
        let b = spec.count_successes(1000, &mut create_rng(999));
        assert_eq!(a, b);
    }

    #[test]
    fn test_debug_shows_sampler() {
        let spec = TrialSpec::new(DiscreteUniform::new(1, 6).unwrap(), |&f: &i64| f == 2);
        let dbg = format!("{spec:?}");
        assert!(dbg.contains("DiscreteUniform"));
    }
}
