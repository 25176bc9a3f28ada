//! Empirical-probability convergence runner.
//!
//! Runs a [`TrialSpec`] at each checkpoint and records the fraction of
//! successful draws. Two modes are offered:
//!
//! - [`ConvergenceExperimentRunner::run`]: every checkpoint draws a fresh,
//!   independent batch of exactly `N` outcomes. Checkpoints do not share
//!   draws, so the estimate at `N` is unaffected by earlier checkpoints.
//! - [`ConvergenceExperimentRunner::run_cumulative`]: one running count;
//!   checkpoint `N` reports the ratio over the first `N` draws.
//!
//! Both are deterministic for a fixed seed and checkpoint sequence, and
//! borrow the trial spec and checkpoints immutably.

use rand::Rng;
use tracing::{debug, info};

use crate::checkpoints;
use crate::error::Result;
use crate::series::{ConvergencePoint, ResultSeries};
use crate::trial::{Sampler, TrialSpec};

/// Runs convergence experiments; carries only a label for log output.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceExperimentRunner {
    label: String,
}

impl ConvergenceExperimentRunner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Independent batch per checkpoint.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `checkpoints` is empty, contains zero, or
    /// is not ordered.
    ///
    /// # Examples
    /// ```
    /// use u_probplot::distributions::DiscreteUniform;
    /// use u_probplot::random::create_rng;
    /// use u_probplot::runner::ConvergenceExperimentRunner;
    /// use u_probplot::trial::TrialSpec;
    ///
    /// let spec = TrialSpec::new(DiscreteUniform::new(1, 6).unwrap(), |&f: &i64| f == 2);
    /// let runner = ConvergenceExperimentRunner::new("die");
    /// let series = runner.run(&spec, &[10, 100, 1000], &mut create_rng(999)).unwrap();
    /// assert_eq!(series.len(), 3);
    /// ```
    pub fn run<S, P, R>(
        &self,
        spec: &TrialSpec<S, P>,
        checkpoints: &[u64],
        rng: &mut R,
    ) -> Result<ResultSeries>
    where
        S: Sampler,
        P: Fn(&S::Outcome) -> bool,
        R: Rng + ?Sized,
    {
        checkpoints::validate(checkpoints)?;

        let mut series = ResultSeries::with_capacity(checkpoints.len());
        for &n in checkpoints {
            let successes = spec.count_successes(n, rng);
            let point = ConvergencePoint::from_counts(n, successes);
            debug!(
                experiment = %self.label,
                draws = n,
                successes,
                probability = point.probability,
                "checkpoint"
            );
            series.push(point);
        }

        self.log_done(&series, "independent");
        Ok(series)
    }

    /// Running count across checkpoints: checkpoint `N` covers draws
    /// `1..=N` of a single stream.
    ///
    /// # Errors
    /// Same conditions as [`run`](Self::run).
    pub fn run_cumulative<S, P, R>(
        &self,
        spec: &TrialSpec<S, P>,
        checkpoints: &[u64],
        rng: &mut R,
    ) -> Result<ResultSeries>
    where
        S: Sampler,
        P: Fn(&S::Outcome) -> bool,
        R: Rng + ?Sized,
    {
        checkpoints::validate(checkpoints)?;

        let mut series = ResultSeries::with_capacity(checkpoints.len());
        let mut drawn = 0u64;
        let mut successes = 0u64;
        for &n in checkpoints {
            // ordered, so n >= drawn
            successes += spec.count_successes(n - drawn, rng);
            drawn = n;
            series.push(ConvergencePoint::from_counts(n, successes));
        }
        debug!(experiment = %self.label, draws = drawn, successes, "stream exhausted");

        self.log_done(&series, "cumulative");
        Ok(series)
    }

    fn log_done(&self, series: &ResultSeries, mode: &str) {
        if let Some(last) = series.last() {
            info!(
                experiment = %self.label,
                mode,
                checkpoints = series.len(),
                final_draws = last.sample_count,
                final_probability = last.probability,
                "convergence run complete"
            );
        }
    }
}
