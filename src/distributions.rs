//! Discrete probability distributions.
//!
//! Each type validates its parameters on construction, evaluates its
//! probability mass function in closed form, and implements
//! [`Sampler`] so it can drive a Monte-Carlo trial.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Outcome | Mean | Variance |
//! |---|---|---|---|---|
//! | [`DiscreteUniform`] | low, high (inclusive) | `i64` | (a+b)/2 | ((b−a+1)²−1)/12 |
//! | [`Bernoulli`] | θ | `bool` | θ | θ(1−θ) |
//! | [`Binomial`] | n, θ | `u64` | nθ | nθ(1−θ) |
//! | [`Categorical`] | p₁…pₘ | `usize` | — | — |
//! | [`Multinomial`] | n, p₁…pₘ | `Vec<u64>` | n·pᵢ | n·pᵢ(1−pᵢ) |
//!
//! # Design Notes
//!
//! Parameters are plain numbers; there is no notion of "die", "coin" or
//! "tournament" here. Those live in [`crate::figures`].

use rand::Rng;
use thiserror::Error;

use crate::random::WeightedSampler;
use crate::special;
use crate::trial::Sampler;

/// Probability vectors must sum to one within this tolerance.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-8;

/// Error type for invalid distribution parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

fn check_probability(name: &str, theta: f64) -> Result<(), DistributionError> {
    if !theta.is_finite() || !(0.0..=1.0).contains(&theta) {
        return Err(DistributionError::InvalidParameters(format!(
            "{name} requires 0 <= theta <= 1, got theta={theta}"
        )));
    }
    Ok(())
}

fn check_probability_vector(name: &str, pvals: &[f64]) -> Result<(), DistributionError> {
    if pvals.is_empty() {
        return Err(DistributionError::InvalidParameters(format!(
            "{name} requires at least one category"
        )));
    }
    if let Some(p) = pvals.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(DistributionError::InvalidParameters(format!(
            "{name} probabilities must be finite and non-negative, got {p}"
        )));
    }
    let total: f64 = pvals.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(DistributionError::InvalidParameters(format!(
            "{name} probabilities must sum to 1, got {total}"
        )));
    }
    Ok(())
}

// ============================================================================
// Discrete Uniform
// ============================================================================

/// Uniform distribution over the integers `low..=high`.
///
/// A fair six-sided die is `DiscreteUniform::new(1, 6)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteUniform {
    low: i64,
    high: i64,
}

impl DiscreteUniform {
    /// # Errors
    /// Returns `Err` if `low > high`, or if the support (`2⁶⁴` values for
    /// the full `i64` range) does not fit in a `u64`.
    pub fn new(low: i64, high: i64) -> Result<Self, DistributionError> {
        if low > high {
            return Err(DistributionError::InvalidParameters(format!(
                "DiscreteUniform requires low <= high, got low={low}, high={high}"
            )));
        }
        if high.abs_diff(low) == u64::MAX {
            return Err(DistributionError::InvalidParameters(format!(
                "DiscreteUniform support {low}..={high} has more than u64::MAX values"
            )));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    /// Number of equally likely outcomes.
    pub fn support_size(&self) -> u64 {
        self.high.abs_diff(self.low) + 1
    }

    pub fn mean(&self) -> f64 {
        (self.low as f64 + self.high as f64) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let m = self.support_size() as f64;
        (m * m - 1.0) / 12.0
    }

    /// P(X = k) = 1/(high−low+1) inside the support, 0 outside.
    pub fn pmf(&self, k: i64) -> f64 {
        if (self.low..=self.high).contains(&k) {
            1.0 / self.support_size() as f64
        } else {
            0.0
        }
    }
}

impl Sampler for DiscreteUniform {
    type Outcome = i64;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.low..=self.high)
    }
}

// ============================================================================
// Bernoulli
// ============================================================================

/// Single trial with success probability θ.
#[derive(Debug, Clone, PartialEq)]
pub struct Bernoulli {
    theta: f64,
}

impl Bernoulli {
    /// # Errors
    /// Returns `Err` if θ is not in `[0, 1]`.
    pub fn new(theta: f64) -> Result<Self, DistributionError> {
        check_probability("Bernoulli", theta)?;
        Ok(Self { theta })
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn mean(&self) -> f64 {
        self.theta
    }

    pub fn variance(&self) -> f64 {
        self.theta * (1.0 - self.theta)
    }

    pub fn pmf(&self, success: bool) -> f64 {
        if success {
            self.theta
        } else {
            1.0 - self.theta
        }
    }
}

impl Sampler for Bernoulli {
    type Outcome = bool;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        // random() is in [0, 1): theta = 0 never succeeds, theta = 1 always does
        rng.random::<f64>() < self.theta
    }
}

// ============================================================================
// Binomial
// ============================================================================

/// Number of successes in `n` independent Bernoulli(θ) trials.
///
/// # Mathematical Definition
/// - PMF: P(X = k) = C(n, k) θᵏ (1−θ)ⁿ⁻ᵏ
/// - Mean: nθ
/// - Variance: nθ(1−θ)
///
/// # Examples
/// ```
/// use u_probplot::distributions::Binomial;
/// // three fair coin tosses, all heads
/// let b = Binomial::new(3, 0.5).unwrap();
/// assert!((b.pmf(3) - 0.125).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Binomial {
    n: u64,
    trial: Bernoulli,
}

impl Binomial {
    /// # Errors
    /// Returns `Err` if θ is not in `[0, 1]`.
    pub fn new(n: u64, theta: f64) -> Result<Self, DistributionError> {
        check_probability("Binomial", theta)?;
        Ok(Self {
            n,
            trial: Bernoulli { theta },
        })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn theta(&self) -> f64 {
        self.trial.theta
    }

    pub fn mean(&self) -> f64 {
        self.n as f64 * self.theta()
    }

    pub fn variance(&self) -> f64 {
        self.n as f64 * self.trial.variance()
    }

    /// P(X = k), evaluated in log space.
    pub fn pmf(&self, k: u64) -> f64 {
        if k > self.n {
            return 0.0;
        }
        let theta = self.theta();
        // 0⁰ = 1 at the boundary thetas
        if theta == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if theta == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        let ln_p = special::ln_binomial_coefficient(self.n, k)
            + k as f64 * theta.ln()
            + (self.n - k) as f64 * (1.0 - theta).ln();
        ln_p.exp()
    }
}

impl Sampler for Binomial {
    type Outcome = u64;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        (0..self.n).filter(|_| self.trial.sample(rng)).count() as u64
    }
}

// ============================================================================
// Categorical
// ============================================================================

/// One draw over `m` categories with probabilities `p₁…pₘ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    pvals: Vec<f64>,
    table: WeightedSampler,
}

impl Categorical {
    /// # Errors
    /// Returns `Err` if `pvals` is empty, holds a negative or non-finite
    /// value, or does not sum to 1.
    pub fn new(pvals: &[f64]) -> Result<Self, DistributionError> {
        check_probability_vector("Categorical", pvals)?;
        let table = WeightedSampler::new(pvals).ok_or_else(|| {
            DistributionError::InvalidParameters("Categorical weights are degenerate".into())
        })?;
        Ok(Self {
            pvals: pvals.to_vec(),
            table,
        })
    }

    pub fn pvals(&self) -> &[f64] {
        &self.pvals
    }

    pub fn categories(&self) -> usize {
        self.pvals.len()
    }

    pub fn pmf(&self, category: usize) -> f64 {
        self.pvals.get(category).copied().unwrap_or(0.0)
    }
}

impl Sampler for Categorical {
    type Outcome = usize;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.table.sample(rng)
    }
}

// ============================================================================
// Multinomial
// ============================================================================

/// Category counts after `n` independent categorical draws.
///
/// # Mathematical Definition
/// - PMF: P(X = k) = n! / (k₁!⋯kₘ!) · p₁^k₁ ⋯ pₘ^kₘ, with Σkᵢ = n
///
/// # Examples
/// ```
/// use u_probplot::distributions::Multinomial;
/// // 12 games: player 1 wins 7, player 2 wins 2, 3 ties
/// let m = Multinomial::new(12, &[0.4, 0.35, 0.25]).unwrap();
/// assert!((m.pmf(&[7, 2, 3]) - 0.0248).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Multinomial {
    n: u64,
    categorical: Categorical,
}

impl Multinomial {
    /// # Errors
    /// Same conditions as [`Categorical::new`].
    pub fn new(n: u64, pvals: &[f64]) -> Result<Self, DistributionError> {
        check_probability_vector("Multinomial", pvals)?;
        Ok(Self {
            n,
            categorical: Categorical::new(pvals)?,
        })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn pvals(&self) -> &[f64] {
        self.categorical.pvals()
    }

    /// Expected count per category, n·pᵢ.
    pub fn mean(&self) -> Vec<f64> {
        self.pvals().iter().map(|p| self.n as f64 * p).collect()
    }

    /// P(X = counts). Zero when the counts have the wrong length or do
    /// not sum to `n`.
    pub fn pmf(&self, counts: &[u64]) -> f64 {
        let pvals = self.pvals();
        if counts.len() != pvals.len() {
            return 0.0;
        }
        let total = counts.iter().try_fold(0u64, |acc, &k| acc.checked_add(k));
        if total != Some(self.n) {
            return 0.0;
        }
        let mut ln_p = special::ln_multinomial_coefficient(counts);
        for (&k, &p) in counts.iter().zip(pvals) {
            if k == 0 {
                continue;
            }
            if p == 0.0 {
                return 0.0;
            }
            ln_p += k as f64 * p.ln();
        }
        ln_p.exp()
    }
}

impl Sampler for Multinomial {
    type Outcome = Vec<u64>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u64> {
        let mut counts = vec![0u64; self.categorical.categories()];
        for _ in 0..self.n {
            counts[self.categorical.sample(rng)] += 1;
        }
        counts
    }
}

// ============================================================================
// Tests
// ============================================================================
