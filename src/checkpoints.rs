//! Checkpoint sequences: the sample counts at which an experiment
//! records its empirical probability.
//!
//! A valid sequence is non-empty, strictly positive, and ordered
//! (non-decreasing). Repeats are allowed: truncating a logarithmic
//! spacing to integers produces runs such as `10, 10, 10, 11, …` at the
//! low end, and each repeat is an independent batch of the same size.

use std::ops::Deref;

use crate::error::{Error, Result};

/// Validated, ordered sequence of positive sample counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoints(Vec<u64>);

impl Checkpoints {
    /// Wraps an explicit list of sample counts.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `counts` is empty, contains zero, or
    /// decreases anywhere.
    pub fn new(counts: Vec<u64>) -> Result<Self> {
        validate(&counts)?;
        Ok(Self(counts))
    }

    /// `num` counts spaced evenly in log₁₀ from `10^start_exp` to
    /// `10^stop_exp` inclusive, each truncated toward zero.
    ///
    /// # Examples
    /// ```
    /// use u_probplot::checkpoints::Checkpoints;
    /// let cp = Checkpoints::logspace(1.0, 3.0, 3).unwrap();
    /// assert_eq!(cp.as_slice(), &[10, 100, 1000]);
    /// ```
    ///
    /// # Errors
    /// `InvalidConfiguration` if `num == 0`, an exponent is not finite,
    /// `start_exp > stop_exp`, or the smallest count truncates to zero.
    pub fn logspace(start_exp: f64, stop_exp: f64, num: usize) -> Result<Self> {
        if num == 0 {
            return Err(Error::InvalidConfiguration(
                "logspace needs at least one point".into(),
            ));
        }
        if !start_exp.is_finite() || !stop_exp.is_finite() || start_exp > stop_exp {
            return Err(Error::InvalidConfiguration(format!(
                "logspace requires finite start <= stop, got {start_exp}..{stop_exp}"
            )));
        }
        let step = if num > 1 {
            (stop_exp - start_exp) / (num - 1) as f64
        } else {
            0.0
        };
        let counts = (0..num)
            .map(|i| {
                let exp = if i + 1 == num && num > 1 {
                    stop_exp
                } else {
                    start_exp + i as f64 * step
                };
                truncate_count(10f64.powf(exp))
            })
            .collect();
        Self::new(counts)
    }

    /// Every multiple of `step` strictly below `end`: `step, 2·step, …`.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `step == 0` or `end <= step`.
    pub fn stride(step: u64, end: u64) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidConfiguration(
                "stride step must be positive".into(),
            ));
        }
        let counts: Vec<u64> = (1..).map(|k| k * step).take_while(|&n| n < end).collect();
        Self::new(counts)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Largest count (the last entry).
    pub fn max_count(&self) -> u64 {
        // validated non-empty and non-decreasing
        self.0[self.0.len() - 1]
    }

    /// Total draws an independent-batch run will consume.
    pub fn total_draws(&self) -> u64 {
        self.0.iter().sum()
    }
}

impl Deref for Checkpoints {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

impl AsRef<[u64]> for Checkpoints {
    fn as_ref(&self) -> &[u64] {
        &self.0
    }
}

/// Checks a raw checkpoint slice.
///
/// # Errors
/// `InvalidConfiguration` if the slice is empty, holds a zero, or is not
/// ordered.
pub fn validate(counts: &[u64]) -> Result<()> {
    if counts.is_empty() {
        return Err(Error::InvalidConfiguration(
            "checkpoint sequence is empty".into(),
        ));
    }
    if let Some(pos) = counts.iter().position(|&n| n == 0) {
        return Err(Error::InvalidConfiguration(format!(
            "checkpoint {pos} is zero; sample counts must be positive"
        )));
    }
    if let Some(pos) = counts.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::InvalidConfiguration(format!(
            "checkpoints must be ordered: {} follows {} at position {}",
            counts[pos + 1],
            counts[pos],
            pos + 1
        )));
    }
    Ok(())
}

/// Integer part of a positive sample size. Values within rounding noise
/// below an integer (e.g. 999.9999999999) count as that integer.
fn truncate_count(value: f64) -> u64 {
    let nearest = value.round();
    if (value - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest as u64
    } else {
        value.trunc() as u64
    }
}
