//! Deterministic curves: closed-form functions evaluated over an evenly
//! spaced grid.
//!
//! The lake-level figures integrate a sinusoidal inflow analytically and
//! plot the water level `h(t)`. No state, no randomness; the only
//! failure mode is evaluating a function outside its real domain.

use std::f64::consts::PI;

use tracing::debug;

use crate::error::{Error, Result};
use crate::series::CurveSeries;

/// Half-open, evenly spaced grid `start, start + step, …` below `stop`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    start: f64,
    step: f64,
    len: usize,
}

impl Grid {
    /// Grid with `arange` semantics: `ceil((stop − start) / step)` points.
    ///
    /// # Examples
    /// ```
    /// use u_probplot::analytic::Grid;
    /// let grid = Grid::arange(0.0, 10.0, 0.1).unwrap();
    /// assert_eq!(grid.len(), 100);
    /// ```
    ///
    /// # Errors
    /// `InvalidConfiguration` for non-finite bounds, a non-positive step,
    /// or `stop <= start`.
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || !stop.is_finite() || !step.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "grid bounds must be finite, got start={start}, stop={stop}, step={step}"
            )));
        }
        if step <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid step must be positive, got {step}"
            )));
        }
        if stop <= start {
            return Err(Error::InvalidConfiguration(format!(
                "grid is empty: stop={stop} <= start={start}"
            )));
        }
        let len = ((stop - start) / step).ceil() as usize;
        Ok(Self { start, step, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// The i-th point, computed as `start + i·step` (no accumulated drift).
    pub fn point(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(|i| self.point(i))
    }
}

/// Evaluates `f` at every grid point.
///
/// # Errors
/// The first error returned by `f`; `DomainError` if `f` yields a
/// non-finite value.
pub fn evaluate<F>(grid: &Grid, f: F) -> Result<CurveSeries>
where
    F: Fn(f64) -> Result<f64>,
{
    let points = grid
        .points()
        .map(|t| {
            let value = f(t)?;
            if !value.is_finite() {
                return Err(Error::DomainError(format!(
                    "function is not finite at t={t}: {value}"
                )));
            }
            Ok((t, value))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(points = points.len(), "curve evaluated");
    Ok(CurveSeries::from_points(points))
}

/// `base^exponent` restricted to the reals.
///
/// # Errors
/// `DomainError` when `base` is negative and `exponent` is not an
/// integer (a fractional power of a negative number), or when either
/// argument is NaN.
///
/// # Examples
/// ```
/// use u_probplot::analytic::real_power;
/// assert!((real_power(8.0, 1.0 / 3.0).unwrap() - 2.0).abs() < 1e-12);
/// assert!(real_power(-8.0, 1.0 / 3.0).is_err());
/// assert_eq!(real_power(-2.0, 3.0).unwrap(), -8.0);
/// ```
pub fn real_power(base: f64, exponent: f64) -> Result<f64> {
    if base.is_nan() || exponent.is_nan() {
        return Err(Error::DomainError(format!(
            "power of NaN: {base}^{exponent}"
        )));
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(Error::DomainError(format!(
            "fractional power of a negative number: ({base})^{exponent}"
        )));
    }
    Ok(base.powf(exponent))
}

// ============================================================================
// Lake-level closed forms
// ============================================================================

/// Constant of integration in the cubic-outflow lake model.
pub const CUBIC_OUTFLOW_OFFSET: f64 = 1.91;

/// Level of a prismatic lake fed by inflow `2·sin(πt)` with no outflow,
/// starting empty: `h(t) = −2/π·cos(πt) + 2/π`.
///
/// Bounded in `[0, 4/π]`, periodic with period 2.
pub fn sinusoidal_inflow_level(t: f64) -> f64 {
    -2.0 / PI * (t * PI).cos() + 2.0 / PI
}

/// Level of a lake whose surface area grows with depth:
/// `h(t) = (−6/π·cos(πt) + 1.91)^(1/3)`.
///
/// # Errors
/// `DomainError` where the cube-root argument goes negative; with the
/// 1.91 offset the minimum argument is about `1e-4`, so the figure grid
/// stays in the domain.
pub fn cubic_outflow_level(t: f64) -> Result<f64> {
    cubic_level_with_offset(t, CUBIC_OUTFLOW_OFFSET)
}

/// [`cubic_outflow_level`] with an arbitrary integration constant.
pub fn cubic_level_with_offset(t: f64, offset: f64) -> Result<f64> {
    let volume = -3.0 * 2.0 / PI * (t * PI).cos() + offset;
    real_power(volume, 1.0 / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arange_lengths() {
        assert_eq!(Grid::arange(0.0, 10.0, 0.1).unwrap().len(), 100);
        assert_eq!(Grid::arange(0.0, 1.0, 0.3).unwrap().len(), 4);
        assert_eq!(Grid::arange(0.0, 1.0, 1.0).unwrap().len(), 1);
    }

    #[test]
    fn test_arange_invalid() {
        for (a, b, s) in [
            (0.0, 10.0, 0.0),
            (0.0, 10.0, -0.1),
            (10.0, 0.0, 0.1),
            (0.0, f64::INFINITY, 0.1),
            (f64::NAN, 1.0, 0.1),
        ] {
            assert!(
                matches!(Grid::arange(a, b, s), Err(Error::InvalidConfiguration(_))),
                "arange({a}, {b}, {s}) should fail"
            );
        }
    }

    #[test]
    fn test_grid_points_no_drift() {
        let grid = Grid::arange(0.0, 10.0, 0.1).unwrap();
        let last = grid.points().last().unwrap();
        assert!((last - 9.9).abs() < 1e-12);
        assert!(grid.points().all(|t| t < 10.0));
    }

    #[test]
    fn test_sinusoidal_level_bounds() {
        let grid = Grid::arange(0.0, 10.0, 0.1).unwrap();
        let curve = evaluate(&grid, |t| Ok(sinusoidal_inflow_level(t))).unwrap();
        assert_eq!(curve.len(), 100);
        let eps = 1e-12;
        for &(t, h) in curve.points() {
            assert!(
                (-eps..=4.0 / PI + eps).contains(&h),
                "h({t}) = {h} outside [0, 4/π]"
            );
        }
        assert!(sinusoidal_inflow_level(0.0).abs() < 1e-15);
        assert!((sinusoidal_inflow_level(1.0) - 4.0 / PI).abs() < 1e-12);
    }

    #[test]
    fn test_cubic_level_on_figure_grid() {
        let grid = Grid::arange(0.0, 10.0, 0.1).unwrap();
        let curve = evaluate(&grid, cubic_outflow_level).unwrap();
        assert_eq!(curve.len(), 100);
        let (lo, hi) = curve.value_range().unwrap();
        assert!(lo > 0.0 && hi < 2.0, "range ({lo}, {hi})");
    }

    #[test]
    fn test_cubic_level_domain_error() {
        // offset too small: argument negative at t = 0
        let err = cubic_level_with_offset(0.0, 1.0).unwrap_err();
        assert!(matches!(err, Error::DomainError(_)));
    }

    #[test]
    fn test_evaluate_propagates_first_error() {
        let grid = Grid::arange(0.0, 1.0, 0.25).unwrap();
        let err = evaluate(&grid, |t| real_power(t - 0.5, 0.5)).unwrap_err();
        assert!(matches!(err, Error::DomainError(_)));
    }

    #[test]
    fn test_evaluate_rejects_non_finite() {
        let grid = Grid::arange(0.0, 1.0, 0.5).unwrap();
        let err = evaluate(&grid, |t| Ok(1.0 / t)).unwrap_err();
        assert!(matches!(err, Error::DomainError(_)));
    }

    #[test]
    fn test_real_power_nan() {
        assert!(real_power(f64::NAN, 2.0).is_err());
        assert!(real_power(2.0, f64::NAN).is_err());
    }
}
