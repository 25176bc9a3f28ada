//! Result series produced by a convergence run, and the curve series
//! produced by analytic evaluation.

use crate::stats;

/// Empirical probability recorded at one checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePoint {
    pub sample_count: u64,
    pub probability: f64,
}

impl ConvergencePoint {
    /// `successes / sample_count`. `sample_count` is validated positive
    /// by the caller.
    pub(crate) fn from_counts(sample_count: u64, successes: u64) -> Self {
        Self {
            sample_count,
            probability: successes as f64 / sample_count as f64,
        }
    }
}

/// Ordered `(sample_count, empirical_probability)` pairs, one per
/// checkpoint, in checkpoint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSeries {
    points: Vec<ConvergencePoint>,
}

impl ResultSeries {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, point: ConvergencePoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ConvergencePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConvergencePoint> {
        self.points.iter()
    }

    pub fn sample_counts(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.sample_count).collect()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.probability).collect()
    }

    pub fn last(&self) -> Option<&ConvergencePoint> {
        self.points.last()
    }

    /// Spread and error of the estimates against a theoretical value.
    ///
    /// Returns `None` for an empty series.
    pub fn summarize(&self, theoretical: f64) -> Option<ConvergenceSummary> {
        let probs = self.probabilities();
        Some(ConvergenceSummary {
            theoretical,
            mean: stats::mean(&probs)?,
            std_dev: stats::std_dev(&probs),
            rms_error: stats::rms_deviation(&probs, theoretical)?,
            max_abs_error: stats::max_abs_deviation(&probs, theoretical)?,
            final_error: (self.last()?.probability - theoretical).abs(),
        })
    }
}

impl<'a> IntoIterator for &'a ResultSeries {
    type Item = &'a ConvergencePoint;
    type IntoIter = std::slice::Iter<'a, ConvergencePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// How closely a [`ResultSeries`] tracks its theoretical probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceSummary {
    pub theoretical: f64,
    pub mean: f64,
    /// `None` for a single-point series.
    pub std_dev: Option<f64>,
    pub rms_error: f64,
    pub max_abs_error: f64,
    /// Error at the largest checkpoint.
    pub final_error: f64,
}

/// `(t, value)` samples of an analytic function over a grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSeries {
    points: Vec<(f64, f64)>,
}

impl CurveSeries {
    pub(crate) fn from_points(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, v)| v)
    }

    /// `(min, max)` of the values; `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.values().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(u64, u64)]) -> ResultSeries {
        let mut s = ResultSeries::with_capacity(points.len());
        for &(n, k) in points {
            s.push(ConvergencePoint::from_counts(n, k));
        }
        s
    }

    #[test]
    fn test_from_counts_ratio() {
        let p = ConvergencePoint::from_counts(1000, 167);
        assert_eq!(p.sample_count, 1000);
        assert!((p.probability - 0.167).abs() < 1e-15);
    }

    #[test]
    fn test_accessors_preserve_order() {
        let s = series(&[(10, 1), (100, 20), (1000, 170)]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.sample_counts(), vec![10, 100, 1000]);
        assert_eq!(s.probabilities(), vec![0.1, 0.2, 0.17]);
        assert_eq!(s.last().unwrap().sample_count, 1000);
        assert_eq!((&s).into_iter().count(), 3);
    }

    #[test]
    fn test_summarize() {
        let s = series(&[(10, 1), (10, 3)]);
        let summary = s.summarize(0.2).unwrap();
        assert!((summary.mean - 0.2).abs() < 1e-12);
        assert!((summary.rms_error - 0.1).abs() < 1e-12);
        assert!((summary.max_abs_error - 0.1).abs() < 1e-12);
        assert!((summary.final_error - 0.1).abs() < 1e-12);
        assert!(summary.std_dev.is_some());
    }

    #[test]
    fn test_summarize_empty() {
        assert!(ResultSeries::default().summarize(0.5).is_none());
    }

    #[test]
    fn test_curve_value_range() {
        let c = CurveSeries::from_points(vec![(0.0, 1.0), (0.1, -2.0), (0.2, 3.0)]);
        assert_eq!(c.value_range(), Some((-2.0, 3.0)));
        assert_eq!(CurveSeries::default().value_range(), None);
    }
}
