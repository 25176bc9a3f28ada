//! Catalog of blog figures.
//!
//! Every figure is defined by literal constants: distribution
//! parameters, checkpoint ranges and axis labels. [`FigureId::build`]
//! runs the computation and returns a [`Figure`] ready for a
//! [`crate::render::Renderer`].
//!
//! Each figure draws from its own generator, seeded from the run seed
//! and the figure's stream index, so rendering one figure alone gives
//! the same picture as rendering the whole catalog.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rand::Rng;
use tracing::info;

use crate::analytic::{self, Grid};
use crate::checkpoints::Checkpoints;
use crate::distributions::{Bernoulli, Binomial, DiscreteUniform, Multinomial};
use crate::error::{Error, Result};
use crate::random::{create_rng, derive_seed};
use crate::runner::ConvergenceExperimentRunner;
use crate::series::{ConvergenceSummary, CurveSeries, ResultSeries};
use crate::trial::{Sampler, TrialSpec};

/// Seed used for the published figures.
pub const DEFAULT_SEED: u64 = 999;

/// Wide landscape canvas used by the convergence charts.
const WIDE: (u32, u32) = (1500, 500);
/// Default canvas for bar charts and curves.
const STANDARD: (u32, u32) = (640, 480);

// ============================================================================
// Figure description
// ============================================================================

/// Data handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureData {
    /// Empirical probabilities with the theoretical value as a reference line.
    Convergence {
        series: ResultSeries,
        theoretical: f64,
    },
    /// One bar per outcome `0, 1, …`.
    Bars { heights: Vec<f64> },
    /// Analytic curve drawn with hollow markers.
    Curve { series: CurveSeries },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub x: String,
    pub y: String,
    pub title: Option<String>,
}

impl Labels {
    fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            title: None,
        }
    }

    fn titled(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }
}

/// Axis and canvas settings. `None` ranges are fitted to the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub size: (u32, u32),
    pub x_range: Option<Range<f64>>,
    pub y_range: Option<Range<f64>>,
    pub log_x: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            size: STANDARD,
            x_range: None,
            y_range: None,
            log_x: false,
        }
    }
}

/// A computed figure: what to draw, how to label it, where to save it.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub id: FigureId,
    pub data: FigureData,
    pub labels: Labels,
    pub style: ChartStyle,
}

impl Figure {
    /// Output file stem.
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Error of the empirical series against its theoretical value;
    /// `None` for bar and curve figures.
    pub fn convergence_summary(&self) -> Option<ConvergenceSummary> {
        match &self.data {
            FigureData::Convergence {
                series,
                theoretical,
            } => series.summarize(*theoretical),
            FigureData::Bars { .. } | FigureData::Curve { .. } => None,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureId {
    /// P(die shows 2), independent batches.
    Uniform,
    /// P(die shows 1 or 2), independent batches.
    Bernoulli,
    /// P(tournament ends 7 / 2 / 3), independent batches.
    Multinomial,
    /// P(arrive on time) with a running count.
    Experiment,
    /// Fair-die PMF bars.
    Discrete,
    /// Four-outcome PMF bars.
    Student,
    /// Lake level under sinusoidal inflow.
    Analytical1,
    /// Lake level with depth-dependent surface area.
    Analytical2,
}

impl FigureId {
    pub const ALL: [FigureId; 8] = [
        FigureId::Uniform,
        FigureId::Bernoulli,
        FigureId::Multinomial,
        FigureId::Experiment,
        FigureId::Discrete,
        FigureId::Student,
        FigureId::Analytical1,
        FigureId::Analytical2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FigureId::Uniform => "uniform",
            FigureId::Bernoulli => "bernoulli",
            FigureId::Multinomial => "multinomial",
            FigureId::Experiment => "experiment",
            FigureId::Discrete => "discrete",
            FigureId::Student => "student",
            FigureId::Analytical1 => "analytical1",
            FigureId::Analytical2 => "analytical2",
        }
    }

    fn stream(self) -> u64 {
        self as u64
    }

    /// Computes the figure with a generator derived from `seed`.
    pub fn build(self, seed: u64) -> Result<Figure> {
        let mut rng = create_rng(derive_seed(seed, self.stream()));
        let figure = match self {
            FigureId::Uniform => die_face_two(&mut rng)?,
            FigureId::Bernoulli => die_one_or_two(&mut rng)?,
            FigureId::Multinomial => tournament(&mut rng)?,
            FigureId::Experiment => commute(&mut rng)?,
            FigureId::Discrete => pmf_bars(self, vec![0.167; 6], false),
            FigureId::Student => pmf_bars(
                self,
                vec![1.0 / 12.0, 5.0 / 12.0, 5.0 / 12.0, 1.0 / 12.0],
                true,
            ),
            FigureId::Analytical1 => {
                lake_curve(self, |t| Ok(analytic::sinusoidal_inflow_level(t)))?
            }
            FigureId::Analytical2 => lake_curve(self, analytic::cubic_outflow_level)?,
        };
        info!(figure = self.name(), "figure computed");
        Ok(figure)
    }
}

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FigureId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FigureId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = FigureId::ALL.iter().map(|id| id.name()).collect();
                Error::InvalidConfiguration(format!(
                    "unknown figure '{s}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Builds every figure in catalog order.
pub fn build_all(seed: u64) -> Result<Vec<Figure>> {
    FigureId::ALL.into_iter().map(|id| id.build(seed)).collect()
}

// ============================================================================
// Convergence figures
// ============================================================================

fn convergence_figure(
    id: FigureId,
    series: ResultSeries,
    theoretical: f64,
    y_label: &str,
    title: String,
    log_x: bool,
    y_range: Option<Range<f64>>,
) -> Figure {
    let first = series.points().first().map_or(1.0, |p| p.sample_count as f64);
    let last = series.last().map_or(first, |p| p.sample_count as f64);
    Figure {
        id,
        data: FigureData::Convergence {
            series,
            theoretical,
        },
        labels: Labels::new("Number of drawings", y_label).titled(title),
        style: ChartStyle {
            size: WIDE,
            x_range: Some(first..last.max(first + 1.0)),
            y_range,
            log_x,
        },
    }
}

fn fair_die() -> Result<DiscreteUniform> {
    Ok(DiscreteUniform::new(1, 6)?)
}

/// Probability of rolling a 2 with a fair die.
fn die_face_two<R: Rng + ?Sized>(rng: &mut R) -> Result<Figure> {
    let theoretical = fair_die()?.pmf(2);
    let spec = TrialSpec::new(fair_die()?, |&face: &i64| face == 2);
    let checkpoints = Checkpoints::logspace(1.0, 3.0, 100)?;
    let runner = ConvergenceExperimentRunner::new("uniform");
    let series = runner.run(&spec, &checkpoints, rng)?;
    Ok(convergence_figure(
        FigureId::Uniform,
        series,
        theoretical,
        "p(X=2)",
        format!("Theoretical p(X=2) = {theoretical:.3}"),
        false,
        None,
    ))
}

/// Success is a 1 or a 2, which makes each roll a Bernoulli(1/3) trial.
fn die_one_or_two<R: Rng + ?Sized>(rng: &mut R) -> Result<Figure> {
    let die = fair_die()?;
    let theoretical = die.pmf(1) + die.pmf(2);
    let spec = TrialSpec::new(die, |face: &i64| [1, 2].contains(face));
    let checkpoints = Checkpoints::logspace(1.0, 3.0, 100)?;
    let runner = ConvergenceExperimentRunner::new("bernoulli");
    let series = runner.run(&spec, &checkpoints, rng)?;
    Ok(convergence_figure(
        FigureId::Bernoulli,
        series,
        theoretical,
        "p(X=success)",
        format!("Theoretical p(X=success) = {theoretical:.3}"),
        false,
        None,
    ))
}

/// Games per tournament.
const TOURNAMENT_GAMES: u64 = 12;
/// Player 1 wins, player 2 wins, tie.
const TOURNAMENT_PVALS: [f64; 3] = [0.4, 0.35, 0.25];
const TOURNAMENT_TARGET: [u64; 3] = [7, 2, 3];

/// Probability that a 12-game tournament ends with 7 wins for player 1,
/// 2 for player 2 and 3 ties.
fn tournament<R: Rng + ?Sized>(rng: &mut R) -> Result<Figure> {
    let games = Multinomial::new(TOURNAMENT_GAMES, &TOURNAMENT_PVALS)?;
    let theoretical = games.pmf(&TOURNAMENT_TARGET);
    let spec = TrialSpec::new(games, |counts: &Vec<u64>| {
        counts.as_slice() == TOURNAMENT_TARGET.as_slice()
    });
    let checkpoints = Checkpoints::logspace(2.0, 4.0, 50)?;
    let runner = ConvergenceExperimentRunner::new("multinomial");
    let series = runner.run(&spec, &checkpoints, rng)?;
    let mut figure = convergence_figure(
        FigureId::Multinomial,
        series,
        theoretical,
        "p(X=K)",
        format!("Theoretical p(X=K) = {theoretical:.4}"),
        false,
        None,
    );
    if let Some(range) = figure.style.x_range.as_mut() {
        range.start = 0.0;
    }
    Ok(figure)
}

/// One commute: a possible car problem, then either the backup train
/// or the usual route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commute {
    pub car_problem: bool,
    pub on_time: bool,
}

/// Composite sampler for the conditional-probability example.
///
/// With a car problem (p = 0.2) the commuter is on time only if the
/// train drawn from 1..=10 is one of the first two; otherwise they are
/// on time with p = 0.3. Total probability: 0.2·0.2 + 0.8·0.3 = 0.28.
#[derive(Debug, Clone)]
pub struct CommuteSampler {
    car_problem: Bernoulli,
    train: DiscreteUniform,
    on_time_without_problem: Bernoulli,
}

impl CommuteSampler {
    const LAST_ON_TIME_TRAIN: i64 = 2;

    pub fn new() -> Result<Self> {
        Ok(Self {
            car_problem: Bernoulli::new(0.2)?,
            train: DiscreteUniform::new(1, 10)?,
            on_time_without_problem: Bernoulli::new(0.3)?,
        })
    }

    /// P(on time) by the law of total probability.
    pub fn on_time_probability(&self) -> f64 {
        let p_problem = self.car_problem.theta();
        let p_train: f64 = (self.train.low()..=Self::LAST_ON_TIME_TRAIN)
            .map(|k| self.train.pmf(k))
            .sum();
        p_problem * p_train + (1.0 - p_problem) * self.on_time_without_problem.theta()
    }
}

impl Sampler for CommuteSampler {
    type Outcome = Commute;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Commute {
        let car_problem = self.car_problem.sample(rng);
        let on_time = if car_problem {
            self.train.sample(rng) <= Self::LAST_ON_TIME_TRAIN
        } else {
            self.on_time_without_problem.sample(rng)
        };
        Commute {
            car_problem,
            on_time,
        }
    }
}

/// Running estimate of P(on time), recorded every 10 commutes.
fn commute<R: Rng + ?Sized>(rng: &mut R) -> Result<Figure> {
    let sampler = CommuteSampler::new()?;
    let theoretical = sampler.on_time_probability();
    let spec = TrialSpec::new(sampler, |c: &Commute| c.on_time);
    let checkpoints = Checkpoints::stride(10, 1_000_000)?;
    let runner = ConvergenceExperimentRunner::new("experiment");
    let series = runner.run_cumulative(&spec, &checkpoints, rng)?;
    let mut figure = convergence_figure(
        FigureId::Experiment,
        series,
        theoretical,
        "P(X)",
        format!("Theoretical P(on time) = {theoretical:.2}"),
        true,
        Some(0.0..0.3),
    );
    figure.labels.x = "# of Drawings".to_string();
    Ok(figure)
}

/// Exact and Monte-Carlo probability of three heads in three tosses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinCheck {
    pub theoretical: f64,
    pub estimate: f64,
    pub draws: u64,
}

/// Runs the three-heads check that accompanies the binomial section.
pub fn three_heads_check(seed: u64) -> Result<CoinCheck> {
    const DRAWS: u64 = 200_000;
    let coin = Binomial::new(3, 0.5)?;
    let theoretical = coin.pmf(3);
    let spec = TrialSpec::new(coin, |&heads: &u64| heads == 3);
    let mut rng = create_rng(derive_seed(seed, FigureId::ALL.len() as u64));
    let series = ConvergenceExperimentRunner::new("binomial").run(&spec, &[DRAWS], &mut rng)?;
    let estimate = series.last().map_or(0.0, |p| p.probability);
    info!(theoretical, estimate, draws = DRAWS, "three heads in three tosses");
    Ok(CoinCheck {
        theoretical,
        estimate,
        draws: DRAWS,
    })
}

// ============================================================================
// Bar and curve figures
// ============================================================================

fn pmf_bars(id: FigureId, heights: Vec<f64>, integer_ticks: bool) -> Figure {
    let n = heights.len() as f64;
    Figure {
        id,
        data: FigureData::Bars { heights },
        labels: Labels::new("X", "p(X)"),
        style: ChartStyle {
            // bars are centred on integers; integer_ticks trims the margin
            x_range: Some(if integer_ticks { -0.5..n - 0.5 } else { -1.0..n }),
            y_range: Some(0.0..1.0),
            ..ChartStyle::default()
        },
    }
}

fn lake_curve<F>(id: FigureId, level: F) -> Result<Figure>
where
    F: Fn(f64) -> Result<f64>,
{
    let grid = Grid::arange(0.0, 10.0, 0.1)?;
    let series = analytic::evaluate(&grid, level)?;
    Ok(Figure {
        id,
        data: FigureData::Curve { series },
        labels: Labels::new("t", "h"),
        style: ChartStyle {
            x_range: Some(0.0..10.0),
            y_range: Some(0.0..2.0),
            ..ChartStyle::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convergence(figure: &Figure) -> (&ResultSeries, f64) {
        match &figure.data {
            FigureData::Convergence {
                series,
                theoretical,
            } => (series, *theoretical),
            other => panic!("expected convergence data, got {other:?}"),
        }
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for id in FigureId::ALL {
            assert_eq!(id.name().parse::<FigureId>().unwrap(), id);
        }
        assert!(matches!(
            "histogram".parse::<FigureId>(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_uniform_figure() {
        let figure = FigureId::Uniform.build(DEFAULT_SEED).unwrap();
        let (series, theoretical) = convergence(&figure);
        assert_eq!(series.len(), 100);
        assert!((theoretical - 1.0 / 6.0).abs() < 1e-15);
        assert_eq!(figure.labels.title.as_deref(), Some("Theoretical p(X=2) = 0.167"));
    }

    #[test]
    fn test_bernoulli_theory() {
        let figure = FigureId::Bernoulli.build(DEFAULT_SEED).unwrap();
        let (series, theoretical) = convergence(&figure);
        assert!((theoretical - 1.0 / 3.0).abs() < 1e-12);
        let tail = series.last().unwrap().probability;
        // N = 1000, σ ≈ 0.015
        assert!((tail - theoretical).abs() < 0.08, "tail estimate {tail}");
    }

    #[test]
    fn test_multinomial_theory() {
        let figure = FigureId::Multinomial.build(DEFAULT_SEED).unwrap();
        let (series, theoretical) = convergence(&figure);
        assert_eq!(series.len(), 50);
        assert!((theoretical - 0.0248).abs() < 1e-4);
        assert_eq!(series.last().unwrap().sample_count, 10_000);
        assert_eq!(figure.style.x_range, Some(0.0..10_000.0));
    }

    #[test]
    fn test_convergence_summary_only_for_experiments() {
        let figure = FigureId::Uniform.build(DEFAULT_SEED).unwrap();
        let summary = figure.convergence_summary().unwrap();
        assert!((summary.theoretical - 1.0 / 6.0).abs() < 1e-15);
        // N = 1000 at the last checkpoint, σ ≈ 0.012
        assert!(summary.final_error < 0.06, "{summary:?}");
        assert!(summary.max_abs_error >= summary.final_error);
        assert!(summary.rms_error <= summary.max_abs_error);
        for id in [FigureId::Discrete, FigureId::Analytical1] {
            assert!(id.build(DEFAULT_SEED).unwrap().convergence_summary().is_none());
        }
    }

    #[test]
    fn test_commute_probability() {
        let sampler = CommuteSampler::new().unwrap();
        assert!((sampler.on_time_probability() - 0.28).abs() < 1e-12);
    }

    #[test]
    fn test_commute_sampler_consistency() {
        let sampler = CommuteSampler::new().unwrap();
        let mut rng = create_rng(DEFAULT_SEED);
        let n = 50_000;
        let mut on_time = 0;
        let mut problems = 0;
        for _ in 0..n {
            let c = sampler.sample(&mut rng);
            on_time += c.on_time as u32;
            problems += c.car_problem as u32;
        }
        let p_on_time = on_time as f64 / n as f64;
        let p_problem = problems as f64 / n as f64;
        assert!((p_on_time - 0.28).abs() < 0.01, "{p_on_time}");
        assert!((p_problem - 0.2).abs() < 0.01, "{p_problem}");
    }

    #[test]
    fn test_experiment_figure_is_cumulative_and_log_scaled() {
        let figure = FigureId::Experiment.build(DEFAULT_SEED).unwrap();
        let (series, theoretical) = convergence(&figure);
        assert_eq!(series.len(), 99_999);
        assert_eq!(series.last().unwrap().sample_count, 999_990);
        assert!((series.last().unwrap().probability - theoretical).abs() < 0.005);
        assert!(figure.style.log_x);
        assert_eq!(figure.style.y_range, Some(0.0..0.3));
    }

    #[test]
    fn test_bar_figures() {
        let discrete = FigureId::Discrete.build(DEFAULT_SEED).unwrap();
        let student = FigureId::Student.build(DEFAULT_SEED).unwrap();
        match (&discrete.data, &student.data) {
            (FigureData::Bars { heights: d }, FigureData::Bars { heights: s }) => {
                assert_eq!(d.len(), 6);
                assert_eq!(s.len(), 4);
                assert!((s.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected bars, got {other:?}"),
        }
        assert_eq!(student.labels.y, "p(X)");
    }

    #[test]
    fn test_lake_curves() {
        for id in [FigureId::Analytical1, FigureId::Analytical2] {
            let figure = id.build(DEFAULT_SEED).unwrap();
            match &figure.data {
                FigureData::Curve { series } => {
                    assert_eq!(series.len(), 100);
                    let (lo, hi) = series.value_range().unwrap();
                    assert!(lo >= -1e-12 && hi <= 2.0, "{id}: ({lo}, {hi})");
                }
                other => panic!("expected curve, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_figure_independent_of_catalog_order() {
        let alone = FigureId::Multinomial.build(7).unwrap();
        let all = build_all(7).unwrap();
        let from_catalog = all.iter().find(|f| f.id == FigureId::Multinomial).unwrap();
        assert_eq!(&alone, from_catalog);
    }

    #[test]
    fn test_three_heads_check() {
        let check = three_heads_check(DEFAULT_SEED).unwrap();
        assert!((check.theoretical - 0.125).abs() < 1e-12);
        assert!((check.estimate - 0.125).abs() < 0.005);
        assert_eq!(check.draws, 200_000);
    }
}
