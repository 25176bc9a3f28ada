//! # u-probplot
//!
//! Monte-Carlo convergence experiments and closed-form curves for a set of
//! probability and hydraulics figures.
//!
//! The computation side draws from discrete distributions, counts how often
//! a predicate holds at increasing sample sizes, and evaluates analytic
//! functions over a grid. Drawing is a separate concern behind the
//! [`render::Renderer`] trait.
//!
//! ## Modules
//!
//! - [`random`]: seeded RNG construction and weighted index sampling
//! - [`special`]: log-gamma and log-space binomial/multinomial coefficients
//! - [`stats`]: descriptive statistics with compensated summation
//! - [`distributions`]: discrete uniform, Bernoulli, binomial, categorical,
//!   multinomial
//! - [`trial`]: the [`trial::Sampler`] trait and predicate-based trials
//! - [`checkpoints`]: log-spaced and strided sample-size sequences
//! - [`runner`]: empirical-probability convergence runs
//! - [`series`]: result and curve series
//! - [`analytic`]: evaluation grids and lake-level closed forms
//! - [`figures`]: the figure catalog
//! - [`render`]: `plotters` rendering to SVG or PNG
//!
//! ## Design Philosophy
//!
//! - **Reproducible**: every figure derives its RNG stream from one seed
//! - **Validated up front**: bad parameters fail at construction, not mid-run
//! - **Property-based testing**: distribution and series invariants verified
//!   via proptest

pub mod analytic;
pub mod checkpoints;
pub mod distributions;
pub mod error;
pub mod figures;
pub mod random;
pub mod render;
pub mod runner;
pub mod series;
pub mod special;
pub mod stats;
pub mod trial;

pub use error::{Error, Result};
