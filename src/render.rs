//! Charting collaborator: draws a [`Figure`] to an image file.
//!
//! The computation side never touches image data; it hands a fully
//! described [`Figure`] to a [`Renderer`]. [`PlottersRenderer`] is the
//! `plotters` implementation, writing `<out_dir>/<name>.svg` or `.png`.
//!
//! SVG output carries its labels as text and needs no fonts. PNG output
//! rasterises labels, so it is only available when the crate is built
//! with the `ttf` feature; otherwise rendering a PNG fails with
//! [`Error::Render`] before any file is created.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::figures::{Figure, FigureData};
use crate::series::{CurveSeries, ResultSeries};

/// Above this many points a convergence line is drawn without markers.
const MARKER_LIMIT: usize = 500;

/// Writes a figure and returns the path of the artifact.
pub trait Renderer {
    fn render(&self, figure: &Figure, out_dir: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }

    /// Whether this build can write the format.
    pub fn is_supported(self) -> bool {
        match self {
            ImageFormat::Svg => true,
            ImageFormat::Png => cfg!(feature = "ttf"),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(Error::InvalidConfiguration(format!(
                "unsupported image format '{other}', expected svg or png"
            ))),
        }
    }
}

/// `plotters` renderer.
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    format: ImageFormat,
}

impl PlottersRenderer {
    pub fn new(format: ImageFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl Renderer for PlottersRenderer {
    fn render(&self, figure: &Figure, out_dir: &Path) -> Result<PathBuf> {
        if !self.format.is_supported() {
            return Err(Error::Render(format!(
                "{} output needs a font backend; rebuild with the `ttf` feature",
                self.format
            )));
        }
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(format!("{}.{}", figure.name(), self.format.extension()));
        match self.format {
            ImageFormat::Svg => {
                let root = SVGBackend::new(&path, figure.style.size).into_drawing_area();
                draw_figure(&root, figure)?;
            }
            ImageFormat::Png => {
                let root = BitMapBackend::new(&path, figure.style.size).into_drawing_area();
                draw_figure(&root, figure)?;
            }
        }
        info!(figure = figure.name(), path = %path.display(), "figure written");
        Ok(path)
    }
}

fn render_err<E: fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    match &figure.data {
        FigureData::Convergence {
            series,
            theoretical,
        } => draw_convergence(root, figure, series, *theoretical)?,
        FigureData::Bars { heights } => draw_bars(root, figure, heights)?,
        FigureData::Curve { series } => draw_curve(root, figure, series)?,
    }
    root.present().map_err(render_err)
}

fn chart_builder<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    figure: &'b Figure,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70);
    if let Some(title) = &figure.labels.title {
        builder.caption(title, ("sans-serif", 28));
    }
    builder
}

// ============================================================================
// Convergence
// ============================================================================

fn draw_convergence<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    series: &ResultSeries,
    theoretical: f64,
) -> Result<()> {
    let points: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (p.sample_count as f64, p.probability))
        .collect();
    let x_range = figure
        .style
        .x_range
        .clone()
        .unwrap_or_else(|| fit_range(points.iter().map(|&(x, _)| x)));
    let y_range = figure.style.y_range.clone().unwrap_or_else(|| {
        let top = points
            .iter()
            .map(|&(_, y)| y)
            .fold(theoretical, f64::max);
        0.0..(top * 1.2).max(0.05)
    });

    let mut builder = chart_builder(root, figure);
    if figure.style.log_x {
        let x_range = x_range.start.max(1.0)..x_range.end.max(x_range.start.max(1.0) + 1.0);
        let chart = builder
            .build_cartesian_2d(x_range.log_scale(), y_range)
            .map_err(render_err)?;
        plot_convergence(chart, figure, &points, theoretical)
    } else {
        let chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_err)?;
        plot_convergence(chart, figure, &points, theoretical)
    }
}

fn plot_convergence<'a, DB, X>(
    mut chart: ChartContext<'a, DB, Cartesian2d<X, RangedCoordf64>>,
    figure: &Figure,
    points: &[(f64, f64)],
    theoretical: f64,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .x_desc(figure.labels.x.as_str())
        .y_desc(figure.labels.y.as_str())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(render_err)?
        .label("empirical")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    if points.len() <= MARKER_LIMIT {
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
            )
            .map_err(render_err)?;
    }

    let (x0, x1) = match (points.first(), points.last()) {
        (Some(&(first, _)), Some(&(last, _))) => (first, last),
        _ => (0.0, 0.0),
    };
    chart
        .draw_series(LineSeries::new(
            vec![(x0, theoretical), (x1, theoretical)],
            RED.stroke_width(2),
        ))
        .map_err(render_err)?
        .label(format!("theoretical {theoretical:.4}"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(render_err)
}

// ============================================================================
// Bars and curves
// ============================================================================

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    heights: &[f64],
) -> Result<()> {
    let n = heights.len() as f64;
    let x_range = figure.style.x_range.clone().unwrap_or(-1.0..n);
    let y_range = figure.style.y_range.clone().unwrap_or(0.0..1.0);
    let mut builder = chart_builder(root, figure);
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(figure.labels.x.as_str())
        .y_desc(figure.labels.y.as_str())
        .x_labels(heights.len() + 2)
        .x_label_formatter(&|x: &f64| format!("{x:.0}"))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(heights.iter().enumerate().map(|(i, &h)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, h)], BLUE.filled())
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_curve<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    series: &CurveSeries,
) -> Result<()> {
    let x_range = figure
        .style
        .x_range
        .clone()
        .unwrap_or_else(|| fit_range(series.points().iter().map(|&(t, _)| t)));
    let y_range = figure
        .style
        .y_range
        .clone()
        .unwrap_or_else(|| fit_range(series.values()));
    let mut builder = chart_builder(root, figure);
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(figure.labels.x.as_str())
        .y_desc(figure.labels.y.as_str())
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            series.points().iter().copied(),
            RED.stroke_width(1),
        ))
        .map_err(render_err)?;
    // hollow markers
    chart
        .draw_series(
            series
                .points()
                .iter()
                .map(|&(t, h)| Circle::new((t, h), 4, RED.stroke_width(1))),
        )
        .map_err(render_err)?;
    Ok(())
}

/// `min..max` of the values, widened when degenerate.
fn fit_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo < 1e-12 {
        return (lo - 0.5)..(hi + 0.5);
    }
    lo..hi
}
