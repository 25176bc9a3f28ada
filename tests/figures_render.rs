use std::fs;

use u_probplot::checkpoints::Checkpoints;
use u_probplot::distributions::{DiscreteUniform, Multinomial};
use u_probplot::figures::{self, FigureData, FigureId};
use u_probplot::random::create_rng;
use u_probplot::render::{ImageFormat, PlottersRenderer, Renderer};
use u_probplot::runner::ConvergenceExperimentRunner;
use u_probplot::trial::TrialSpec;
use u_probplot::Error;

#[test]
fn catalog_renders_every_figure_as_svg() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = PlottersRenderer::default();
    let all = figures::build_all(999).unwrap();
    assert_eq!(all.len(), FigureId::ALL.len());

    for figure in &all {
        let path = renderer.render(figure, dir.path()).unwrap();
        assert_eq!(path, dir.path().join(format!("{}.svg", figure.name())));
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"), "{} is not svg", path.display());
    }

    let mut written: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    let mut expected: Vec<String> = FigureId::ALL
        .iter()
        .map(|id| format!("{}.svg", id.name()))
        .collect();
    expected.sort();
    assert_eq!(written, expected);
}

#[test]
#[cfg(not(feature = "ttf"))]
fn png_output_reports_missing_font_backend() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = PlottersRenderer::new("png".parse::<ImageFormat>().unwrap());
    let figure = FigureId::Uniform.build(999).unwrap();
    let err = renderer.render(&figure, dir.path()).unwrap_err();
    assert!(matches!(err, Error::Render(_)));
    assert!(!dir.path().join("uniform.png").exists());
}

#[test]
#[cfg(feature = "ttf")]
fn png_output_for_selected_figure() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = PlottersRenderer::new("png".parse::<ImageFormat>().unwrap());
    let figure = FigureId::Analytical2.build(999).unwrap();
    let path = renderer.render(&figure, dir.path()).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn catalog_is_reproducible_for_a_seed() {
    let a = FigureId::Multinomial.build(42).unwrap();
    let b = FigureId::Multinomial.build(42).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn fair_die_converges_toward_one_sixth() {
    let spec = TrialSpec::new(DiscreteUniform::new(1, 6).unwrap(), |&f: &i64| f == 2);
    let runner = ConvergenceExperimentRunner::new("die");
    let checkpoints = Checkpoints::logspace(1.0, 4.0, 40).unwrap();
    let series = runner.run(&spec, &checkpoints, &mut create_rng(999)).unwrap();

    assert_eq!(series.sample_counts(), checkpoints.to_vec());
    let late = series.summarize(1.0 / 6.0).unwrap();
    assert!(late.final_error < 0.03, "final error {}", late.final_error);
}

#[test]
fn tournament_estimate_tracks_pmf() {
    let games = Multinomial::new(12, &[0.4, 0.35, 0.25]).unwrap();
    let theoretical = games.pmf(&[7, 2, 3]);
    let spec = TrialSpec::new(games, |counts: &Vec<u64>| counts.as_slice() == [7, 2, 3]);
    let series = ConvergenceExperimentRunner::new("tournament")
        .run(&spec, &[100_000], &mut create_rng(999))
        .unwrap();
    let p = series.last().unwrap().probability;
    // theoretical ≈ 0.0248, σ ≈ 0.0005 at this size
    assert!((p - theoretical).abs() < 0.004, "{p} vs {theoretical}");
}

#[test]
fn invalid_inputs_surface_configuration_errors() {
    assert!(matches!(
        DiscreteUniform::new(6, 1).map_err(Error::from),
        Err(Error::InvalidConfiguration(_))
    ));
    let spec = TrialSpec::new(DiscreteUniform::new(1, 6).unwrap(), |&f: &i64| f == 2);
    let err = ConvergenceExperimentRunner::default()
        .run(&spec, &[100, 10], &mut create_rng(1))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
    assert!("bmp".parse::<ImageFormat>().is_err());
    assert!("histogram".parse::<FigureId>().is_err());
}

#[test]
fn three_heads_check_matches_exact_value() {
    let check = figures::three_heads_check(999).unwrap();
    assert!((check.theoretical - 0.125).abs() < 1e-12);
    assert!((check.estimate - 0.125).abs() < 0.005);
    assert!(matches!(
        FigureId::Student.build(999).unwrap().data,
        FigureData::Bars { .. }
    ));
}
