use approx::assert_relative_eq;
use lenseval_core::{Target, TargetSet};

use super::{
    Action, Error, InspectLimits, SampleReport, Status, TargetLine, inspect, percent_error,
};
use crate::testing::{PixelModel, VecProvider, labeled_batch, loader};

fn limits(batches: usize, samples_per_batch: usize) -> InspectLimits {
    InspectLimits {
        batches,
        samples_per_batch,
    }
}

#[test]
fn percent_error_is_signed() {
    assert_relative_eq!(percent_error(2.0, 1.8).unwrap(), -10.0, epsilon = 1e-12);
    assert_relative_eq!(percent_error(-0.5, -0.6).unwrap(), 20.0, epsilon = 1e-12);
    assert_eq!(percent_error(0.0, 1.0), None);
}

#[test]
fn line_formats_fixed_precision() {
    let line = TargetLine {
        target: Target::new("theta_E"),
        truth: 2.0,
        prediction: 1.8,
        percent_error: percent_error(2.0, 1.8).unwrap(),
    };

    assert_eq!(
        line.to_string(),
        "theta_E: truth = 2.0000, pred = 1.8000, error = -10.00 %"
    );
}

#[test]
fn stops_at_batch_and_sample_limits() {
    let provider = loader(50, 10);

    let mut seen = Vec::new();
    let summary = inspect(
        &PixelModel::shuffled(1.0),
        &provider,
        &TargetSet::default(),
        limits(2, 3),
        |report: &SampleReport| {
            seen.push((report.batch, report.sample));
            None
        },
    )
    .expect("should inspect");

    assert_eq!(summary.status, Status::Complete);
    assert_eq!(summary.batches, 2);
    assert_eq!(summary.reports, 6);
    assert_eq!(seen, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
}

#[test]
fn short_batches_limit_samples() {
    let provider = loader(5, 4);

    let summary = inspect(
        &PixelModel::shuffled(1.0),
        &provider,
        &TargetSet::default(),
        limits(10, 8),
        (),
    )
    .unwrap();

    assert_eq!(summary.batches, 2);
    assert_eq!(summary.reports, 5);
}

#[test]
fn reports_carry_lines_and_first_channel() {
    let provider = loader(3, 3);

    let mut reports = Vec::new();
    inspect(
        &PixelModel::shuffled(1.1),
        &provider,
        &TargetSet::default(),
        limits(1, 1),
        |report: &SampleReport| {
            reports.push(report.clone());
            None
        },
    )
    .unwrap();

    let report = &reports[0];
    let names: Vec<_> = report.lines.iter().map(|l| l.target.name()).collect();
    assert_eq!(names, ["theta_E", "e1", "e2"]);
    assert_relative_eq!(report.lines[0].truth, 1.0);
    assert_relative_eq!(report.lines[0].prediction, f64::from(1.1_f32));
    assert_relative_eq!(report.lines[0].percent_error, 10.0, epsilon = 1e-4);
    assert_eq!(report.image.shape(), &[1, 3]);
    assert_eq!(report.to_string().lines().count(), 3);
}

#[test]
fn observer_can_stop_early() {
    let provider = loader(20, 5);

    let summary = inspect(
        &PixelModel::shuffled(1.0),
        &provider,
        &TargetSet::default(),
        limits(4, 5),
        |report: &SampleReport| (report.sample == 1).then_some(Action::StopEarly),
    )
    .unwrap();

    assert_eq!(summary.status, Status::StoppedByObserver);
    assert_eq!(summary.reports, 2);
}

#[test]
fn zero_truth_is_an_error() {
    let provider = VecProvider(vec![labeled_batch(&[
        ("theta_E", &[1.0, 1.0]),
        ("e1", &[0.2, 0.0]),
    ])]);
    let targets = TargetSet::new(["theta_E", "e1"]).unwrap();

    let result = inspect(
        &PixelModel::shuffled(1.0),
        &provider,
        &targets,
        limits(1, 2),
        (),
    );

    assert!(matches!(
        result,
        Err(Error::ZeroTruth { ref target, batch: 0, sample: 1 }) if target.name() == "e1"
    ));
}

#[test]
fn unlabeled_targets_are_left_out_of_reports() {
    let provider = VecProvider(vec![labeled_batch(&[("theta_E", &[1.5])])]);

    let mut lines = 0;
    inspect(
        &PixelModel::shuffled(1.0),
        &provider,
        &TargetSet::default(),
        limits(1, 1),
        |report: &SampleReport| {
            lines = report.lines.len();
            None
        },
    )
    .unwrap();

    assert_eq!(lines, 1);
}
