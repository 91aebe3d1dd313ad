use approx::assert_relative_eq;
use lenseval_core::{DataProvider, TargetError, TargetSet};

use super::{Action, Error, Event, Status, aggregate, aggregate_unobserved};
use crate::testing::{FlakyModel, PixelModel, VecProvider, labeled_batch, loader, truth};

#[test]
fn series_lengths_match_provider_sample_count() {
    let provider = loader(23, 5);
    let targets = TargetSet::default();

    let solution = aggregate_unobserved(&PixelModel::shuffled(1.0), &provider, &targets)
        .expect("should aggregate");

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.batches, 5);
    assert_eq!(solution.samples, provider.len());
    assert_eq!(solution.predictions.len(), 3);
    for (_, series) in solution.predictions.iter() {
        assert_eq!(series.truth().len(), provider.len());
        assert_eq!(series.prediction().len(), provider.len());
    }
}

#[test]
fn values_are_index_aligned_in_provider_order() {
    let provider = loader(7, 3);

    let solution = aggregate_unobserved(
        &PixelModel::shuffled(2.0),
        &provider,
        &TargetSet::default(),
    )
    .expect("should aggregate");

    let theta_e = solution.predictions.get("theta_E").unwrap();
    let e2 = solution.predictions.get("e2").unwrap();
    for i in 0..7 {
        let (expected_theta_e, _, expected_e2) = truth(i);
        assert_relative_eq!(theta_e.truth()[i], f64::from(expected_theta_e));
        assert_relative_eq!(theta_e.prediction()[i], f64::from(2.0 * expected_theta_e));
        assert_relative_eq!(e2.truth()[i], f64::from(expected_e2));
        assert_relative_eq!(e2.prediction()[i], f64::from(2.0 * expected_e2));
    }
}

#[test]
fn repeated_passes_are_identical() {
    let provider = loader(12, 4);
    let model = PixelModel::shuffled(0.9);
    let targets = TargetSet::default();

    let first = aggregate_unobserved(&model, &provider, &targets).unwrap();
    let second = aggregate_unobserved(&model, &provider, &targets).unwrap();

    assert_eq!(first, second);
}

#[test]
fn running_extent_matches_frozen_arrays() {
    let provider = loader(9, 4);

    let solution =
        aggregate_unobserved(&PixelModel::shuffled(1.5), &provider, &TargetSet::default())
            .unwrap();

    let series = solution.predictions.get("theta_E").unwrap();
    let extent = series.extent().unwrap();
    let (expected_min, _, _) = truth(0);
    let (expected_max, _, _) = truth(8);
    assert_relative_eq!(extent.min(), f64::from(expected_min));
    assert_relative_eq!(extent.max(), f64::from(1.5 * expected_max));
}

#[test]
fn targets_absent_from_a_batch_are_skipped() {
    let provider = VecProvider(vec![
        labeled_batch(&[("theta_E", &[1.0, 2.0]), ("e1", &[0.1, 0.2])]),
        labeled_batch(&[("theta_E", &[3.0]), ("kappa", &[9.0])]),
    ]);
    let targets = TargetSet::new(["theta_E", "e1"]).unwrap();

    let solution = aggregate_unobserved(&PixelModel::shuffled(1.0), &provider, &targets)
        .expect("missing labels should not fail");

    assert_eq!(solution.samples, 3);
    assert_eq!(solution.predictions.len(), 2);
    assert!(solution.predictions.get("kappa").is_none());
    assert_eq!(solution.predictions.get("theta_E").unwrap().len(), 3);
    assert_eq!(solution.predictions.get("e1").unwrap().len(), 2);
}

#[test]
fn missing_output_fails_before_any_batch() {
    let provider = loader(4, 2);

    let mut events = 0;
    let result = aggregate(
        &PixelModel::partial(),
        &provider,
        &TargetSet::default(),
        |_: &Event| {
            events += 1;
            None
        },
    );

    assert!(matches!(
        result,
        Err(Error::Target(TargetError::MissingOutput(ref t))) if t.name() == "e2"
    ));
    assert_eq!(events, 0);
}

#[test]
fn observer_can_stop_early() {
    let provider = loader(20, 4);

    let solution = aggregate(
        &PixelModel::shuffled(1.0),
        &provider,
        &TargetSet::default(),
        |event: &Event| (event.batch == 1).then_some(Action::StopEarly),
    )
    .expect("should stop early");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.batches, 2);
    assert_eq!(solution.samples, 8);
    assert_eq!(solution.predictions.get("e1").unwrap().len(), 8);
}

#[test]
fn events_report_progress() {
    let provider = loader(5, 2);

    let mut seen = Vec::new();
    aggregate(
        &PixelModel::shuffled(1.0),
        &provider,
        &TargetSet::default(),
        |event: &Event| {
            seen.push((event.batch, event.batch_len, event.samples_seen, event.total));
            None
        },
    )
    .unwrap();

    assert_eq!(seen, vec![(0, 2, 2, 5), (1, 2, 4, 5), (2, 1, 5, 5)]);
}

#[test]
fn model_failure_discards_partial_results() {
    let provider = loader(10, 2);

    let result = aggregate_unobserved(&FlakyModel::new(3), &provider, &TargetSet::default());

    assert!(matches!(result, Err(Error::Model(_))));
}

#[test]
fn non_finite_prediction_is_rejected() {
    let provider = VecProvider(vec![labeled_batch(&[("theta_E", &[1.0, f32::NAN])])]);
    let targets = TargetSet::new(["theta_E"]).unwrap();

    let result = aggregate_unobserved(&PixelModel::shuffled(1.0), &provider, &targets);

    assert!(matches!(
        result,
        Err(Error::NonFinite {
            batch: 0,
            sample: 1,
            ..
        })
    ));
}
