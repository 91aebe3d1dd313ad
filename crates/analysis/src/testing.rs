//! Synthetic regressors and providers shared by unit tests.

use std::{collections::BTreeMap, convert::Infallible, num::NonZeroUsize};

use lenseval_core::{Batch, DataLoader, DataProvider, InMemoryDataset, Regressor, Sample, Target};
use ndarray::{Array2, Array4, Axis, array};
use thiserror::Error;

/// Ground truth of sample `i`: `(theta_E, e1, e2)`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn truth(i: usize) -> (f32, f32, f32) {
    let i = i as f32;
    (1.0 + 0.1 * i, 0.01 * (i + 1.0), -0.02 * (i + 1.0))
}

/// A dataset whose images carry their own labels in pixels `[0, 0, 0..3]`.
pub(crate) fn lensing_dataset(n: usize) -> InMemoryDataset {
    (0..n)
        .map(|i| {
            let (theta_e, e1, e2) = truth(i);
            Sample::new(
                array![[[theta_e, e1, e2]]],
                [("theta_E", theta_e), ("e1", e1), ("e2", e2)],
            )
        })
        .collect()
}

/// Loads `n` samples in batches of `batch_size`.
pub(crate) fn loader(n: usize, batch_size: usize) -> DataLoader<InMemoryDataset> {
    DataLoader::new(
        lensing_dataset(n),
        NonZeroUsize::new(batch_size).expect("batch size must be positive"),
    )
}

/// Reads one pixel per output and scales it.
///
/// Output names need not follow pixel order, which exercises name-based column
/// lookup.
pub(crate) struct PixelModel {
    names: Vec<String>,
    pixels: Vec<usize>,
    scale: f32,
}

impl PixelModel {
    /// Outputs `e2`, `theta_E`, `e1` (deliberately not label order).
    pub(crate) fn shuffled(scale: f32) -> Self {
        Self {
            names: vec!["e2".into(), "theta_E".into(), "e1".into()],
            pixels: vec![2, 0, 1],
            scale,
        }
    }

    /// Outputs only `theta_E` and `e1`.
    pub(crate) fn partial() -> Self {
        Self {
            names: vec!["theta_E".into(), "e1".into()],
            pixels: vec![0, 1],
            scale: 1.0,
        }
    }
}

impl Regressor for PixelModel {
    type Error = Infallible;

    fn output_names(&self) -> &[String] {
        &self.names
    }

    fn forward(&self, images: &Array4<f32>) -> Result<Array2<f32>, Infallible> {
        let rows = images.len_of(Axis(0));
        Ok(Array2::from_shape_fn((rows, self.pixels.len()), |(i, j)| {
            images[[i, 0, 0, self.pixels[j]]] * self.scale
        }))
    }
}

#[derive(Debug, Error)]
#[error("forward pass failed")]
pub(crate) struct ForwardFailed;

/// Fails every forward pass after the first `ok_batches`.
pub(crate) struct FlakyModel {
    inner: PixelModel,
    ok_batches: usize,
    calls: std::cell::Cell<usize>,
}

impl FlakyModel {
    pub(crate) fn new(ok_batches: usize) -> Self {
        Self {
            inner: PixelModel::shuffled(1.0),
            ok_batches,
            calls: std::cell::Cell::new(0),
        }
    }
}

impl Regressor for FlakyModel {
    type Error = ForwardFailed;

    fn output_names(&self) -> &[String] {
        self.inner.output_names()
    }

    fn forward(&self, images: &Array4<f32>) -> Result<Array2<f32>, ForwardFailed> {
        let calls = self.calls.get();
        self.calls.set(calls + 1);
        if calls >= self.ok_batches {
            return Err(ForwardFailed);
        }
        Ok(self.inner.forward(images).unwrap_or_else(|never| match never {}))
    }
}

/// Yields prebuilt batches.
pub(crate) struct VecProvider(pub(crate) Vec<Batch>);

impl DataProvider for VecProvider {
    type Error = Infallible;

    fn len(&self) -> usize {
        self.0.iter().map(Batch::len).sum()
    }

    fn batch_count(&self) -> usize {
        self.0.len()
    }

    fn batches(&self) -> impl Iterator<Item = Result<Batch, Infallible>> + '_ {
        self.0.iter().cloned().map(Ok)
    }
}

/// A batch of `values.len()` samples labeled with the given targets only.
pub(crate) fn labeled_batch(labels: &[(&str, &[f32])]) -> Batch {
    let rows = labels.first().map_or(0, |(_, v)| v.len());
    let mut images = Array4::zeros((rows, 1, 1, 3));
    let mut targets = BTreeMap::new();

    for (name, values) in labels {
        let pixel = match *name {
            "theta_E" => 0,
            "e1" => 1,
            _ => 2,
        };
        for (i, &v) in values.iter().enumerate() {
            images[[i, 0, 0, pixel]] = v;
        }
        let column = Array2::from_shape_vec((values.len(), 1), values.to_vec())
            .expect("column shape matches values");
        targets.insert(Target::new(*name), column);
    }

    Batch::new(images, targets).expect("labels are consistent")
}
