//! Aggregation of ground truth and predictions over a held-out set.
//!
//! One pass runs the model over every batch the provider yields and collects,
//! for each tracked target, the ground-truth values and the model output in the
//! column named after that target:
//!
//! ```text
//! truth[target]      ++= batch.truth(target)
//! prediction[target] ++= forward(prepare(batch.images))[:, column(target)]
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lenseval_analysis::aggregate;
//!
//! let solution = aggregate::aggregate_unobserved(&model, &loader, &TargetSet::default())?;
//!
//! for (target, series) in solution.predictions.iter() {
//!     println!("{target}: {} samples", series.len());
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Predictions, Solution, Status, TargetSeries};

use lenseval_core::{DataProvider, Observer, OutputIndex, Regressor, Target, TargetSet};
use ndarray::ArrayView1;
use tracing::{debug, info};

use crate::compare::Extent;

/// Runs the model over every batch and collects per-target series.
///
/// # Algorithm
///
/// 1. Resolve each tracked target to its named model output column.
/// 2. For each batch, in provider order:
///    - Prepare the images and run a forward pass.
///    - Check the prediction shape against the batch.
///    - For each tracked target labeled in the batch, append its truth values
///      and the matching prediction column. Unlabeled targets are skipped.
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], stop.
/// 3. Freeze every series into fixed arrays.
///
/// # Errors
///
/// Returns an error before reading any batch if a tracked target has no
/// matching model output. Afterwards, returns an error if the provider or model
/// fails, if predictions are misshapen, or if any value is non-finite. No
/// partial result is returned on error.
pub fn aggregate<M, D, Obs>(
    model: &M,
    provider: &D,
    targets: &TargetSet,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: Regressor,
    D: DataProvider,
    Obs: Observer<Event, Action>,
{
    let index = OutputIndex::new(targets, model.output_names())?;
    let total = provider.len();

    let mut accumulators: Vec<(&Target, usize, Accumulator)> = index
        .iter()
        .map(|(target, column)| (target, column, Accumulator::with_capacity(total)))
        .collect();

    let mut status = Status::Complete;
    let mut batches = 0;
    let mut samples = 0;

    for (batch_number, batch) in provider.batches().enumerate() {
        let batch = batch.map_err(Error::provider)?;
        let prepared = model.prepare(batch.images().view()).map_err(Error::model)?;
        let predicted = model.forward(&prepared).map_err(Error::model)?;

        let (rows, cols) = predicted.dim();
        if rows != batch.len() || cols <= index.max_column() {
            return Err(Error::PredictionShape {
                batch: batch_number,
                rows: batch.len(),
                max_column: index.max_column(),
                found: (rows, cols),
            });
        }

        for (target, column, acc) in &mut accumulators {
            let Some(truth) = batch.truth(target.name()) else {
                continue;
            };
            acc.extend(*target, batch_number, truth, predicted.column(*column))?;
        }

        batches += 1;
        samples += batch.len();
        debug!(batch = batch_number, len = batch.len(), samples, total, "absorbed batch");

        let event = Event {
            batch: batch_number,
            batch_len: batch.len(),
            samples_seen: samples,
            total,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            status = Status::StoppedByObserver;
            break;
        }
    }

    info!(batches, samples, ?status, "aggregation pass finished");

    let predictions = accumulators
        .into_iter()
        .map(|(target, _, acc)| (target.clone(), acc.freeze()))
        .collect();

    Ok(Solution {
        status,
        predictions,
        batches,
        samples,
    })
}

/// Runs a full aggregation pass without observation.
///
/// This is a convenience wrapper around [`aggregate`] that discards events, so
/// the pass always consumes the whole provider.
///
/// # Errors
///
/// Returns an error under the same conditions as [`aggregate`].
pub fn aggregate_unobserved<M, D>(
    model: &M,
    provider: &D,
    targets: &TargetSet,
) -> Result<Solution, Error>
where
    M: Regressor,
    D: DataProvider,
{
    aggregate(model, provider, targets, ())
}

/// Growing truth and prediction values for one target.
struct Accumulator {
    truth: Vec<f64>,
    prediction: Vec<f64>,
    extent: Option<Extent>,
}

impl Accumulator {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            truth: Vec::with_capacity(capacity),
            prediction: Vec::with_capacity(capacity),
            extent: None,
        }
    }

    fn extend(
        &mut self,
        target: &Target,
        batch: usize,
        truth: ArrayView1<'_, f32>,
        prediction: ArrayView1<'_, f32>,
    ) -> Result<(), Error> {
        for (sample, (&t, &p)) in truth.iter().zip(prediction).enumerate() {
            if !t.is_finite() || !p.is_finite() {
                return Err(Error::NonFinite {
                    target: target.clone(),
                    batch,
                    sample,
                });
            }
            let (t, p) = (f64::from(t), f64::from(p));
            self.truth.push(t);
            self.prediction.push(p);
            self.extent = Some(match self.extent {
                Some(extent) => extent.including(t).including(p),
                None => Extent::point(t).including(p),
            });
        }
        Ok(())
    }

    fn freeze(self) -> TargetSeries {
        TargetSeries::frozen(self.truth, self.prediction, self.extent)
    }
}
