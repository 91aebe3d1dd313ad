//! Per-sample inspection of a few batches.
//!
//! Inspection runs the model over the first batches of a provider and reports,
//! for the first samples of each, the truth, prediction, and percentage error
//! of every tracked target along with the input image. Reports are handed to an
//! observer, which decides how to show them.

mod action;
mod error;
mod report;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use error::Error;
pub use report::{SampleReport, TargetLine, percent_error};

use lenseval_core::{DataProvider, Observer, OutputIndex, Regressor, TargetSet};
use ndarray::{Axis, s};
use serde::Deserialize;
use tracing::debug;

/// How many batches, and samples within each, to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct InspectLimits {
    pub batches: usize,
    pub samples_per_batch: usize,
}

impl Default for InspectLimits {
    fn default() -> Self {
        Self {
            batches: 1,
            samples_per_batch: 4,
        }
    }
}

/// Indicates how an inspection pass terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the batch limit or the end of the provider.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an inspection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub status: Status,

    /// Number of batches read from the provider.
    pub batches: usize,

    /// Number of reports passed to the observer.
    pub reports: usize,
}

/// Reports up to `limits.samples_per_batch` samples from each of the first
/// `limits.batches` batches.
///
/// Batches past the limit are never requested from the provider.
///
/// # Errors
///
/// Returns an error if a tracked target has no matching model output, if the
/// provider or model fails, if the model output is misshapen, or if a tracked
/// truth value is exactly zero.
pub fn inspect<M, D, Obs>(
    model: &M,
    provider: &D,
    targets: &TargetSet,
    limits: InspectLimits,
    mut observer: Obs,
) -> Result<Summary, Error>
where
    M: Regressor,
    D: DataProvider,
    Obs: Observer<SampleReport, Action>,
{
    let index = OutputIndex::new(targets, model.output_names())?;
    let mut summary = Summary {
        status: Status::Complete,
        batches: 0,
        reports: 0,
    };

    for (batch_number, batch) in provider.batches().enumerate().take(limits.batches) {
        let batch = batch.map_err(Error::provider)?;
        let prepared = model.prepare(batch.images().view()).map_err(Error::model)?;
        if prepared.len_of(Axis(0)) != batch.len() || prepared.len_of(Axis(1)) == 0 {
            return Err(Error::PreparedShape {
                batch: batch_number,
                rows: batch.len(),
                found: prepared.shape().to_vec(),
            });
        }

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
        summary.batches += 1;

        for sample in 0..batch.len().min(limits.samples_per_batch) {
            let lines = index
                .iter()
                .filter_map(|(target, column)| {
                    let truth = batch.truth(target.name())?;
                    Some((target, f64::from(truth[sample]), column))
                })
                .map(|(target, truth, column)| {
                    let prediction = f64::from(predicted[[sample, column]]);
                    let percent_error =
                        percent_error(truth, prediction).ok_or_else(|| Error::ZeroTruth {
                            target: target.clone(),
                            batch: batch_number,
                            sample,
                        })?;
                    Ok::<_, Error>(TargetLine {
                        target: target.clone(),
                        truth,
                        prediction,
                        percent_error,
                    })
                })
                .collect::<Result<Vec<_>, Error>>()?;

            let report = SampleReport {
                batch: batch_number,
                sample,
                lines,
                image: prepared.slice(s![sample, 0, .., ..]).to_owned(),
            };
            debug!(batch = batch_number, sample, "inspected sample");

            summary.reports += 1;
            if let Some(Action::StopEarly) = observer.observe(&report) {
                summary.status = Status::StoppedByObserver;
                return Ok(summary);
            }
        }
    }

    Ok(summary)
}
