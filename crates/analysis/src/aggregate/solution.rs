use std::collections::BTreeMap;

use lenseval_core::Target;
use ndarray::Array1;

use crate::compare::{CompareError, Extent};

/// Indicates how an aggregation pass terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Consumed every batch the provider yielded.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// Index-aligned ground truth and predictions for one target.
///
/// Entry `i` of [`truth`](TargetSeries::truth) and entry `i` of
/// [`prediction`](TargetSeries::prediction) refer to the same sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSeries {
    truth: Array1<f64>,
    prediction: Array1<f64>,
    extent: Option<Extent>,
}

impl TargetSeries {
    /// Creates a series from matched arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrays differ in length or hold a non-finite value.
    pub fn new(truth: Array1<f64>, prediction: Array1<f64>) -> Result<Self, CompareError> {
        if truth.len() != prediction.len() {
            return Err(CompareError::LengthMismatch {
                truth: truth.len(),
                prediction: prediction.len(),
            });
        }
        let extent = match Extent::joint(truth.view(), prediction.view()) {
            Ok(extent) => Some(extent),
            Err(CompareError::Empty) => None,
            Err(err) => return Err(err),
        };

        Ok(Self {
            truth,
            prediction,
            extent,
        })
    }

    /// Freezes values collected during a pass, reusing the running extent.
    pub(crate) fn frozen(truth: Vec<f64>, prediction: Vec<f64>, extent: Option<Extent>) -> Self {
        debug_assert_eq!(truth.len(), prediction.len());
        Self {
            truth: Array1::from(truth),
            prediction: Array1::from(prediction),
            extent,
        }
    }

    #[must_use]
    pub fn truth(&self) -> &Array1<f64> {
        &self.truth
    }

    #[must_use]
    pub fn prediction(&self) -> &Array1<f64> {
        &self.prediction
    }

    /// Joint extent of truth and predictions, or `None` for an empty series.
    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.truth.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.truth.is_empty()
    }
}

/// Frozen per-target series collected by one aggregation pass.
///
/// Keys are exactly the tracked target set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    series: BTreeMap<Target, TargetSeries>,
}

impl Predictions {
    /// Returns the series for `target`, if it is tracked.
    #[must_use]
    pub fn get(&self, target: &str) -> Option<&TargetSeries> {
        self.series.get(target)
    }

    /// Iterates over `(target, series)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Target, &TargetSeries)> {
        self.series.iter()
    }

    /// Returns the number of tracked targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<(Target, TargetSeries)> for Predictions {
    fn from_iter<I: IntoIterator<Item = (Target, TargetSeries)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

/// The result of an aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// How the pass terminated.
    pub status: Status,

    /// Frozen truth and prediction arrays per tracked target.
    pub predictions: Predictions,

    /// Number of batches absorbed.
    pub batches: usize,

    /// Number of samples absorbed.
    pub samples: usize,
}
