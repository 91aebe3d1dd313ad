//! Core traits and types for evaluating lensing-parameter regressors.
//!
//! This crate defines the seams that the analysis and observer crates build
//! on:
//!
//! - [`Regressor`] - a model that maps a batch of images to per-sample outputs,
//!   with named output columns
//! - [`DataProvider`] - a finite, ordered source of [`Batch`]es
//! - [`Dataset`] and [`DataLoader`] - a reference provider that batches
//!   indexable samples without shuffling
//! - [`TargetSet`] and [`OutputIndex`] - the fixed set of tracked targets and
//!   their validated mapping onto model outputs
//! - [`Observer`] - receives pass events and optionally returns control actions

mod data;
mod model;
mod observer;
mod target;

pub use data::{
    Batch, BatchError, DataLoader, DataProvider, Dataset, InMemoryDataset, Sample, SampleError,
    Subset, train_test_split,
};
pub use model::{Device, LoadRegressor, Mode, Regressor};
pub use observer::Observer;
pub use target::{OutputIndex, Target, TargetError, TargetSet};
