//! Observers for lensing-parameter evaluation passes.
//!
//! This crate provides [`Observer`] implementations for the passes in
//! `lenseval-analysis`:
//!
//! - [`ProgressObserver`] draws a progress bar over an aggregation pass
//! - [`ReportLog`] prints and collects sample inspection reports
//!
//! # Features
//!
//! - `plot`: enables [`show_comparison`] and [`show_samples`], which render
//!   results in egui windows. This feature adds dependencies on `eframe` and
//!   `egui_plot`.
//!
//! [`Observer`]: lenseval_core::Observer

pub mod colormap;
pub mod image;

mod progress;
mod report;

#[cfg(feature = "plot")]
mod plot;

pub use progress::ProgressObserver;
pub use report::ReportLog;

#[cfg(feature = "plot")]
pub use plot::{ShowConfig, show_comparison, show_samples};
