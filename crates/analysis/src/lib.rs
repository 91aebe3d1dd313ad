//! Evaluation passes over a trained lensing-parameter regressor.
//!
//! Each pass takes a [`Regressor`], a [`DataProvider`], and the tracked
//! [`TargetSet`], and reports progress to an [`Observer`] that may stop it
//! early:
//!
//! - [`aggregate`] collects index-aligned truth and prediction arrays over the
//!   whole provider
//! - [`inspect`] reports per-sample errors for the first few batches
//!
//! [`compare`] turns an aggregated series into a hexbin comparison plot, and
//! [`Evaluation`] ties a [`Config`], a [`Session`], and a provider together.
//!
//! [`Regressor`]: lenseval_core::Regressor
//! [`DataProvider`]: lenseval_core::DataProvider
//! [`TargetSet`]: lenseval_core::TargetSet
//! [`Observer`]: lenseval_core::Observer

mod config;
mod evaluation;
mod session;

pub mod aggregate;
pub mod compare;
pub mod inspect;
pub mod metrics;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigError, DEFAULT_TEST_FRACTION};
pub use evaluation::{Evaluation, test_loader};
pub use inspect::InspectLimits;
pub use metrics::Metrics;
pub use session::Session;
