//! One-stop evaluation of a model over a held-out set.

use lenseval_core::{
    DataLoader, DataProvider, Dataset, Observer, Regressor, SampleError, Subset, train_test_split,
};
use tracing::{info, warn};

use crate::{
    Config, Session,
    aggregate::{self, Predictions, Solution},
    compare::{CompareError, ComparisonPlot},
    inspect::{self, InspectLimits, SampleReport},
    metrics::Metrics,
};

/// Batches the held-out tail of `dataset` as configured.
///
/// The split is deterministic, so repeated evaluations see the same samples in
/// the same order.
pub fn test_loader<'a, D>(dataset: &'a D, config: &Config) -> DataLoader<Subset<'a, D>>
where
    D: Dataset,
    D::Error: From<SampleError>,
{
    let (_, test) = train_test_split(dataset, config.test_fraction());
    DataLoader::new(test, config.batch_size())
}

/// A model evaluated once over a held-out provider.
///
/// Construction runs a full aggregation pass; the resulting arrays are frozen
/// and shared by every comparison plot. Sample inspection starts a fresh pass.
pub struct Evaluation<M: Regressor, D> {
    config: Config,
    session: Session<M>,
    provider: D,
    solution: Solution,
}

impl<M: Regressor, D: DataProvider> Evaluation<M, D> {
    /// Aggregates the whole provider without observation.
    ///
    /// # Errors
    ///
    /// Returns an error if aggregation fails.
    pub fn new(config: Config, session: Session<M>, provider: D) -> Result<Self, aggregate::Error> {
        Self::observed(config, session, provider, ())
    }

    /// Aggregates the provider, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if aggregation fails.
    pub fn observed<Obs>(
        config: Config,
        session: Session<M>,
        provider: D,
        observer: Obs,
    ) -> Result<Self, aggregate::Error>
    where
        Obs: Observer<aggregate::Event, aggregate::Action>,
    {
        info!(
            samples = provider.len(),
            batches = provider.batch_count(),
            device = %session.device(),
            "evaluating held-out set"
        );
        let solution =
            aggregate::aggregate(session.model(), &provider, config.targets(), observer)?;
        if solution.status != aggregate::Status::Complete {
            warn!(
                samples = solution.samples,
                "evaluation stopped before the end of the provider"
            );
        }

        let evaluation = Self {
            config,
            session,
            provider,
            solution,
        };
        for (target, metrics) in evaluation.metrics() {
            info!(%target, %metrics, "prediction quality");
        }

        Ok(evaluation)
    }

    /// Returns the frozen truth and prediction arrays.
    #[must_use]
    pub fn predictions(&self) -> &Predictions {
        &self.solution.predictions
    }

    /// Returns the full aggregation result.
    #[must_use]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Summary metrics for every non-empty target, in target-set order.
    #[must_use]
    pub fn metrics(&self) -> Vec<(String, Metrics)> {
        self.config
            .targets()
            .iter()
            .filter_map(|target| {
                let series = self.predictions().get(target.name())?;
                Some((target.name().to_owned(), Metrics::of(series)?))
            })
            .collect()
    }

    /// Builds the comparison plot for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not tracked or has no values.
    pub fn comparison(&self, target: &str) -> Result<ComparisonPlot, CompareError> {
        let (target, series) = self
            .predictions()
            .iter()
            .find(|(t, _)| t.name() == target)
            .ok_or_else(|| CompareError::UnknownTarget(target.to_owned()))?;
        ComparisonPlot::new(target, series)
    }

    /// Inspects a few samples from a fresh pass over the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if inspection fails.
    pub fn show_a_few_samples<Obs>(
        &self,
        limits: InspectLimits,
        observer: Obs,
    ) -> Result<inspect::Summary, inspect::Error>
    where
        Obs: Observer<SampleReport, inspect::Action>,
    {
        inspect::inspect(
            self.session.model(),
            &self.provider,
            self.config.targets(),
            limits,
            observer,
        )
    }

    /// Inspects samples using the configured limits.
    ///
    /// # Errors
    ///
    /// Returns an error if inspection fails.
    pub fn show_configured_samples<Obs>(
        &self,
        observer: Obs,
    ) -> Result<inspect::Summary, inspect::Error>
    where
        Obs: Observer<SampleReport, inspect::Action>,
    {
        self.show_a_few_samples(self.config.inspect(), observer)
    }
}
