use std::error::Error as StdError;

use lenseval_core::{Target, TargetError};

/// Errors that can occur during an aggregation pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("provider error: {0}")]
    Provider(#[source] Box<dyn StdError + Send + Sync>),

    #[error("batch {batch}: expected predictions shaped ({rows}, >{max_column}), got {found:?}")]
    PredictionShape {
        batch: usize,
        rows: usize,
        max_column: usize,
        found: (usize, usize),
    },

    #[error("batch {batch}, sample {sample}: non-finite value for `{target}`")]
    NonFinite {
        target: Target,
        batch: usize,
        sample: usize,
    },
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub(crate) fn provider<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Provider(Box::new(err))
    }
}
