use thiserror::Error;

/// Errors that can occur when preparing a comparison plot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("no values to compare")]
    Empty,

    #[error("truth has {truth} values but prediction has {prediction}")]
    LengthMismatch { truth: usize, prediction: usize },

    #[error("values must be finite")]
    NonFinite,

    #[error("gridsize must be at least 2")]
    GridSize,

    #[error("target `{0}` was not aggregated")]
    UnknownTarget(String),
}
