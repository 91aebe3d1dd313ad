//! Truth-versus-prediction comparison plots.
//!
//! A [`ComparisonPlot`] holds everything needed to draw one target's density
//! plot: a square [`Extent`] covering the joint range of truth and predictions,
//! the points counted into a [`HexGrid`], and the perfect-prediction diagonal.
//! Rendering is left to a display surface.

mod error;
mod extent;
mod hexbin;

pub use error::CompareError;
pub use extent::Extent;
pub use hexbin::{DEFAULT_GRIDSIZE, HexCell, HexGrid};

use lenseval_core::Target;

use crate::aggregate::TargetSeries;

/// Label of the horizontal axis.
pub const X_LABEL: &str = "truth";

/// Label of the vertical axis.
pub const Y_LABEL: &str = "prediction";

/// Density plot of prediction against truth for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPlot {
    /// The target's name.
    pub title: String,

    /// Shared range of both axes.
    pub extent: Extent,

    /// Endpoints of the perfect-prediction line.
    pub diagonal: [[f64; 2]; 2],

    /// Hexagonal bin counts of `(truth, prediction)` pairs.
    pub bins: HexGrid,
}

impl ComparisonPlot {
    /// Builds a plot with [`DEFAULT_GRIDSIZE`] hexagons across.
    ///
    /// # Errors
    ///
    /// Returns an error if the series is empty.
    pub fn new(target: &Target, series: &TargetSeries) -> Result<Self, CompareError> {
        Self::with_gridsize(target, series, DEFAULT_GRIDSIZE)
    }

    /// Builds a plot with `gridsize` hexagons across.
    ///
    /// # Errors
    ///
    /// Returns an error if the series is empty or `gridsize < 2`.
    pub fn with_gridsize(
        target: &Target,
        series: &TargetSeries,
        gridsize: usize,
    ) -> Result<Self, CompareError> {
        let extent = series.extent().ok_or(CompareError::Empty)?;
        let bins = HexGrid::bin(
            series.truth().view(),
            series.prediction().view(),
            extent,
            gridsize,
        )?;

        Ok(Self {
            title: target.name().to_owned(),
            extent,
            diagonal: [
                [extent.min(), extent.min()],
                [extent.max(), extent.max()],
            ],
            bins,
        })
    }
}
