use std::fmt;

use lenseval_core::Target;
use ndarray::Array2;

/// Truth, prediction, and signed percentage error for one target of one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetLine {
    pub target: Target,
    pub truth: f64,
    pub prediction: f64,

    /// `100 * (prediction - truth) / truth`.
    pub percent_error: f64,
}

impl fmt::Display for TargetLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: truth = {:.4}, pred = {:.4}, error = {:.2} %",
            self.target, self.truth, self.prediction, self.percent_error
        )
    }
}

/// Diagnostic report for one inspected sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    /// Zero-based batch number.
    pub batch: usize,

    /// Zero-based position within the batch.
    pub sample: usize,

    /// One line per tracked target labeled in the batch, in target-set order.
    pub lines: Vec<TargetLine>,

    /// First channel of the prepared input image, shaped `(height, width)`.
    pub image: Array2<f32>,
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Signed relative error of `prediction` against `truth`, as a percentage.
///
/// Returns `None` when `truth` is exactly zero.
#[must_use]
pub fn percent_error(truth: f64, prediction: f64) -> Option<f64> {
    (truth != 0.0).then(|| 100.0 * (prediction - truth) / truth)
}
