use ndarray::ArrayView1;

use super::CompareError;

/// A closed interval shared by both axes of a comparison plot.
///
/// Using one interval for truth and prediction keeps the plot square, so the
/// perfect-prediction line runs corner to corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    /// An extent covering a single value.
    #[must_use]
    pub fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Returns this extent widened to include `value`.
    #[must_use]
    pub fn including(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// Joint minimum and maximum over both arrays.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Empty`] if both arrays are empty and
    /// [`CompareError::NonFinite`] if any value is NaN or infinite.
    pub fn joint(
        truth: ArrayView1<'_, f64>,
        prediction: ArrayView1<'_, f64>,
    ) -> Result<Self, CompareError> {
        let mut extent: Option<Self> = None;
        for &value in truth.iter().chain(prediction.iter()) {
            if !value.is_finite() {
                return Err(CompareError::NonFinite);
            }
            extent = Some(extent.map_or(Self::point(value), |e| e.including(value)));
        }
        extent.ok_or(CompareError::Empty)
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns `(xmin, xmax, ymin, ymax)` for a square plot.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.min, self.max, self.min, self.max)
    }

    /// Widens a zero-width extent so it can be divided into bins.
    ///
    /// Extents that already have width are returned unchanged. A degenerate
    /// extent at zero becomes `[-expander, expander]`; elsewhere each end moves
    /// outward by `expander` times its magnitude.
    #[must_use]
    pub fn nonsingular(self, expander: f64) -> Self {
        let max_abs = self.min.abs().max(self.max.abs());
        if self.max - self.min > max_abs * 1e-15 {
            return self;
        }
        if max_abs < 1e-300 {
            return Self {
                min: -expander,
                max: expander,
            };
        }
        Self {
            min: self.min - expander * self.min.abs(),
            max: self.max + expander * self.max.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn joint_extent_spans_both_arrays() {
        let truth = array![1.0, 5.0];
        let prediction = array![0.0, 6.0];

        let extent = Extent::joint(truth.view(), prediction.view()).unwrap();

        assert_eq!(extent.bounds(), (0.0, 6.0, 0.0, 6.0));
    }

    #[test]
    fn joint_extent_of_empty_arrays_is_an_error() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert_eq!(
            Extent::joint(empty.view(), empty.view()),
            Err(CompareError::Empty)
        );
    }

    #[test]
    fn joint_extent_rejects_nan() {
        let truth = array![f64::NAN, 1.0];
        let prediction = array![1.0, f64::NAN];
        assert_eq!(
            Extent::joint(truth.view(), prediction.view()),
            Err(CompareError::NonFinite)
        );
        assert_eq!(
            Extent::joint(prediction.view(), array![2.0].view()),
            Err(CompareError::NonFinite)
        );
    }

    #[test]
    fn including_is_order_independent() {
        let a = Extent::point(3.0).including(-1.0).including(2.0);
        let b = Extent::point(2.0).including(3.0).including(-1.0);
        assert_eq!(a, b);
        assert_eq!(a.bounds(), (-1.0, 3.0, -1.0, 3.0));
    }

    #[test]
    fn nonsingular_widens_only_degenerate_extents() {
        let wide = Extent::point(0.0).including(1.0);
        assert_eq!(wide.nonsingular(0.1), wide);

        let at_zero = Extent::point(0.0).nonsingular(0.1);
        assert_eq!(at_zero.bounds(), (-0.1, 0.1, -0.1, 0.1));

        let at_two = Extent::point(2.0).nonsingular(0.1);
        assert_relative_eq!(at_two.min(), 1.8);
        assert_relative_eq!(at_two.max(), 2.2);
    }
}
