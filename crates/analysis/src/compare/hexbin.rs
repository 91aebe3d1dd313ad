use ndarray::ArrayView1;

use super::{CompareError, Extent};

/// Number of hexagons across the x axis when none is specified.
pub const DEFAULT_GRIDSIZE: usize = 100;

/// Relative widening applied to zero-width extents before binning.
const NONSINGULAR_EXPANDER: f64 = 0.1;

/// Vertex offsets of a hexagon, in units of `(sx, sy / 3)`.
const HEXAGON: [[f64; 2]; 6] = [
    [0.5, -0.5],
    [0.5, 0.5],
    [0.0, 1.0],
    [-0.5, 0.5],
    [-0.5, -0.5],
    [0.0, -1.0],
];

/// One occupied hexagonal bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexCell {
    /// Center of the hexagon in data coordinates.
    pub center: [f64; 2],

    /// Number of points that fell in the hexagon.
    pub count: usize,
}

/// Points counted into a hexagonal grid.
///
/// The grid is two interleaved rectangular lattices: one with centers on the
/// grid corners and one with centers offset by half a cell. Each point goes to
/// whichever lattice center is nearer in the hexagonal metric. Only occupied
/// cells are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    cells: Vec<HexCell>,
    sx: f64,
    sy: f64,
}

impl HexGrid {
    /// Bins `(x[i], y[i])` pairs over a square `extent`.
    ///
    /// `gridsize` is the number of hexagons across the x axis; the y axis gets
    /// `gridsize / √3` so hexagons are regular on a square plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrays differ in length or `gridsize < 2`.
    pub fn bin(
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        extent: Extent,
        gridsize: usize,
    ) -> Result<Self, CompareError> {
        if x.len() != y.len() {
            return Err(CompareError::LengthMismatch {
                truth: x.len(),
                prediction: y.len(),
            });
        }
        if gridsize < 2 {
            return Err(CompareError::GridSize);
        }

        let nx = gridsize;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let ny = ((nx as f64 / 3.0_f64.sqrt()) as usize).max(1);

        // The x range is padded by a relative 1e-9; the y range is not.
        let extent = extent.nonsingular(NONSINGULAR_EXPANDER);
        let padding = 1e-9 * (extent.max() - extent.min());
        let (x_lo, x_hi) = (extent.min() - padding, extent.max() + padding);
        let (y_lo, y_hi) = (extent.min(), extent.max());

        #[allow(clippy::cast_precision_loss)]
        let (sx, sy) = ((x_hi - x_lo) / nx as f64, (y_hi - y_lo) / ny as f64);

        let (nx1, ny1) = (nx + 1, ny + 1);
        let mut corner = vec![0_usize; nx1 * ny1];
        let mut offset = vec![0_usize; nx * ny];

        for (&xi, &yi) in x.iter().zip(y) {
            let ix = (xi - x_lo) / sx;
            let iy = (yi - y_lo) / sy;

            let (ix1, iy1) = (ix.round_ties_even(), iy.round_ties_even());
            let (ix2, iy2) = (ix.floor(), iy.floor());

            let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
            let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);

            if d1 < d2 {
                if let Some(i) = lattice_index(ix1, iy1, nx1, ny1) {
                    corner[i] += 1;
                }
            } else if let Some(i) = lattice_index(ix2, iy2, nx, ny) {
                offset[i] += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let center = |i: usize, rows: usize, shift: f64| {
            [
                x_lo + ((i / rows) as f64 + shift) * sx,
                y_lo + ((i % rows) as f64 + shift) * sy,
            ]
        };

        let cells = corner
            .iter()
            .enumerate()
            .map(|(i, &count)| HexCell {
                center: center(i, ny1, 0.0),
                count,
            })
            .chain(offset.iter().enumerate().map(|(i, &count)| HexCell {
                center: center(i, ny, 0.5),
                count,
            }))
            .filter(|cell| cell.count > 0)
            .collect();

        Ok(Self { cells, sx, sy })
    }

    /// Returns the occupied cells.
    #[must_use]
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Returns the largest count in any cell, or zero for an empty grid.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.cells.iter().map(|c| c.count).max().unwrap_or(0)
    }

    /// Returns the number of binned points.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }

    /// Returns the six vertices of `cell`'s hexagon, counter-clockwise.
    #[must_use]
    pub fn vertices(&self, cell: &HexCell) -> [[f64; 2]; 6] {
        HEXAGON.map(|[dx, dy]| {
            [
                cell.center[0] + dx * self.sx,
                cell.center[1] + dy * self.sy / 3.0,
            ]
        })
    }
}

/// Flat index of lattice point `(ix, iy)`, or `None` if it lies off the lattice.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lattice_index(ix: f64, iy: f64, nx: usize, ny: usize) -> Option<usize> {
    if ix < 0.0 || iy < 0.0 {
        return None;
    }
    let (ix, iy) = (ix as usize, iy as usize);
    (ix < nx && iy < ny).then_some(ix * ny + iy)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    fn grid(x: &Array1<f64>, y: &Array1<f64>, gridsize: usize) -> HexGrid {
        let extent = Extent::joint(x.view(), y.view()).unwrap();
        HexGrid::bin(x.view(), y.view(), extent, gridsize).unwrap()
    }

    #[test]
    fn every_point_lands_in_a_cell() {
        let x = Array1::<f64>::linspace(-3.0, 7.0, 500);
        let y = x.mapv(|v| 0.5 * v + (v * 3.1).sin());

        let grid = grid(&x, &y, 25);

        assert_eq!(grid.total(), 500);
        assert!(grid.cells().iter().all(|c| c.count > 0));
    }

    #[test]
    fn identical_points_share_one_cell() {
        let x = array![1.0, 1.0, 1.0, 4.0];
        let y = array![1.0, 1.0, 1.0, 4.0];

        let grid = grid(&x, &y, 10);

        assert_eq!(grid.max_count(), 3);
        assert_eq!(grid.cells().len(), 2);
    }

    #[test]
    fn degenerate_extent_is_widened() {
        let x = array![2.0, 2.0];
        let y = array![2.0, 2.0];

        let grid = grid(&x, &y, 10);

        assert_eq!(grid.total(), 2);
        assert_eq!(grid.cells().len(), 1);
    }

    #[test]
    fn only_the_horizontal_range_is_padded() {
        let x = array![0.0, 10.0];
        let y = array![0.0, 10.0];

        let grid = grid(&x, &y, 10);

        // ny = trunc(10 / sqrt(3)) = 5 rows over an unpadded range.
        assert_relative_eq!(grid.sy, 2.0, max_relative = 1e-15);
        assert!(grid.sx > 1.0);
        assert_relative_eq!(grid.sx, 1.0, max_relative = 1e-8);
        assert_eq!(grid.total(), 2);
    }

    #[test]
    fn hexagon_is_centered_on_cell() {
        let x = array![0.0, 10.0];
        let y = array![0.0, 10.0];
        let grid = grid(&x, &y, 10);

        for cell in grid.cells() {
            let vertices = grid.vertices(cell);
            let mean_x = vertices.iter().map(|v| v[0]).sum::<f64>() / 6.0;
            let mean_y = vertices.iter().map(|v| v[1]).sum::<f64>() / 6.0;
            assert_relative_eq!(mean_x, cell.center[0], epsilon = 1e-9);
            assert_relative_eq!(mean_y, cell.center[1], epsilon = 1e-9);
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let x = array![0.0, 1.0];
        let y = array![0.0];
        let extent = Extent::point(0.0).including(1.0);

        assert!(matches!(
            HexGrid::bin(x.view(), y.view(), extent, 10),
            Err(CompareError::LengthMismatch { .. })
        ));
        assert_eq!(
            HexGrid::bin(x.view(), x.view(), extent, 1),
            Err(CompareError::GridSize)
        );
    }
}
