//! Core types for grid aggregation.

use serde::{Deserialize, Serialize};
use timber_common::GridSpec;

use crate::error::{GridProcessorError, Result};

/// Outcome of placing one volume on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The volume was added to a cell.
    Placed,
    /// The coordinate lies outside the grid; nothing was added.
    OutOfBounds,
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed)
    }
}

/// Mean tree volume per cell after reduction.
///
/// Values are row-major, row 1 first. Cells that received no trees hold 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeGrid {
    spec: GridSpec,
    values: Vec<f64>,
    counts: Vec<u32>,
}

impl VolumeGrid {
    /// Build a grid from row-major means and per-cell tree counts.
    pub fn from_parts(spec: GridSpec, values: Vec<f64>, counts: Vec<u32>) -> Result<Self> {
        if spec.is_empty() {
            return Err(GridProcessorError::EmptyGrid {
                x_size: spec.x_size,
                y_size: spec.y_size,
            });
        }
        for actual in [values.len(), counts.len()] {
            if actual != spec.len() {
                return Err(GridProcessorError::ValueCountMismatch {
                    expected: spec.len(),
                    actual,
                });
            }
        }
        Ok(Self {
            spec,
            values,
            counts,
        })
    }

    /// Buffers sized by the accumulator, which already checked the spec.
    pub(crate) fn from_reduced(spec: GridSpec, values: Vec<f64>, counts: Vec<u32>) -> Self {
        Self {
            spec,
            values,
            counts,
        }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.spec.x_size
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.spec.y_size
    }

    /// Mean volume at a 1-based (row, column), `None` off the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.index(row, column).map(|idx| self.values[idx])
    }

    /// Number of trees averaged into a 1-based (row, column).
    pub fn count(&self, row: usize, column: usize) -> Option<u32> {
        self.index(row, column).map(|idx| self.counts[idx])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Iterate rows top to bottom (row 1 first).
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks(self.spec.x_size)
    }

    /// Cells that received at least one tree.
    pub fn occupied_cells(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        let in_bounds =
            (1..=self.spec.y_size).contains(&row) && (1..=self.spec.x_size).contains(&column);
        in_bounds.then(|| self.spec.flat_index(row - 1, column - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> VolumeGrid {
        let spec = GridSpec::new(3, 2);
        VolumeGrid::from_parts(
            spec,
            vec![0.0, 2.0, 0.0, 0.5, 0.0, 4.0],
            vec![0, 2, 0, 1, 0, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_get_is_one_based() {
        let grid = grid();
        assert_eq!(grid.get(1, 2), Some(2.0));
        assert_eq!(grid.get(2, 3), Some(4.0));
        assert_eq!(grid.count(2, 1), Some(1));
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(3, 1), None);
        assert_eq!(grid.get(1, 4), None);
    }

    #[test]
    fn test_rows_and_stats() {
        let grid = grid();
        let rows: Vec<&[f64]> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0.5, 0.0, 4.0]);
        assert_eq!(grid.occupied_cells(), 3);
        assert_eq!(grid.max_value(), Some(4.0));
        assert_eq!(grid.min_value(), Some(0.0));
    }

    #[test]
    fn test_from_parts_checks_dimensions() {
        assert_eq!(
            VolumeGrid::from_parts(GridSpec::new(2, 2), vec![0.0; 3], vec![0; 4]),
            Err(GridProcessorError::ValueCountMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert!(matches!(
            VolumeGrid::from_parts(GridSpec::new(0, 2), vec![], vec![]),
            Err(GridProcessorError::EmptyGrid { .. })
        ));
    }
}
