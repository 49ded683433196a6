//! Per-cell accumulation of tree volumes.
//!
//! Accumulation is additive: every placed volume adds to the cell's running
//! sum and count. [`GridAccumulator::reduce`] turns the sums into means in
//! one pass once every tree has been seen.

use timber_common::{GridCoordinate, GridSpec};
use tracing::debug;

use crate::error::{GridProcessorError, Result};
use crate::types::{Placement, VolumeGrid};

/// Mutable accumulation phase of the volume grid.
#[derive(Debug, Clone)]
pub struct GridAccumulator {
    spec: GridSpec,
    sums: Vec<f64>,
    counts: Vec<u32>,
}

impl GridAccumulator {
    /// Create an accumulator with every cell at zero.
    pub fn new(spec: GridSpec) -> Result<Self> {
        if spec.is_empty() {
            return Err(GridProcessorError::EmptyGrid {
                x_size: spec.x_size,
                y_size: spec.y_size,
            });
        }
        Ok(Self {
            spec,
            sums: vec![0.0; spec.len()],
            counts: vec![0; spec.len()],
        })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Add one tree's volume to the cell at `coordinate`.
    ///
    /// Coordinates off the grid leave the accumulator untouched.
    pub fn accumulate(&mut self, coordinate: GridCoordinate, volume: f64) -> Placement {
        match self.spec.index_of(&coordinate) {
            Some((row, column)) => {
                let idx = self.spec.flat_index(row, column);
                self.sums[idx] += volume;
                self.counts[idx] += 1;
                Placement::Placed
            }
            None => Placement::OutOfBounds,
        }
    }

    /// Accumulate every (coordinate, volume) pair, returning how many were placed.
    pub fn accumulate_all<I>(&mut self, placements: I) -> usize
    where
        I: IntoIterator<Item = (GridCoordinate, f64)>,
    {
        placements
            .into_iter()
            .filter(|&(coordinate, volume)| self.accumulate(coordinate, volume).is_placed())
            .count()
    }

    /// Trees placed so far.
    pub fn placed(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Divide each cell's sum by its count. Empty cells stay 0.0.
    pub fn reduce(self) -> VolumeGrid {
        let Self {
            spec,
            sums,
            counts,
        } = self;

        let means: Vec<f64> = sums
            .into_iter()
            .zip(&counts)
            .map(|(sum, &count)| if count > 0 { sum / f64::from(count) } else { 0.0 })
            .collect();

        debug!(
            width = spec.x_size,
            height = spec.y_size,
            occupied = counts.iter().filter(|&&c| c > 0).count(),
            "Reduced volume grid"
        );

        VolumeGrid::from_reduced(spec, means, counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(row: u32, column: u32) -> GridCoordinate {
        GridCoordinate::new(row, column)
    }

    #[test]
    fn test_mean_per_cell() {
        let mut acc = GridAccumulator::new(GridSpec::default()).unwrap();
        assert_eq!(acc.accumulate(coord(3, 4), 1.0), Placement::Placed);
        assert_eq!(acc.accumulate(coord(3, 4), 3.0), Placement::Placed);

        let grid = acc.reduce();
        assert_eq!(grid.get(3, 4), Some(2.0));
        assert_eq!(grid.count(3, 4), Some(2));
        assert_eq!(grid.get(1, 1), Some(0.0));
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn test_out_of_bounds_is_not_placed() {
        let mut acc = GridAccumulator::new(GridSpec::default()).unwrap();
        assert_eq!(acc.accumulate(coord(100, 5), 1.0), Placement::OutOfBounds);
        assert_eq!(acc.accumulate(coord(0, 5), 1.0), Placement::OutOfBounds);
        assert_eq!(acc.accumulate(coord(5, 40), 1.0), Placement::OutOfBounds);
        assert_eq!(acc.placed(), 0);
        assert!(acc.reduce().values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_edges_are_inclusive() {
        let mut acc = GridAccumulator::new(GridSpec::new(39, 32)).unwrap();
        assert!(acc.accumulate(coord(32, 39), 1.0).is_placed());
        assert!(acc.accumulate(coord(1, 1), 1.0).is_placed());
        assert!(!acc.accumulate(coord(33, 1), 1.0).is_placed());
    }

    #[test]
    fn test_accumulate_all_counts_placed() {
        let mut acc = GridAccumulator::new(GridSpec::new(4, 4)).unwrap();
        let placed = acc.accumulate_all(vec![
            (coord(1, 1), 1.0),
            (coord(9, 1), 1.0),
            (coord(4, 4), 2.0),
        ]);
        assert_eq!(placed, 2);
        assert_eq!(acc.placed(), 2);
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert_eq!(
            GridAccumulator::new(GridSpec::new(0, 3)).unwrap_err(),
            GridProcessorError::EmptyGrid {
                x_size: 0,
                y_size: 3
            }
        );
    }
}
