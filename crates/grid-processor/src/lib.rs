//! Aggregation of tree volumes onto the plot grid.
//!
//! Each tree's volume is added to the cell named by its coordinate, and the
//! per-cell sums are reduced to means once every tree has been seen.
//!
//! # Architecture
//!
//! ```text
//! (GridCoordinate, volume) per tree
//!      │
//!      ▼
//! GridAccumulator::accumulate ──► Placement::{Placed, OutOfBounds}
//!      │
//!      ▼
//! GridAccumulator::reduce ──► VolumeGrid (mean per cell, 0.0 when empty)
//! ```
//!
//! # Example
//!
//! ```
//! use grid_processor::GridAccumulator;
//! use timber_common::{GridCoordinate, GridSpec};
//!
//! let mut acc = GridAccumulator::new(GridSpec::default()).unwrap();
//! acc.accumulate(GridCoordinate::new(3, 4), 1.0);
//! acc.accumulate(GridCoordinate::new(3, 4), 3.0);
//! let grid = acc.reduce();
//! assert_eq!(grid.get(3, 4), Some(2.0));
//! ```

pub mod accumulator;
pub mod error;
pub mod summary;
pub mod types;

// Re-export commonly used types at crate root
pub use accumulator::GridAccumulator;
pub use error::{GridProcessorError, Result};
pub use summary::{SkipReason, SkippedRecord, TreeVolume, VolumeSummary};
pub use types::{Placement, VolumeGrid};
