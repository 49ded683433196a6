//! Common types and utilities shared across the timber-grid crates.
//!
//! Covers the pieces every stage of the mapper agrees on: the grid
//! dimensions, the coordinate label scheme, the tree record and the
//! volume formula.

pub mod coordinate;
pub mod error;
pub mod grid;
pub mod record;
pub mod volume;

pub use coordinate::{column_label, parse_coordinate, GridCoordinate};
pub use error::{TimberError, TimberResult};
pub use grid::{axis_labels, row_label, AxisLabels, GridSpec};
pub use record::TreeRecord;
pub use volume::compute_volume;
