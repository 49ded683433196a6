//! Error types for grid aggregation.

use thiserror::Error;

/// Errors that can occur while building a volume grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridProcessorError {
    /// The grid has no cells.
    #[error("grid dimensions must be non-zero (got {x_size}x{y_size})")]
    EmptyGrid { x_size: usize, y_size: usize },

    /// A value buffer does not match the grid dimensions.
    #[error("expected {expected} grid values, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },
}

/// Result type for grid processing operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
