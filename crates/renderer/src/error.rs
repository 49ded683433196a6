//! Error types for rendering.

use thiserror::Error;

/// Errors that can occur while rendering a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("grid must have at least one row and one column (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    #[error("expected {expected} grid values for the requested dimensions, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} {axis} labels, got {actual}")]
    LabelCountMismatch {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid render option: {0}")]
    InvalidOption(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
