//! Error types for timber-grid processing.

use thiserror::Error;

/// Result type alias using TimberError.
pub type TimberResult<T> = Result<T, TimberError>;

/// Primary error type for coordinate parsing and batch validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimberError {
    // === Record Errors ===
    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinateFormat(String),

    // === Batch Validation Errors ===
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("{field} values must be numeric (tree {record} in row {row} has '{value}')")]
    NonNumericField {
        field: String,
        record: String,
        row: usize,
        value: String,
    },

    #[error("Form factor must be between 0.4 and 0.6 (tree {record} in row {row} has {value})")]
    OutOfRangeFormFactor {
        record: String,
        row: usize,
        value: f64,
    },

    #[error("{field} must be positive (tree {record} in row {row} has {value})")]
    NonPositiveMeasurement {
        field: String,
        record: String,
        row: usize,
        value: f64,
    },
}

impl TimberError {
    /// Whether this error only affects a single record.
    ///
    /// Record-level errors skip that record's grid placement; everything
    /// else aborts the whole batch before any aggregation.
    pub fn is_record_level(&self) -> bool {
        matches!(self, TimberError::InvalidCoordinateFormat(_))
    }

    /// Name of the input field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            TimberError::NonNumericField { field, .. }
            | TimberError::NonPositiveMeasurement { field, .. } => Some(field),
            TimberError::OutOfRangeFormFactor { .. } => Some("Form factor (0.4 to 0.6)"),
            _ => None,
        }
    }
}
