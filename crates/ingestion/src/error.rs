//! Error types for the ingestion crate.

use std::path::PathBuf;

use thiserror::Error;
use timber_common::TimberError;

/// Errors that can occur while loading or validating a measurement sheet.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Input file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse xlsx workbook: {0}")]
    Xlsx(String),

    #[error("Failed to parse CSV data: {0}")]
    Csv(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Input sheet has no header row")]
    EmptyTable,

    #[error(transparent)]
    Validation(#[from] TimberError),
}

impl From<zip::result::ZipError> for IngestionError {
    fn from(err: zip::result::ZipError) -> Self {
        IngestionError::Xlsx(err.to_string())
    }
}

impl From<quick_xml::Error> for IngestionError {
    fn from(err: quick_xml::Error) -> Self {
        IngestionError::Xlsx(format!("XML error: {}", err))
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
