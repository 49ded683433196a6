//! Tree measurement ingestion library.
//!
//! Loads a measurement sheet into an in-memory [`Table`] and validates the
//! whole batch before any tree is processed.
//!
//! # Architecture
//!
//! ```text
//! tree_data.xlsx / tree_data.csv
//!      │
//!      ▼
//! Ingester::load_table ──► Table (headers + typed cells)
//!      │
//!      ▼
//! RowValidator::validate ──► ValidatedBatch (Vec<TreeRecord>)
//! ```
//!
//! Validation is all-or-nothing: a single missing column, non-numeric value
//! or out-of-range measurement rejects the batch.

pub mod config;
mod csv;
pub mod error;
mod ingester;
pub mod metadata;
pub mod table;
pub mod validation;
mod xlsx;

// Re-exports
pub use config::ColumnSchema;
pub use error::{IngestionError, Result};
pub use ingester::{load_table, Ingester, TableSource};
pub use metadata::{detect_file_type, FileType};
pub use table::{CellValue, Table};
pub use validation::{RowValidator, ValidatedBatch};

/// Parse CSV bytes into a [`Table`].
pub fn parse_csv(data: &[u8]) -> Result<Table> {
    csv::parse_csv(data)
}

/// Parse xlsx bytes into a [`Table`] from the first worksheet.
pub fn parse_xlsx(data: &[u8]) -> Result<Table> {
    xlsx::parse_xlsx(data)
}
