//! Main Ingester struct for measurement sheet ingestion.

use std::path::Path;

use tracing::{debug, info};

use crate::config::ColumnSchema;
use crate::error::{IngestionError, Result};
use crate::metadata::{detect_file_type, FileType};
use crate::table::Table;
use crate::validation::{RowValidator, ValidatedBatch};

/// Anything that can turn a file path into a [`Table`].
pub trait TableSource {
    fn load_table(&self, path: &Path) -> Result<Table>;
}

/// Core ingester for tree measurement sheets.
///
/// Loads `.xlsx`/`.xlsm` or `.csv` files by extension and validates the
/// resulting table with a [`RowValidator`].
#[derive(Debug, Clone, Default)]
pub struct Ingester {
    validator: RowValidator,
}

impl Ingester {
    /// Create a new Ingester for the given column schema.
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            validator: RowValidator::new(schema),
        }
    }

    pub fn validator(&self) -> &RowValidator {
        &self.validator
    }

    /// Load a file and validate it as one batch.
    pub fn ingest(&self, path: &Path) -> Result<ValidatedBatch> {
        let table = self.load_table(path)?;
        let batch = self.validator.validate(&table)?;

        info!(
            path = %path.display(),
            records = batch.len(),
            "Ingested measurement sheet"
        );

        Ok(batch)
    }
}

impl TableSource for Ingester {
    fn load_table(&self, path: &Path) -> Result<Table> {
        if !path.is_file() {
            return Err(IngestionError::SourceNotFound(path.to_path_buf()));
        }

        let file_type = detect_file_type(path);
        debug!(path = %path.display(), ?file_type, "Loading table");

        let table = match file_type {
            FileType::Xlsx => crate::xlsx::parse_xlsx(&std::fs::read(path)?)?,
            FileType::Csv => crate::csv::parse_csv(&std::fs::read(path)?)?,
            FileType::Unknown => {
                return Err(IngestionError::UnsupportedFormat(path.display().to_string()));
            }
        };

        debug!(
            columns = table.headers().len(),
            rows = table.len(),
            "Loaded table"
        );

        Ok(table)
    }
}

/// Load a table with the default [`Ingester`].
pub fn load_table(path: &Path) -> Result<Table> {
    Ingester::default().load_table(path)
}
