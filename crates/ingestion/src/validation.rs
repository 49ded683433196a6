//! Batch validation of a loaded measurement table.
//!
//! The whole table is checked before any tree is processed, in a fixed
//! order: required columns, numeric fields, form-factor range, positive
//! measurements. The first failing check rejects the batch.

use timber_common::{TimberError, TimberResult, TreeRecord};
use tracing::debug;

use crate::config::ColumnSchema;
use crate::table::{CellValue, Table};

/// Lower bound of the accepted form factor range (inclusive).
pub const MIN_FORM_FACTOR: f64 = 0.4;
/// Upper bound of the accepted form factor range (inclusive).
pub const MAX_FORM_FACTOR: f64 = 0.6;

/// Records that passed every batch check, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedBatch {
    records: Vec<TreeRecord>,
}

impl ValidatedBatch {
    pub fn records(&self) -> &[TreeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TreeRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ValidatedBatch {
    type Item = &'a TreeRecord;
    type IntoIter = std::slice::Iter<'a, TreeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Column positions resolved against one table's header.
struct Columns {
    identifier: usize,
    dbh: usize,
    height: usize,
    form_factor: usize,
    coordinate: usize,
}

/// Validates measurement tables against a [`ColumnSchema`].
#[derive(Debug, Clone, Default)]
pub struct RowValidator {
    schema: ColumnSchema,
}

impl RowValidator {
    pub fn new(schema: ColumnSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Validate the whole table and build typed records.
    ///
    /// No batch is produced if any check fails.
    pub fn validate(&self, table: &Table) -> TimberResult<ValidatedBatch> {
        let columns = self.resolve_columns(table)?;

        let dbh = self.numeric_column(table, &columns, columns.dbh, &self.schema.dbh)?;
        let height = self.numeric_column(table, &columns, columns.height, &self.schema.height)?;
        let form_factor =
            self.numeric_column(table, &columns, columns.form_factor, &self.schema.form_factor)?;

        if let Some(idx) = form_factor
            .iter()
            .position(|ff| !(MIN_FORM_FACTOR..=MAX_FORM_FACTOR).contains(ff))
        {
            return Err(TimberError::OutOfRangeFormFactor {
                record: identifier(table, &columns, idx),
                row: idx + 1,
                value: form_factor[idx],
            });
        }

        for (values, field) in [(&dbh, &self.schema.dbh), (&height, &self.schema.height)] {
            if let Some(idx) = values.iter().position(|v| *v <= 0.0) {
                return Err(TimberError::NonPositiveMeasurement {
                    field: field.clone(),
                    record: identifier(table, &columns, idx),
                    row: idx + 1,
                    value: values[idx],
                });
            }
        }

        let records: Vec<TreeRecord> = table
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| TreeRecord {
                identifier: row[columns.identifier].to_string(),
                dbh_cm: dbh[idx],
                height_m: height[idx],
                form_factor: form_factor[idx],
                coordinate_label: row[columns.coordinate].to_string(),
                source_row: idx + 1,
            })
            .collect();

        debug!(records = records.len(), "Validated measurement batch");

        Ok(ValidatedBatch { records })
    }

    /// Locate every required column, listing all that are absent.
    fn resolve_columns(&self, table: &Table) -> TimberResult<Columns> {
        let required = self.schema.required();
        let missing: Vec<String> = required
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(TimberError::MissingColumns(missing));
        }

        let index = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Columns {
            identifier: index(&self.schema.identifier),
            dbh: index(&self.schema.dbh),
            height: index(&self.schema.height),
            form_factor: index(&self.schema.form_factor),
            coordinate: index(&self.schema.coordinate),
        })
    }

    /// Read a column as finite numbers, failing on the first non-numeric cell.
    fn numeric_column(
        &self,
        table: &Table,
        columns: &Columns,
        column: usize,
        field: &str,
    ) -> TimberResult<Vec<f64>> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let cell = &row[column];
                cell.as_f64().ok_or_else(|| TimberError::NonNumericField {
                    field: field.to_string(),
                    record: identifier(table, columns, idx),
                    row: idx + 1,
                    value: raw_value(cell),
                })
            })
            .collect()
    }
}

fn identifier(table: &Table, columns: &Columns, row: usize) -> String {
    table
        .cell(row, columns.identifier)
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn raw_value(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => "<empty>".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ColumnSchema::default()
            .required()
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn row(id: f64, dbh: f64, height: f64, ff: f64, coord: &str) -> Vec<CellValue> {
        vec![
            CellValue::Number(id),
            CellValue::Number(dbh),
            CellValue::Number(height),
            CellValue::Number(ff),
            CellValue::Text(coord.to_string()),
        ]
    }

    #[test]
    fn test_valid_batch_builds_records() {
        let table = Table::new(
            headers(),
            vec![row(1.0, 30.0, 10.0, 0.5, "C4"), row(2.0, 40.0, 15.0, 0.4, "A1")],
        );
        let batch = RowValidator::default().validate(&table).unwrap();
        assert_eq!(batch.len(), 2);
        let first = &batch.records()[0];
        assert_eq!(first.identifier, "1");
        assert_eq!(first.coordinate_label, "C4");
        assert_eq!(first.source_row, 1);
        assert_eq!(batch.records()[1].form_factor, 0.4);
    }

    #[test]
    fn test_form_factor_bounds_are_inclusive() {
        let table = Table::new(
            headers(),
            vec![row(1.0, 30.0, 10.0, 0.4, "A1"), row(2.0, 30.0, 10.0, 0.6, "A2")],
        );
        assert!(RowValidator::default().validate(&table).is_ok());
    }

    #[test]
    fn test_missing_columns_are_all_listed() {
        let table = Table::new(
            vec!["A/A".into(), "Tree height (meters)".into()],
            vec![],
        );
        let err = RowValidator::default().validate(&table).unwrap_err();
        assert_eq!(
            err,
            TimberError::MissingColumns(vec![
                "DBH (cm)".into(),
                "Form factor (0.4 to 0.6)".into(),
                "Cordinates".into(),
            ])
        );
    }

    #[test]
    fn test_non_numeric_names_record_and_value() {
        let mut rows = vec![row(1.0, 30.0, 10.0, 0.5, "A1"), row(2.0, 30.0, 10.0, 0.5, "A2")];
        rows[1][2] = CellValue::Text("tall".into());
        let err = RowValidator::default()
            .validate(&Table::new(headers(), rows))
            .unwrap_err();
        assert_eq!(
            err,
            TimberError::NonNumericField {
                field: "Tree height (meters)".into(),
                record: "2".into(),
                row: 2,
                value: "tall".into(),
            }
        );
    }

    #[test]
    fn test_numeric_checks_run_column_by_column() {
        // Height is bad in row 1, DBH is bad in row 2: DBH is reported.
        let mut rows = vec![row(1.0, 30.0, 10.0, 0.5, "A1"), row(2.0, 30.0, 10.0, 0.5, "A2")];
        rows[0][2] = CellValue::Empty;
        rows[1][1] = CellValue::Bool(true);
        let err = RowValidator::default()
            .validate(&Table::new(headers(), rows))
            .unwrap_err();
        assert_eq!(err.field(), Some("DBH (cm)"));
    }

    #[test]
    fn test_range_checked_before_positivity() {
        let table = Table::new(
            headers(),
            vec![row(1.0, -5.0, 10.0, 0.5, "A1"), row(2.0, 30.0, 10.0, 0.65, "A2")],
        );
        let err = RowValidator::default().validate(&table).unwrap_err();
        assert!(matches!(
            err,
            TimberError::OutOfRangeFormFactor { row: 2, value, .. } if value == 0.65
        ));
    }

    #[test]
    fn test_non_positive_dbh_then_height() {
        let table = Table::new(
            headers(),
            vec![row(1.0, 30.0, 0.0, 0.5, "A1"), row(2.0, -5.0, 10.0, 0.5, "A2")],
        );
        let err = RowValidator::default().validate(&table).unwrap_err();
        assert_eq!(
            err,
            TimberError::NonPositiveMeasurement {
                field: "DBH (cm)".into(),
                record: "2".into(),
                row: 2,
                value: -5.0,
            }
        );
    }

    #[test]
    fn test_numeric_text_is_accepted_and_empty_coordinate_kept() {
        let mut rows = vec![row(1.0, 30.0, 10.0, 0.5, "")];
        rows[0][1] = CellValue::Text(" 30.5 ".into());
        rows[0][0] = CellValue::Text("T-01".into());
        rows[0][4] = CellValue::Empty;
        let batch = RowValidator::default()
            .validate(&Table::new(headers(), rows))
            .unwrap();
        let record = &batch.records()[0];
        assert_eq!(record.identifier, "T-01");
        assert_eq!(record.dbh_cm, 30.5);
        assert_eq!(record.coordinate_label, "");
    }

    #[test]
    fn test_empty_table_is_an_empty_batch() {
        let batch = RowValidator::default()
            .validate(&Table::new(headers(), vec![]))
            .unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_custom_schema() {
        let schema = ColumnSchema {
            coordinate: "Coordinates".into(),
            ..ColumnSchema::default()
        };
        let mut names = headers();
        names[4] = "Coordinates".into();
        let table = Table::new(names, vec![row(1.0, 30.0, 10.0, 0.5, "B2")]);
        let batch = RowValidator::new(schema).validate(&table).unwrap();
        assert_eq!(batch.records()[0].coordinate_label, "B2");
    }
}
