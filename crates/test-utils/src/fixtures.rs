//! Common test fixtures for timber-grid tests.
//!
//! Rows are built from [`SheetValue`] so the same fixture can be written as
//! an `.xlsx` workbook (typed cells) or a `.csv` file (plain text).

/// Identifier column header.
pub const ID_COLUMN: &str = "A/A";
/// Diameter at breast height column header.
pub const DBH_COLUMN: &str = "DBH (cm)";
/// Tree height column header.
pub const HEIGHT_COLUMN: &str = "Tree height (meters)";
/// Form factor column header.
pub const FORM_FACTOR_COLUMN: &str = "Form factor (0.4 to 0.6)";
/// Coordinate label column header (spelled as in the field sheets).
pub const COORDINATE_COLUMN: &str = "Cordinates";

/// The five required headers in their usual order.
pub const REQUIRED_HEADERS: [&str; 5] = [
    ID_COLUMN,
    DBH_COLUMN,
    HEIGHT_COLUMN,
    FORM_FACTOR_COLUMN,
    COORDINATE_COLUMN,
];

/// A single cell value in a fixture sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue {
    Number(f64),
    Text(String),
    Empty,
}

impl SheetValue {
    /// Plain-text rendering used for CSV output.
    pub fn to_csv_field(&self) -> String {
        match self {
            SheetValue::Number(n) => n.to_string(),
            SheetValue::Text(s) if s.contains(|c: char| matches!(c, ',' | '"' | '\n')) => {
                format!("\"{}\"", s.replace('"', "\"\""))
            }
            SheetValue::Text(s) => s.clone(),
            SheetValue::Empty => String::new(),
        }
    }
}

impl From<f64> for SheetValue {
    fn from(n: f64) -> Self {
        SheetValue::Number(n)
    }
}

impl From<&str> for SheetValue {
    fn from(s: &str) -> Self {
        SheetValue::Text(s.to_string())
    }
}

/// A header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetFixture {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<SheetValue>>,
}

impl SheetFixture {
    /// An empty sheet with the required headers.
    pub fn with_required_headers() -> Self {
        Self {
            headers: REQUIRED_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a tree row in required-header order.
    pub fn tree(mut self, id: f64, dbh: f64, height: f64, form_factor: f64, coord: &str) -> Self {
        self.rows.push(tree_row(id, dbh, height, form_factor, coord));
        self
    }

    /// Append an arbitrary row.
    pub fn row(mut self, row: Vec<SheetValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Remove a column by header name.
    pub fn without_column(mut self, header: &str) -> Self {
        if let Some(idx) = self.headers.iter().position(|h| h == header) {
            self.headers.remove(idx);
            for row in &mut self.rows {
                if idx < row.len() {
                    row.remove(idx);
                }
            }
        }
        self
    }
}

/// A tree row in required-header order.
pub fn tree_row(id: f64, dbh: f64, height: f64, form_factor: f64, coord: &str) -> Vec<SheetValue> {
    vec![
        SheetValue::Number(id),
        SheetValue::Number(dbh),
        SheetValue::Number(height),
        SheetValue::Number(form_factor),
        SheetValue::Text(coord.to_string()),
    ]
}

/// A small plot survey exercising every per-record path.
///
/// - trees 1 and 2 share cell `C4` (row 4, column 3)
/// - tree 3 sits alone at `O13`
/// - tree 4 has an unparsable label
/// - tree 5 parses to row 100, outside the default grid
pub fn sample_survey() -> SheetFixture {
    SheetFixture::with_required_headers()
        .tree(1.0, 30.0, 10.0, 0.5, "C4")
        .tree(2.0, 40.0, 15.0, 0.45, "C4")
        .tree(3.0, 25.0, 12.0, 0.6, "O13")
        .tree(4.0, 20.0, 8.0, 0.4, "4C")
        .tree(5.0, 35.0, 14.0, 0.55, "E100")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_survey_shape() {
        let survey = sample_survey();
        assert_eq!(survey.headers.len(), 5);
        assert_eq!(survey.rows.len(), 5);
        assert!(survey.rows.iter().all(|r| r.len() == 5));
    }

    #[test]
    fn test_without_column() {
        let survey = sample_survey().without_column(DBH_COLUMN);
        assert_eq!(survey.headers.len(), 4);
        assert!(!survey.headers.iter().any(|h| h == DBH_COLUMN));
        assert!(survey.rows.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(SheetValue::from("a,b").to_csv_field(), "\"a,b\"");
        assert_eq!(SheetValue::from("say \"hi\"").to_csv_field(), "\"say \"\"hi\"\"\"");
        assert_eq!(SheetValue::Number(0.5).to_csv_field(), "0.5");
        assert_eq!(SheetValue::Empty.to_csv_field(), "");
    }
}
