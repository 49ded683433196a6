//! In-memory representation of a loaded measurement sheet.

use std::fmt;

/// A single cell value as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Interpret the cell as a finite real number.
    ///
    /// Number cells and text cells whose trimmed content parses as a float
    /// are numeric. Empty cells, booleans, NaN and infinities are not.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty | CellValue::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Classify a raw text field: numbers become `Number`, blanks `Empty`.
    pub(crate) fn from_text(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else if let Ok(n) = trimmed.parse::<f64>() {
            CellValue::Number(n)
        } else {
            CellValue::Text(field.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    /// Integral numbers print without a fractional part (`1.0` → `1`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A header row plus data rows, in source order.
///
/// Every data row has exactly one cell per header; short rows are padded
/// with [`CellValue::Empty`] and overlong rows are truncated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with exactly this header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at a 0-based data row and column.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All values of a named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(move |r| r.get(idx)))
    }
}
