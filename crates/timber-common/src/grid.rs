//! Grid specification for the plot aggregation grid.

use serde::{Deserialize, Serialize};

use crate::coordinate::GridCoordinate;

/// Default number of columns.
pub const DEFAULT_X_SIZE: usize = 39;

/// Default number of rows.
pub const DEFAULT_Y_SIZE: usize = 32;

/// Dimensions of the fixed-size aggregation grid.
///
/// `x_size` is the width (number of columns), `y_size` the height
/// (number of rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x_size: usize,
    pub y_size: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x_size: DEFAULT_X_SIZE,
            y_size: DEFAULT_Y_SIZE,
        }
    }
}

impl GridSpec {
    pub fn new(x_size: usize, y_size: usize) -> Self {
        Self { x_size, y_size }
    }

    /// Whether a 1-based coordinate lies on the grid.
    ///
    /// The row is checked against `y_size` and the column against `x_size`.
    pub fn contains(&self, coord: &GridCoordinate) -> bool {
        let row = coord.row as usize;
        let column = coord.column as usize;
        (1..=self.y_size).contains(&row) && (1..=self.x_size).contains(&column)
    }

    /// 0-based (row, column) indices for a coordinate, if it is on the grid.
    pub fn index_of(&self, coord: &GridCoordinate) -> Option<(usize, usize)> {
        self.contains(coord)
            .then(|| (coord.row as usize - 1, coord.column as usize - 1))
    }

    /// Row-major flat index for 0-based (row, column) indices.
    pub fn flat_index(&self, row: usize, column: usize) -> usize {
        row * self.x_size + column
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.x_size * self.y_size
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.x_size == 0 || self.y_size == 0
    }
}

/// Tick labels for a rendered grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    /// One label per column, left to right
    pub x: Vec<String>,
    /// One label per row, top to bottom
    pub y: Vec<String>,
}

/// Tick label for a 1-based row.
///
/// Rows 1 to 26 are `A` to `Z`, then `AA`, `AB`, ... up to `ZZ` for row 702.
/// Rows past that are labelled with their number.
pub fn row_label(row: usize) -> String {
    let letter = |idx: usize| char::from(b'A' + idx as u8);

    match row {
        1..=26 => letter(row - 1).to_string(),
        27..=702 => {
            let offset = row - 27;
            format!("{}{}", letter(offset / 26), letter(offset % 26))
        }
        _ => row.to_string(),
    }
}

/// Build the axis labels for a grid.
///
/// Columns are numbered `1..=x_size`. Rows are lettered with [`row_label`]
/// and listed in reverse, so the last row label sits at the top.
pub fn axis_labels(spec: &GridSpec) -> AxisLabels {
    let x = (1..=spec.x_size).map(|i| i.to_string()).collect();
    let y = (1..=spec.y_size).rev().map(row_label).collect();

    AxisLabels { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let spec = GridSpec::default();
        assert_eq!(spec.x_size, 39);
        assert_eq!(spec.y_size, 32);
        assert_eq!(spec.len(), 39 * 32);
    }

    #[test]
    fn test_contains_checks_row_against_height() {
        let spec = GridSpec::default();
        assert!(spec.contains(&GridCoordinate::new(32, 39)));
        assert!(!spec.contains(&GridCoordinate::new(33, 1)));
        assert!(spec.contains(&GridCoordinate::new(1, 39)));
        assert!(!spec.contains(&GridCoordinate::new(1, 40)));
        assert!(!spec.contains(&GridCoordinate::new(0, 1)));
        assert!(!spec.contains(&GridCoordinate::new(100, 5)));
    }

    #[test]
    fn test_index_of_is_zero_based() {
        let spec = GridSpec::new(4, 3);
        assert_eq!(spec.index_of(&GridCoordinate::new(1, 1)), Some((0, 0)));
        assert_eq!(spec.index_of(&GridCoordinate::new(3, 4)), Some((2, 3)));
        assert_eq!(spec.index_of(&GridCoordinate::new(4, 1)), None);
        assert_eq!(spec.flat_index(2, 3), 11);
    }

    #[test]
    fn test_axis_labels() {
        let labels = axis_labels(&GridSpec::new(3, 4));
        assert_eq!(labels.x, vec!["1", "2", "3"]);
        assert_eq!(labels.y, vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn test_axis_labels_past_single_letters() {
        let labels = axis_labels(&GridSpec::default());
        assert_eq!(labels.y.len(), 32);
        assert_eq!(&labels.y[..6], &["AF", "AE", "AD", "AC", "AB", "AA"]);
        assert_eq!(labels.y[6], "Z");
        assert_eq!(labels.y[31], "A");
    }

    #[test]
    fn test_row_label_sequence() {
        assert_eq!(row_label(1), "A");
        assert_eq!(row_label(26), "Z");
        assert_eq!(row_label(27), "AA");
        assert_eq!(row_label(52), "AZ");
        assert_eq!(row_label(53), "BA");
        assert_eq!(row_label(702), "ZZ");
        assert_eq!(row_label(703), "703");
        assert_eq!(row_label(0), "0");
    }
}
