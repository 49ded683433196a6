//! Coordinate labels and their grid indices.
//!
//! A label is one or two uppercase letters followed by a run of digits,
//! e.g. `O13`. The digits give the row, the letters give the column:
//!
//! - one letter `L`: `p(L)` where `p(A) = 1 … p(Z) = 26`
//! - two letters `L1 L2`: `(p(L1) + 1) * 26 + (p(L2) + 1)`
//!
//! The two-letter mapping is not spreadsheet base-26 (`AA` is 54, not 27).
//! Existing plot sheets were surveyed with this numbering, so it is kept
//! exactly.
//!
//! Matching is anchored at the start only; anything after the digit run is
//! ignored (`A5x` is row 5, column 1).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TimberError, TimberResult};

/// Number of letters in the label alphabet.
const ALPHABET_LEN: u32 = 26;

/// Largest column value the two-letter scheme can produce (`ZZ`).
const MAX_COLUMN: u32 = (ALPHABET_LEN + 1) * ALPHABET_LEN + ALPHABET_LEN + 1;

/// Smallest column value the two-letter scheme can produce (`AA`).
const MIN_TWO_LETTER_COLUMN: u32 = 2 * ALPHABET_LEN + 2;

/// A 1-based (row, column) position derived from a coordinate label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoordinate {
    /// Row number, from the digit run
    pub row: u32,
    /// Column number, from the letter prefix
    pub column: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, column {})", self.row, self.column)
    }
}

impl FromStr for GridCoordinate {
    type Err = TimberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinate(s)
    }
}

/// Position of an uppercase ASCII letter, `A` = 1.
#[inline]
fn letter_position(b: u8) -> u32 {
    u32::from(b - b'A') + 1
}

/// Parse a coordinate label such as `"A5"`, `"O13"` or `"AB7"`.
///
/// Returns `InvalidCoordinateFormat` unless the label starts with one or two
/// uppercase letters immediately followed by at least one digit. Whitespace
/// is not trimmed and lowercase letters are rejected.
///
/// Rows too large for `u32` saturate to `u32::MAX`, which no grid contains.
pub fn parse_coordinate(label: &str) -> TimberResult<GridCoordinate> {
    let bytes = label.as_bytes();
    let invalid = || TimberError::InvalidCoordinateFormat(label.to_string());

    let letters = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();
    if !(1..=2).contains(&letters) {
        return Err(invalid());
    }

    let digits = bytes[letters..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(invalid());
    }

    let column = match bytes[..letters] {
        [l] => letter_position(l),
        [l1, l2] => (letter_position(l1) + 1) * ALPHABET_LEN + (letter_position(l2) + 1),
        _ => return Err(invalid()),
    };

    let row = bytes[letters..letters + digits]
        .iter()
        .fold(0u32, |acc, &d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        });

    Ok(GridCoordinate { row, column })
}

/// Letter prefix for a column value, the inverse of the label mapping.
///
/// Returns `None` for values the scheme never produces: 0, 27..=53 and
/// anything above 729.
pub fn column_label(column: u32) -> Option<String> {
    let letter = |idx: u32| char::from(b'A' + idx as u8);

    match column {
        1..=ALPHABET_LEN => Some(letter(column - 1).to_string()),
        MIN_TWO_LETTER_COLUMN..=MAX_COLUMN => {
            let first = (column - 2) / ALPHABET_LEN;
            let second = (column - 2) % ALPHABET_LEN;
            Some(format!("{}{}", letter(first - 2), letter(second)))
        }
        _ => None,
    }
}
