//! Validated tree measurements.

use serde::{Deserialize, Serialize};

use crate::coordinate::{parse_coordinate, GridCoordinate};
use crate::error::TimberResult;
use crate::volume::compute_volume;

/// One measured tree.
///
/// Built only from a batch that passed validation, so the numeric fields
/// always satisfy their range contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Opaque identifier from the input, used in diagnostics
    pub identifier: String,
    /// Diameter at breast height in centimeters
    pub dbh_cm: f64,
    /// Tree height in meters
    pub height_m: f64,
    /// Form factor in [0.4, 0.6]
    pub form_factor: f64,
    /// Raw coordinate label, parsed lazily per record
    pub coordinate_label: String,
    /// 1-based data row in the source table
    pub source_row: usize,
}

impl TreeRecord {
    /// Stem volume in cubic meters.
    pub fn volume(&self) -> f64 {
        compute_volume(self.dbh_cm, self.height_m, self.form_factor)
    }

    /// Parse this record's coordinate label.
    pub fn coordinate(&self) -> TimberResult<GridCoordinate> {
        parse_coordinate(&self.coordinate_label)
    }
}
