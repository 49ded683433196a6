//! Run totals over every validated tree.
//!
//! Totals include trees that were skipped from the grid: a bad or
//! out-of-range coordinate only affects placement, never the volume count.

use std::fmt;

use serde::Serialize;
use timber_common::{GridCoordinate, TreeRecord};

/// Why a tree was left off the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The coordinate label did not parse.
    InvalidCoordinate,
    /// The label parsed to a cell outside the grid.
    OutOfBounds { row: u32, column: u32 },
}

impl From<GridCoordinate> for SkipReason {
    fn from(coord: GridCoordinate) -> Self {
        SkipReason::OutOfBounds {
            row: coord.row,
            column: coord.column,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidCoordinate => f.write_str("invalid coordinate label"),
            SkipReason::OutOfBounds { row, column } => {
                write!(f, "row {}, column {} is outside the grid", row, column)
            }
        }
    }
}

/// A tree that counted toward the totals but was not placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub identifier: String,
    pub coordinate_label: String,
    pub source_row: usize,
    pub reason: SkipReason,
}

impl SkippedRecord {
    pub fn new(record: &TreeRecord, reason: SkipReason) -> Self {
        Self {
            identifier: record.identifier.clone(),
            coordinate_label: record.coordinate_label.clone(),
            source_row: record.source_row,
            reason,
        }
    }
}

/// Per-tree line of the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeVolume {
    pub identifier: String,
    pub coordinate_label: String,
    pub dbh_cm: f64,
    pub height_m: f64,
    pub volume: f64,
}

impl From<&TreeRecord> for TreeVolume {
    fn from(record: &TreeRecord) -> Self {
        Self {
            identifier: record.identifier.clone(),
            coordinate_label: record.coordinate_label.clone(),
            dbh_cm: record.dbh_cm,
            height_m: record.height_m,
            volume: record.volume(),
        }
    }
}

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSummary {
    trees: Vec<TreeVolume>,
    total_volume: f64,
    skipped: Vec<SkippedRecord>,
}

impl VolumeSummary {
    /// Summarise every record in input order.
    pub fn new(records: &[TreeRecord], skipped: Vec<SkippedRecord>) -> Self {
        let trees: Vec<TreeVolume> = records.iter().map(TreeVolume::from).collect();
        let total_volume = trees.iter().map(|t| t.volume).sum();
        Self {
            trees,
            total_volume,
            skipped,
        }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    /// Mean volume per tree, `None` when there are no trees.
    pub fn average_volume(&self) -> Option<f64> {
        (!self.trees.is_empty()).then(|| self.total_volume / self.trees.len() as f64)
    }

    pub fn trees(&self) -> &[TreeVolume] {
        &self.trees
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Trees that made it onto the grid.
    pub fn placed_count(&self) -> usize {
        self.trees.len().saturating_sub(self.skipped.len())
    }
}

impl fmt::Display for VolumeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Volume calculations summary:")?;
        for tree in &self.trees {
            writeln!(
                f,
                "Tree {} at {}: DBH={}cm, Height={}m, Volume={:.2}m³",
                tree.identifier, tree.coordinate_label, tree.dbh_cm, tree.height_m, tree.volume
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Total number of trees: {}", self.tree_count())?;
        writeln!(f, "Total volume: {:.2}m³", self.total_volume)?;
        match self.average_volume() {
            Some(avg) => writeln!(f, "Average volume per tree: {:.2}m³", avg)?,
            None => writeln!(f, "Average volume per tree: n/a (no trees)")?,
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped from the grid ({}):", self.skipped.len())?;
            for skip in &self.skipped {
                writeln!(
                    f,
                    "  Tree {} at {:?} (row {}): {}",
                    skip.identifier, skip.coordinate_label, skip.source_row, skip.reason
                )?;
            }
        }

        Ok(())
    }
}
