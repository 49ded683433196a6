//! Column names the measurement sheet must provide.

use serde::{Deserialize, Serialize};

/// Header names for the five required fields.
///
/// The defaults are the field-sheet contract, including the `Cordinates`
/// spelling. Overriding them is only meant for sheets exported by other
/// survey tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub identifier: String,
    pub dbh: String,
    pub height: String,
    pub form_factor: String,
    pub coordinate: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            identifier: "A/A".to_string(),
            dbh: "DBH (cm)".to_string(),
            height: "Tree height (meters)".to_string(),
            form_factor: "Form factor (0.4 to 0.6)".to_string(),
            coordinate: "Cordinates".to_string(),
        }
    }
}

impl ColumnSchema {
    /// Required header names, in reporting order.
    pub fn required(&self) -> [&str; 5] {
        [
            self.identifier.as_str(),
            self.dbh.as_str(),
            self.height.as_str(),
            self.form_factor.as_str(),
            self.coordinate.as_str(),
        ]
    }
}
