//! Tree volume grid mapper.
//!
//! Reads a tree measurement sheet, computes each tree's stem volume, averages
//! the volumes per plot grid cell and renders the grid as a heatmap next to
//! the input file.

pub mod config;
pub mod pipeline;

pub use config::MapperConfig;
pub use pipeline::{aggregate, PipelineDriver, PipelineError, PipelineReport};

/// Reminder of the input contract, printed when a run fails.
pub const INPUT_CHECKLIST: &str = "\
Please ensure:
1. The input file exists (default: tree_data.xlsx in the working directory)
2. It has the columns 'A/A', 'DBH (cm)', 'Tree height (meters)', 'Form factor (0.4 to 0.6)' and 'Cordinates'
3. Form factor values are between 0.4 and 0.6
4. All measurements (DBH, height) are positive numbers
5. A background image, if used, is named 'background.png' and sits next to the input file (or is given with --background)";
