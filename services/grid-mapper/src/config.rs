//! Mapper configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ingestion::ColumnSchema;
use renderer::HeatmapOptions;
use serde::{Deserialize, Serialize};
use timber_common::GridSpec;

/// Default output image name, written next to the input file.
pub const DEFAULT_OUTPUT_FILE: &str = "tree_volume_grid_map.png";

/// Background looked up next to the input when none is configured.
pub const DEFAULT_BACKGROUND_FILE: &str = "background.png";

/// Top-level mapper configuration.
///
/// Every field has a default, so a YAML file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Grid dimensions
    pub grid: GridSpec,

    /// Background image; `background.png` beside the input is used if unset
    pub background: Option<PathBuf>,

    /// Output image name, relative to the input file's directory
    pub output_file: PathBuf,

    /// Input header names
    pub columns: ColumnSchema,

    /// Heatmap rendering options
    pub render: HeatmapOptions,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            background: None,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            columns: ColumnSchema::default(),
            render: HeatmapOptions::default(),
        }
    }
}

impl MapperConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: MapperConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config YAML from {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.grid.x_size == 0 || self.grid.y_size == 0 {
            bail!(
                "grid dimensions must be positive (got x_size={}, y_size={})",
                self.grid.x_size,
                self.grid.y_size
            );
        }
        if self.output_file.as_os_str().is_empty() {
            bail!("output_file must not be empty");
        }
        self.render
            .validate()
            .context("Invalid render configuration")?;
        Ok(())
    }

    /// Where the image for `input` is written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match input.parent() {
            Some(dir) => dir.join(&self.output_file),
            None => self.output_file.clone(),
        }
    }

    /// Background for `input`: the configured one, else `background.png`
    /// beside the input if it exists.
    pub fn background_for(&self, input: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.background {
            return Some(path.clone());
        }
        let candidate = match input.parent() {
            Some(dir) => dir.join(DEFAULT_BACKGROUND_FILE),
            None => PathBuf::from(DEFAULT_BACKGROUND_FILE),
        };
        candidate.is_file().then_some(candidate)
    }
}
