//! One mapping run: load, validate, place, reduce, render.

use std::fs;
use std::path::{Path, PathBuf};

use grid_processor::{
    GridAccumulator, GridProcessorError, SkipReason, SkippedRecord, VolumeGrid, VolumeSummary,
};
use ingestion::{IngestionError, Ingester, RowValidator, TableSource};
use renderer::{GridRenderer, HeatmapRenderer, RenderError, RenderRequest};
use thiserror::Error;
use timber_common::{axis_labels, GridSpec, TimberError, TreeRecord};
use tracing::{debug, info, warn};

use crate::config::MapperConfig;

/// Errors that abort a run. Per-record problems never end up here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Validation(#[from] TimberError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridProcessorError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub grid: VolumeGrid,
    pub summary: VolumeSummary,
    pub output_path: PathBuf,
}

/// Drives a run from input file to written image.
///
/// The table source and renderer are swappable; the defaults read
/// `.xlsx`/`.csv` files and draw a PNG heatmap.
pub struct PipelineDriver<S = Ingester, R = HeatmapRenderer> {
    config: MapperConfig,
    source: S,
    validator: RowValidator,
    renderer: R,
}

impl PipelineDriver {
    /// Build the default driver for a configuration.
    pub fn from_config(config: MapperConfig) -> Result<Self> {
        let renderer = HeatmapRenderer::new(config.render.clone())?;
        let source = Ingester::new(config.columns.clone());
        Ok(Self::with_components(config, source, renderer))
    }
}

impl<S: TableSource, R: GridRenderer> PipelineDriver<S, R> {
    pub fn with_components(config: MapperConfig, source: S, renderer: R) -> Self {
        let validator = RowValidator::new(config.columns.clone());
        Self {
            config,
            source,
            validator,
            renderer,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run the whole pipeline for one input file.
    ///
    /// Nothing is written unless loading, validation and rendering all
    /// succeed.
    pub fn run(&self, input: &Path) -> Result<PipelineReport> {
        info!(input = %input.display(), "Reading measurement sheet");
        let table = self.source.load_table(input)?;
        let batch = self.validator.validate(&table)?;

        info!(trees = batch.len(), "Processing tree data");
        let (grid, skipped) = aggregate(self.config.grid, batch.records())?;
        let summary = VolumeSummary::new(batch.records(), skipped);

        info!("Creating visualization");
        let request = self.render_request(&grid, input);
        let image = self.renderer.render(&request)?;

        let output_path = self.config.output_path(input);
        fs::write(&output_path, &image).map_err(|source| PipelineError::Write {
            path: output_path.clone(),
            source,
        })?;

        info!(
            output = %output_path.display(),
            bytes = image.len(),
            placed = summary.placed_count(),
            skipped = summary.skipped().len(),
            "Grid map generated"
        );

        Ok(PipelineReport {
            grid,
            summary,
            output_path,
        })
    }

    fn render_request(&self, grid: &VolumeGrid, input: &Path) -> RenderRequest {
        let labels = axis_labels(grid.spec());
        let request = RenderRequest::new(grid.values().to_vec(), grid.width(), grid.height())
            .with_labels(labels.x, labels.y);

        match self.config.background_for(input) {
            Some(background) => {
                debug!(background = %background.display(), "Using background image");
                request.with_background(background)
            }
            None => request,
        }
    }
}

/// Place every record on a fresh grid and reduce it.
///
/// Records whose label does not parse or lands off the grid are logged and
/// returned as skipped, in input order.
pub fn aggregate(
    spec: GridSpec,
    records: &[TreeRecord],
) -> Result<(VolumeGrid, Vec<SkippedRecord>)> {
    let mut accumulator = GridAccumulator::new(spec)?;
    let mut skipped = Vec::new();

    for record in records {
        let coordinate = match record.coordinate() {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!(
                    tree = %record.identifier,
                    row = record.source_row,
                    error = %e,
                    "Skipping tree with invalid coordinate"
                );
                skipped.push(SkippedRecord::new(record, SkipReason::InvalidCoordinate));
                continue;
            }
        };

        if !accumulator.accumulate(coordinate, record.volume()).is_placed() {
            warn!(
                tree = %record.identifier,
                label = %record.coordinate_label,
                %coordinate,
                "Skipping tree outside the grid"
            );
            skipped.push(SkippedRecord::new(record, SkipReason::from(coordinate)));
        }
    }

    debug!(
        placed = accumulator.placed(),
        skipped = skipped.len(),
        "Accumulated tree volumes"
    );

    Ok((accumulator.reduce(), skipped))
}
