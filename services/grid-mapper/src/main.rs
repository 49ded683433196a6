//! Tree volume grid mapper CLI.
//!
//! Turns a measurement sheet into `tree_volume_grid_map.png` and prints a
//! per-tree volume summary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use grid_mapper::{MapperConfig, PipelineDriver, INPUT_CHECKLIST};
use timber_common::GridSpec;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "grid-mapper")]
#[command(about = "Map tree volumes from a measurement sheet onto a plot grid heatmap")]
struct Args {
    /// Measurement sheet (.xlsx or .csv)
    #[arg(env = "GRID_MAPPER_INPUT", default_value = "tree_data.xlsx")]
    input: PathBuf,

    /// Background image drawn under the heatmap
    #[arg(short, long, env = "GRID_MAPPER_BACKGROUND")]
    background: Option<PathBuf>,

    /// Number of grid columns
    #[arg(long, env = "GRID_MAPPER_X_SIZE")]
    x_size: Option<usize>,

    /// Number of grid rows
    #[arg(long, env = "GRID_MAPPER_Y_SIZE")]
    y_size: Option<usize>,

    /// Output image name, relative to the input's directory
    #[arg(short, long, env = "GRID_MAPPER_OUTPUT")]
    output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, env = "GRID_MAPPER_CONFIG")]
    config: Option<PathBuf>,

    /// TrueType font for annotations
    #[arg(long, env = "GRID_MAPPER_FONT")]
    font: Option<PathBuf>,

    /// Cell size in pixels
    #[arg(long, env = "GRID_MAPPER_CELL_SIZE")]
    cell_size: Option<u32>,

    /// Write the volume summary as JSON to this path
    #[arg(long, env = "GRID_MAPPER_SUMMARY_JSON")]
    summary_json: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "GRID_MAPPER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "GRID_MAPPER_JSON_LOGS")]
    json_logs: bool,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides.
    fn mapper_config(&self) -> Result<MapperConfig> {
        let mut config = match &self.config {
            Some(path) => MapperConfig::from_yaml(path)?,
            None => MapperConfig::default(),
        };

        config.grid = GridSpec::new(
            self.x_size.unwrap_or(config.grid.x_size),
            self.y_size.unwrap_or(config.grid.y_size),
        );
        if let Some(background) = &self.background {
            config.background = Some(background.clone());
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if let Some(font) = &self.font {
            config.render.font_path = Some(font.clone());
        }
        if let Some(cell_size) = self.cell_size {
            config.render.cell_size = cell_size;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn write_summary_json(path: &Path, summary: &grid_processor::VolumeSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write summary to {:?}", path))?;
    info!(path = %path.display(), "Wrote summary JSON");
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = args.mapper_config()?;
    info!(
        x_size = config.grid.x_size,
        y_size = config.grid.y_size,
        "Loaded configuration"
    );

    let driver = PipelineDriver::from_config(config)?;
    let report = driver.run(&args.input)?;

    println!("Grid map has been generated as '{}'", report.output_path.display());
    println!();
    print!("{}", report.summary);

    if let Some(path) = &args.summary_json {
        write_summary_json(path, &report.summary)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.json_logs) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    info!(input = %args.input.display(), "Starting tree volume grid mapper");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Grid mapping failed");
            eprintln!("Error: {e:#}");
            eprintln!();
            eprintln!("{INPUT_CHECKLIST}");
            ExitCode::FAILURE
        }
    }
}
