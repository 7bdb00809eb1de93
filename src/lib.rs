//! # acregrid
//!
//! Overlays a grid of roughly one-acre squares on a forest boundary
//! shapefile, clips the grid to the boundary, numbers the surviving cells
//! and writes them to a new shapefile.
//!
//! ## Architecture
//!
//! 1. **acregrid-core** - CRS handling, projection, lattice, clipping, numbering
//! 2. **acregrid-io** - Shapefile loading and writing
//! 3. **acregrid-settings** - `GridConfig` loading and validation
//! 4. **acregrid** - Logging setup and the pipeline that ties them together

use anyhow::Context;
use std::path::PathBuf;

pub use acregrid_core::{
    assign_ids, clip_lattice, Boundary, CellRecord, ClipOptions, Crs, FragmentPolicy, GridError,
    GridSpec, Lattice, SQUARE_METRES_PER_ACRE,
};
pub use acregrid_io::{load_boundary, write_cells, ShapefileError};
pub use acregrid_settings::{GridConfig, SettingsError, DEFAULT_CONFIG_FILE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Environment variable selecting JSON log lines when set to `json`.
pub const LOG_FORMAT_ENV: &str = "ACREGRID_LOG_FORMAT";

/// Initialize logging with the default configuration
///
/// Logs go to stderr so stdout only carries the result line. The level is
/// taken from `RUST_LOG` (default `info`).
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let json_layer = json.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub target: Crs,
    /// Cells in the lattice before clipping
    pub lattice_cells: usize,
    /// Records written, numbered `1..=cells_written`
    pub cells_written: usize,
    /// Sum of the written cell areas in acres
    pub total_acres: f64,
}

/// Load, project, grid, clip, number and write, as configured.
pub fn run_pipeline(config: &GridConfig) -> anyhow::Result<RunSummary> {
    config.validate().context("Invalid configuration")?;
    let target = config.target_crs()?;

    let boundary = load_boundary(&config.input_path).with_context(|| {
        format!("Failed to load boundary {}", config.input_path.display())
    })?;
    let projected = boundary
        .reproject(&target)
        .with_context(|| format!("Failed to project boundary to {}", target))?;

    let bounds = projected.bounds().ok_or(GridError::EmptyBoundary)?;
    tracing::info!(
        "Projected bounds: ({:.3}, {:.3}) - ({:.3}, {:.3}), {:.2} acres",
        bounds.min().x,
        bounds.min().y,
        bounds.max().x,
        bounds.max().y,
        projected.area() / SQUARE_METRES_PER_ACRE
    );

    let lattice = Lattice::covering(bounds, &config.grid_spec()).context("Failed to build grid")?;
    tracing::info!(
        "Grid of {} x {} cells at {} m",
        lattice.columns(),
        lattice.rows(),
        lattice.cell_size()
    );
    if let Some(extent) = lattice.extent() {
        tracing::debug!(
            "Grid extent: ({:.3}, {:.3}) - ({:.3}, {:.3})",
            extent.min().x,
            extent.min().y,
            extent.max().x,
            extent.max().y
        );
    }

    let clipped = clip_lattice(&lattice, &projected, &config.clip_options())
        .context("Failed to clip grid to boundary")?;
    let records = assign_ids(clipped);

    write_cells(&config.output_path, &records, &projected).with_context(|| {
        format!("Failed to write grid {}", config.output_path.display())
    })?;

    Ok(RunSummary {
        output_path: config.output_path.clone(),
        target,
        lattice_cells: lattice.len(),
        cells_written: records.len(),
        total_acres: records.iter().map(CellRecord::acres).sum(),
    })
}
