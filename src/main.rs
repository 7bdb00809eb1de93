use acregrid::{init_logging, run_pipeline, GridConfig, BUILD_DATE, DEFAULT_CONFIG_FILE, VERSION};
use anyhow::Context;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("acregrid {} (built {})", VERSION, BUILD_DATE);

    // Optional first argument: a .toml or .json config file.
    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            GridConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => GridConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    let summary = run_pipeline(&config)?;
    tracing::info!(
        "{} of {} grid cells kept, {:.2} acres",
        summary.cells_written,
        summary.lattice_cells,
        summary.total_acres
    );
    println!("1-acre grid saved as: {}", summary.output_path.display());
    Ok(())
}
