//! # Grid Configuration
//!
//! Parameters of one grid run. The defaults grid the Duncan woods boundary
//! with 60.7 m cells in UTM zone 16N.

use crate::error::{SettingsError, SettingsResult};
use acregrid_core::{ClipOptions, Crs, FragmentPolicy, GridSpec, ACRE_CELL_SIZE, DEFAULT_MAX_CELLS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "acregrid.toml";

/// Configuration for one boundary-to-grid run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Boundary shapefile
    pub input_path: PathBuf,
    /// Grid shapefile to create
    pub output_path: PathBuf,
    /// Cell side length in target CRS units (metres)
    pub grid_size: f64,
    /// Projected CRS the grid is built in
    pub target_epsg: u32,
    /// Dissolve boundary features so each cell yields one record
    pub merge_fragments: bool,
    /// Fragments with this area or less are dropped
    pub min_fragment_area: f64,
    /// Upper bound on lattice cells before clipping
    pub max_cells: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("Duncan_woods.shp"),
            output_path: PathBuf::from("Duncan_woods_1acre_grid.shp"),
            grid_size: ACRE_CELL_SIZE,
            target_epsg: 32616,
            merge_fragments: false,
            min_fragment_area: 0.0,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (expected .toml or .json)",
            path.display()
        ))),
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            tracing::info!("Loading configuration from {}", path.display());
            Self::load_from_file(path)
        } else {
            tracing::debug!("No {} found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(SettingsError::invalid("input_path", "must not be empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(SettingsError::invalid("output_path", "must not be empty"));
        }
        if self.input_path == self.output_path {
            return Err(SettingsError::invalid(
                "output_path",
                "must differ from input_path",
            ));
        }
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(SettingsError::invalid(
                "grid_size",
                format!("must be a positive number, got {}", self.grid_size),
            ));
        }
        if !self.min_fragment_area.is_finite() || self.min_fragment_area < 0.0 {
            return Err(SettingsError::invalid(
                "min_fragment_area",
                format!("must be zero or positive, got {}", self.min_fragment_area),
            ));
        }
        if self.max_cells == 0 {
            return Err(SettingsError::invalid("max_cells", "must be > 0"));
        }
        self.target_crs()?;
        Ok(())
    }

    /// The target CRS, which must be projected with metre units.
    pub fn target_crs(&self) -> SettingsResult<Crs> {
        let crs = Crs::from_epsg(self.target_epsg)
            .map_err(|e| SettingsError::invalid("target_epsg", e.to_string()))?;
        crs.require_projected()
            .map_err(|e| SettingsError::invalid("target_epsg", e.to_string()))?;
        Ok(crs)
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            cell_size: self.grid_size,
            max_cells: self.max_cells,
        }
    }

    pub fn clip_options(&self) -> ClipOptions {
        ClipOptions {
            policy: if self.merge_fragments {
                FragmentPolicy::Merged
            } else {
                FragmentPolicy::PerFeature
            },
            min_fragment_area: self.min_fragment_area,
        }
    }
}
