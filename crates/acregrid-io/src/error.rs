//! Error types for the shapefile I/O crate.
//!
//! Wraps the `shapefile` and `dbase` crates' errors together with the
//! format problems this tool detects itself.

use acregrid_core::{CrsError, GridError};
use shapefile::dbase;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing shapefiles.
#[derive(Error, Debug)]
pub enum ShapefileError {
    /// The `.shp` file does not exist.
    #[error("Shapefile not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A shape of a non-polygon type was found.
    #[error("Unsupported shape type {shape_type} in record {record}")]
    UnsupportedShape { shape_type: String, record: usize },

    /// The `.prj` sidecar is missing, so the CRS is unknown.
    #[error("Missing projection file {}", .0.display())]
    MissingProjection(PathBuf),

    /// An attribute name cannot be stored in a dBase header.
    #[error("Invalid dBase field name '{0}'")]
    InvalidFieldName(String),

    /// Error reported by the shapefile reader or writer.
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Error reported by the dBase reader or writer.
    #[error("dBase error: {0}")]
    Dbase(#[from] dbase::Error),

    /// I/O error on a sidecar file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CRS error while interpreting or writing the `.prj` sidecar.
    #[error(transparent)]
    Crs(#[from] CrsError),

    /// Geometry error while assembling features.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type alias for shapefile operations.
pub type ShapefileResult<T> = Result<T, ShapefileError>;
