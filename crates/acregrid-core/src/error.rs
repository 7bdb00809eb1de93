//! Error types for the core crate.
//!
//! This module provides structured error types for lattice generation,
//! boundary clipping, coordinate reference systems and reprojection.

use thiserror::Error;

/// Errors that can occur while building or clipping a grid.
#[derive(Error, Debug)]
pub enum GridError {
    /// Invalid parameters were provided to the grid generator or clipper.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The boundary layer contains no polygon features.
    #[error("Boundary contains no polygon features")]
    EmptyBoundary,

    /// The lattice would exceed the configured cell limit.
    #[error("Grid of {count} cells exceeds the limit of {limit}")]
    TooManyCells { count: u64, limit: u64 },

    /// A geometry operation failed during clipping.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// A coordinate reference system error occurred.
    #[error(transparent)]
    Crs(#[from] CrsError),
}

/// Errors related to coordinate reference systems and reprojection.
#[derive(Error, Debug)]
pub enum CrsError {
    /// The EPSG code is not in the PROJ database.
    #[error("Unknown EPSG code: {0}")]
    UnknownEpsg(u32),

    /// A projected CRS was required but a geographic one was given.
    #[error("CRS is not projected: {0}")]
    NotProjected(String),

    /// A projected CRS whose linear unit is not the metre.
    #[error("CRS {crs} uses units of {unit} m, metres are required")]
    NotMetric { crs: String, unit: f64 },

    /// GDAL could not interpret the CRS definition.
    #[error("Cannot parse CRS definition: {0}")]
    WktParse(String),

    /// The definition parsed but is neither geographic nor projected.
    #[error("Unsupported CRS definition: {0}")]
    UnsupportedWkt(String),

    /// No coordinate operation exists between two systems.
    #[error("No transformation from {source_crs} to {target_crs}: {reason}")]
    NoTransformation {
        source_crs: String,
        target_crs: String,
        reason: String,
    },

    /// A coordinate could not be transformed.
    #[error("Cannot transform ({x}, {y}): {reason}")]
    TransformFailed { x: f64, y: f64, reason: String },

    /// Any other GDAL/OGR failure.
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Result type alias for CRS operations.
pub type CrsResult<T> = Result<T, CrsError>;
