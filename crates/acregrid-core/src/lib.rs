//! # acregrid Core
//!
//! Geometry for turning a boundary layer into a numbered, clipped grid.
//!
//! ## Pipeline pieces
//!
//! - **CRS**: GDAL spatial references from EPSG codes and `.prj` WKT
//! - **Projection**: CRS-to-CRS transformation of polygon geometry
//! - **Boundary**: polygon features with attributes
//! - **Grid**: square lattice over a bounding box
//! - **Clip**: lattice/boundary intersection
//! - **Labeling**: sequential `cell_id` assignment

pub mod boundary;
pub mod clip;
pub mod crs;
pub mod error;
pub mod grid;
pub mod labeling;
pub mod projection;

pub use boundary::{AttributeValue, Boundary, BoundaryFeature, FieldDef, FieldKind};
pub use clip::{clip_lattice, ClipOptions, ClippedCell, FragmentPolicy};
pub use crs::Crs;
pub use error::{CrsError, CrsResult, GridError, GridResult};
pub use grid::{
    axis_steps, GridCell, GridSpec, Lattice, ACRE_CELL_SIZE, DEFAULT_MAX_CELLS,
    SQUARE_METRES_PER_ACRE,
};
pub use labeling::{assign_ids, CellRecord};
pub use projection::Transformer;
