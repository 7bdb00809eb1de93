//! # acregrid I/O
//!
//! Shapefile reading and writing for the grid pipeline.
//!
//! - [`load_boundary`]: polygon layer, attribute table and `.prj` CRS
//! - [`write_cells`]: numbered cells with carried attributes, `.prj` and `.cpg`

pub mod error;
pub mod reader;
mod shape;
pub mod sidecar;
pub mod writer;

pub use error::{ShapefileError, ShapefileResult};
pub use reader::load_boundary;
pub use sidecar::{read_projection, write_code_page, write_projection, CODE_PAGE};
pub use writer::{write_cells, CELL_ID_FIELD};
