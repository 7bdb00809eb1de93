//! Sequential cell numbering.

use crate::clip::ClippedCell;
use crate::grid::SQUARE_METRES_PER_ACRE;
use geo::{Area, MultiPolygon};

/// A clipped cell with its output identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    /// 1-based, contiguous, in output order
    pub cell_id: u64,
    pub column: usize,
    pub row: usize,
    pub feature_index: Option<usize>,
    pub geometry: MultiPolygon<f64>,
}

impl CellRecord {
    /// Area in acres, assuming metre coordinates.
    pub fn acres(&self) -> f64 {
        self.geometry.unsigned_area() / SQUARE_METRES_PER_ACRE
    }
}

/// Number cells `1..=N` in their current order.
pub fn assign_ids(cells: Vec<ClippedCell>) -> Vec<CellRecord> {
    cells
        .into_iter()
        .zip(1u64..)
        .map(|(cell, cell_id)| CellRecord {
            cell_id,
            column: cell.column,
            row: cell.row,
            feature_index: cell.feature_index,
            geometry: cell.geometry,
        })
        .collect()
}
