//! # Lattice Generation
//!
//! A square lattice anchored at the lower-left corner of a bounding box.
//! Cells step across the box until their lower-left corner reaches the upper
//! bound, so the last row and column may overhang the box; clipping trims
//! them later.
//!
//! Cell origins are `min + index * size`, never a running sum, so large
//! extents do not accumulate rounding error.

use crate::error::{GridError, GridResult};
use geo::{coord, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Default cell side for the "1-acre" grid (m). The cells are about 0.91 acre.
pub const ACRE_CELL_SIZE: f64 = 60.7;
/// Square metres in one international acre.
pub const SQUARE_METRES_PER_ACRE: f64 = 4_046.856_422_4;
/// Default upper bound on lattice size.
pub const DEFAULT_MAX_CELLS: u64 = 10_000_000;

/// Lattice parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Cell side length in CRS units
    pub cell_size: f64,
    /// Refuse lattices with more cells than this
    pub max_cells: u64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell_size: ACRE_CELL_SIZE,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl GridSpec {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GridResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridError::InvalidParameters(format!(
                "grid size must be a positive number, got {}",
                self.cell_size
            )));
        }
        if self.max_cells == 0 {
            return Err(GridError::InvalidParameters(
                "max_cells must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One square of the lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Index along x, from the left
    pub column: usize,
    /// Index along y, from the bottom
    pub row: usize,
    pub rect: Rect<f64>,
}

impl GridCell {
    pub fn polygon(&self) -> Polygon<f64> {
        self.rect.to_polygon()
    }
}

/// Number of cells needed along one axis: the count of indices `i` with
/// `min + i * size < max`.
pub fn axis_steps(min: f64, max: f64, size: f64) -> u64 {
    if !(max > min) {
        return 0;
    }
    let mut steps = ((max - min) / size).ceil() as u64;
    // Division and multiplication round differently; settle on the loop's answer.
    while steps > 0 && min + (steps - 1) as f64 * size >= max {
        steps -= 1;
    }
    while min + steps as f64 * size < max {
        steps += 1;
    }
    steps
}

/// A rectangular lattice covering a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    min_x: f64,
    min_y: f64,
    cell_size: f64,
    columns: usize,
    rows: usize,
}

impl Lattice {
    /// Lattice anchored at `bounds.min()` that covers `bounds`.
    pub fn covering(bounds: Rect<f64>, spec: &GridSpec) -> GridResult<Self> {
        spec.validate()?;
        let min = bounds.min();
        let max = bounds.max();
        if [min.x, min.y, max.x, max.y].iter().any(|v| !v.is_finite()) {
            return Err(GridError::Geometry(
                "bounding box has a non-finite coordinate".to_string(),
            ));
        }

        let columns = axis_steps(min.x, max.x, spec.cell_size);
        let rows = axis_steps(min.y, max.y, spec.cell_size);
        let count = columns.saturating_mul(rows);
        if count > spec.max_cells {
            return Err(GridError::TooManyCells {
                count,
                limit: spec.max_cells,
            });
        }

        tracing::debug!(
            "Lattice {} x {} cells of {} at ({}, {})",
            columns,
            rows,
            spec.cell_size,
            min.x,
            min.y
        );

        Ok(Self {
            min_x: min.x,
            min_y: min.y,
            cell_size: spec.cell_size,
            columns: columns as usize,
            rows: rows as usize,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at the given indices; indices past the lattice extend it.
    pub fn cell(&self, column: usize, row: usize) -> GridCell {
        let x = self.min_x + column as f64 * self.cell_size;
        let y = self.min_y + row as f64 * self.cell_size;
        GridCell {
            column,
            row,
            rect: Rect::new(
                coord! { x: x, y: y },
                coord! { x: x + self.cell_size, y: y + self.cell_size },
            ),
        }
    }

    /// All cells, column by column, bottom to top within a column.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.columns).flat_map(move |column| (0..self.rows).map(move |row| self.cell(column, row)))
    }

    /// Area covered by the whole lattice, overhang included.
    pub fn extent(&self) -> Option<Rect<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! {
                x: self.min_x + self.columns as f64 * self.cell_size,
                y: self.min_y + self.rows as f64 * self.cell_size,
            },
        ))
    }
}
