//! # Boundary Clipping
//!
//! Intersects every lattice cell with the boundary polygons. Cells outside
//! the boundary vanish, cells straddling its edge become partial polygons.
//!
//! With [`FragmentPolicy::PerFeature`] each (cell, feature) pair yields its
//! own record, ordered by cell and then by feature. With
//! [`FragmentPolicy::Merged`] the features are dissolved first, so a cell
//! yields at most one record.

use crate::boundary::Boundary;
use crate::error::{GridError, GridResult};
use crate::grid::Lattice;
use geo::{Area, BooleanOps, BoundingRect, Intersects, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

/// How cells covered by several boundary features are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentPolicy {
    /// One record per cell and feature
    #[default]
    PerFeature,
    /// Features are dissolved; one record per cell
    Merged,
}

/// Clipping options.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipOptions {
    pub policy: FragmentPolicy,
    /// Polygon parts with this area or less are dropped
    pub min_fragment_area: f64,
}

/// A cell after intersection with the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedCell {
    pub column: usize,
    pub row: usize,
    /// Source feature, `None` when fragments were merged
    pub feature_index: Option<usize>,
    pub geometry: MultiPolygon<f64>,
}

impl ClippedCell {
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

struct Target {
    feature_index: Option<usize>,
    bounds: Rect<f64>,
    geometry: MultiPolygon<f64>,
}

/// Clip every lattice cell against the boundary.
pub fn clip_lattice(
    lattice: &Lattice,
    boundary: &Boundary,
    options: &ClipOptions,
) -> GridResult<Vec<ClippedCell>> {
    if !options.min_fragment_area.is_finite() || options.min_fragment_area < 0.0 {
        return Err(GridError::InvalidParameters(format!(
            "min_fragment_area must be zero or positive, got {}",
            options.min_fragment_area
        )));
    }
    boundary.validate()?;

    let targets: Vec<Target> = match options.policy {
        FragmentPolicy::PerFeature => boundary
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                feature.geometry.bounding_rect().map(|bounds| Target {
                    feature_index: Some(index),
                    bounds,
                    geometry: feature.geometry.clone(),
                })
            })
            .collect(),
        FragmentPolicy::Merged => {
            let geometry = boundary.dissolve();
            geometry
                .bounding_rect()
                .map(|bounds| Target {
                    feature_index: None,
                    bounds,
                    geometry,
                })
                .into_iter()
                .collect()
        }
    };

    let mut clipped = Vec::new();
    let mut slivers = 0usize;
    for cell in lattice.cells() {
        let square = MultiPolygon::new(vec![cell.polygon()]);
        for target in &targets {
            if !cell.rect.intersects(&target.bounds) {
                continue;
            }
            let overlap = square.intersection(&target.geometry);
            let parts_before = overlap.0.len();
            let parts: Vec<_> = overlap
                .into_iter()
                .filter(|p| p.unsigned_area() > options.min_fragment_area)
                .collect();
            slivers += parts_before - parts.len();
            if parts.is_empty() {
                continue;
            }
            clipped.push(ClippedCell {
                column: cell.column,
                row: cell.row,
                feature_index: target.feature_index,
                geometry: MultiPolygon::new(parts),
            });
        }
    }

    if slivers > 0 {
        tracing::debug!(
            "Dropped {} polygon parts with area <= {}",
            slivers,
            options.min_fragment_area
        );
    }
    tracing::info!(
        "Clipped {} candidate cells to {} fragments",
        lattice.len(),
        clipped.len()
    );
    Ok(clipped)
}
