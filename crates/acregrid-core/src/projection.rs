//! # Reprojection
//!
//! A [`Transformer`] moves polygon geometry between two [`Crs`] values using
//! the coordinate operation GDAL/PROJ selects for the pair.
//!
//! Coordinates are always `x = easting/longitude`, `y = northing/latitude`,
//! the axis order shapefiles use, whatever the authority's axis order is.

use crate::crs::Crs;
use crate::error::{CrsError, CrsResult};
use gdal::spatial_ref::CoordTransform;
use geo::{Coord, MapCoords, MultiPolygon};
use std::fmt;

/// Moves coordinates from one CRS to another.
pub struct Transformer {
    source: Crs,
    target: Crs,
    /// `None` when source and target are the same system
    operation: Option<CoordTransform>,
}

impl Transformer {
    pub fn new(source: &Crs, target: &Crs) -> CrsResult<Self> {
        let operation = if source == target {
            None
        } else {
            let from = source.spatial_ref()?;
            let to = target.spatial_ref()?;
            let operation =
                CoordTransform::new(&from, &to).map_err(|e| CrsError::NoTransformation {
                    source_crs: source.to_string(),
                    target_crs: target.to_string(),
                    reason: e.to_string(),
                })?;
            Some(operation)
        };
        Ok(Self {
            source: source.clone(),
            target: target.clone(),
            operation,
        })
    }

    pub fn source(&self) -> &Crs {
        &self.source
    }

    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// True when source and target are the same system.
    pub fn is_identity(&self) -> bool {
        self.operation.is_none()
    }

    pub fn transform(&self, coord: Coord<f64>) -> CrsResult<Coord<f64>> {
        match &self.operation {
            Some(operation) => transform_coord(operation, coord),
            None => Ok(coord),
        }
    }

    pub fn transform_multipolygon(
        &self,
        geometry: &MultiPolygon<f64>,
    ) -> CrsResult<MultiPolygon<f64>> {
        match &self.operation {
            Some(operation) => geometry.try_map_coords(|c| transform_coord(operation, c)),
            None => Ok(geometry.clone()),
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("identity", &self.is_identity())
            .finish()
    }
}

fn transform_coord(operation: &CoordTransform, coord: Coord<f64>) -> CrsResult<Coord<f64>> {
    let fail = |reason: String| CrsError::TransformFailed {
        x: coord.x,
        y: coord.y,
        reason,
    };
    if !coord.x.is_finite() || !coord.y.is_finite() {
        return Err(fail("coordinate is not finite".to_string()));
    }
    let mut xs = [coord.x];
    let mut ys = [coord.y];
    let mut zs = [0.0];
    operation
        .transform_coords(&mut xs, &mut ys, &mut zs)
        .map_err(|e| fail(e.to_string()))?;
    if !xs[0].is_finite() || !ys[0].is_finite() {
        return Err(fail("outside the domain of the coordinate operation".to_string()));
    }
    Ok(Coord { x: xs[0], y: ys[0] })
}
