//! # Boundary Model
//!
//! The polygon features a grid is clipped against, together with their
//! attribute table and coordinate system.

use crate::crs::Crs;
use crate::error::{CrsResult, GridError, GridResult};
use crate::projection::Transformer;
use geo::{Area, BooleanOps, BoundingRect, CoordsIter, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Logical,
}

/// One attribute column of the boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A single attribute cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Logical(bool),
    Null,
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Logical(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            Self::Null => Ok(()),
        }
    }
}

/// A boundary polygon and its attribute row.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub geometry: MultiPolygon<f64>,
    /// Values in schema order
    pub attributes: Vec<AttributeValue>,
}

impl BoundaryFeature {
    pub fn new(geometry: MultiPolygon<f64>, attributes: Vec<AttributeValue>) -> Self {
        Self {
            geometry,
            attributes,
        }
    }
}

/// A polygon layer with one CRS and one attribute schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub crs: Crs,
    pub schema: Vec<FieldDef>,
    pub features: Vec<BoundaryFeature>,
}

impl Boundary {
    pub fn new(crs: Crs, schema: Vec<FieldDef>, features: Vec<BoundaryFeature>) -> Self {
        Self {
            crs,
            schema,
            features,
        }
    }

    /// True when no feature carries any polygon.
    pub fn is_empty(&self) -> bool {
        self.features.iter().all(|f| f.geometry.0.is_empty())
    }

    /// Total bounds of every feature (`total_bounds`), `None` when empty.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    /// Planar area of all features, in squared CRS units.
    pub fn area(&self) -> f64 {
        self.features
            .iter()
            .map(|f| f.geometry.unsigned_area())
            .sum()
    }

    /// Fail unless every coordinate is finite and at least one polygon exists.
    pub fn validate(&self) -> GridResult<()> {
        if self.is_empty() {
            return Err(GridError::EmptyBoundary);
        }
        for (index, feature) in self.features.iter().enumerate() {
            if feature
                .geometry
                .coords_iter()
                .any(|c| !c.x.is_finite() || !c.y.is_finite())
            {
                return Err(GridError::Geometry(format!(
                    "feature {} has a non-finite coordinate",
                    index
                )));
            }
            if feature.attributes.len() != self.schema.len() {
                return Err(GridError::Geometry(format!(
                    "feature {} has {} attributes, schema has {}",
                    index,
                    feature.attributes.len(),
                    self.schema.len()
                )));
            }
        }
        Ok(())
    }

    /// A copy of this boundary with all geometry in `target`.
    pub fn reproject(&self, target: &Crs) -> CrsResult<Boundary> {
        let transformer = Transformer::new(&self.crs, target)?;
        if transformer.is_identity() {
            tracing::debug!("Boundary already in {}, skipping reprojection", target);
            return Ok(self.clone());
        }

        tracing::info!(
            "Reprojecting {} features from {} to {}",
            self.features.len(),
            transformer.source(),
            transformer.target()
        );
        let features = self
            .features
            .iter()
            .map(|f| {
                Ok(BoundaryFeature {
                    geometry: transformer.transform_multipolygon(&f.geometry)?,
                    attributes: f.attributes.clone(),
                })
            })
            .collect::<CrsResult<Vec<_>>>()?;

        Ok(Boundary {
            crs: target.clone(),
            schema: self.schema.clone(),
            features,
        })
    }

    /// Union of every feature, used when cell fragments are merged.
    pub fn dissolve(&self) -> MultiPolygon<f64> {
        self.features
            .iter()
            .filter(|f| !f.geometry.0.is_empty())
            .fold(MultiPolygon::new(Vec::new()), |acc, f| {
                if acc.0.is_empty() {
                    f.geometry.clone()
                } else {
                    acc.union(&f.geometry)
                }
            })
    }
}
