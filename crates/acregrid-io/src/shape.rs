//! Conversion between shapefile polygons and `geo` multipolygons.

use crate::error::{ShapefileError, ShapefileResult};
use geo::{Coord, Intersects, LineString, MultiPolygon, Polygon};
use shapefile::{Point, PolygonRing, Shape};

/// Geometry of one shape record, `None` for a null shape.
///
/// M and Z values are dropped.
pub(crate) fn multipolygon_from_shape(
    shape: Shape,
    record: usize,
) -> ShapefileResult<Option<MultiPolygon<f64>>> {
    let rings = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Polygon(p) => p
            .rings()
            .iter()
            .map(|r| classify(r, |pt| (pt.x, pt.y)))
            .collect::<Vec<_>>(),
        Shape::PolygonM(p) => p
            .rings()
            .iter()
            .map(|r| classify(r, |pt| (pt.x, pt.y)))
            .collect(),
        Shape::PolygonZ(p) => p
            .rings()
            .iter()
            .map(|r| classify(r, |pt| (pt.x, pt.y)))
            .collect(),
        other => {
            return Err(ShapefileError::UnsupportedShape {
                shape_type: format!("{:?}", other.shapetype()),
                record,
            })
        }
    };
    Ok(Some(assemble(rings)))
}

fn classify<P>(ring: &PolygonRing<P>, xy: impl Fn(&P) -> (f64, f64)) -> (bool, LineString<f64>) {
    let (outer, points) = match ring {
        PolygonRing::Outer(points) => (true, points),
        PolygonRing::Inner(points) => (false, points),
    };
    let coords = points
        .iter()
        .map(|p| {
            let (x, y) = xy(p);
            Coord { x, y }
        })
        .collect::<Vec<_>>();
    (outer, LineString::new(coords))
}

/// Group rings into polygons. A hole joins the first exterior containing
/// its first vertex, else the latest exterior. A hole seen before any
/// exterior becomes an exterior itself.
fn assemble(rings: Vec<(bool, LineString<f64>)>) -> MultiPolygon<f64> {
    let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for (outer, ring) in rings {
        if ring.0.len() < 4 {
            tracing::debug!("Skipping degenerate ring with {} points", ring.0.len());
            continue;
        }
        if outer || polygons.is_empty() {
            polygons.push((ring, Vec::new()));
            continue;
        }
        let first_vertex = ring.0[0];
        let host = polygons
            .iter()
            .position(|(exterior, _)| {
                Polygon::new(exterior.clone(), Vec::new()).intersects(&first_vertex)
            })
            .unwrap_or(polygons.len() - 1);
        polygons[host].1.push(ring);
    }
    MultiPolygon::new(
        polygons
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    )
}

/// Shapefile polygon with one outer ring per polygon followed by its holes.
pub(crate) fn shape_from_multipolygon(geometry: &MultiPolygon<f64>) -> shapefile::Polygon {
    let mut rings = Vec::new();
    for polygon in geometry.0.iter() {
        rings.push(PolygonRing::Outer(points(polygon.exterior())));
        rings.extend(
            polygon
                .interiors()
                .iter()
                .map(|hole| PolygonRing::Inner(points(hole))),
        );
    }
    shapefile::Polygon::with_rings(rings)
}

fn points(ring: &LineString<f64>) -> Vec<Point> {
    ring.0.iter().map(|c| Point::new(c.x, c.y)).collect()
}
