//! # Boundary Loader
//!
//! Reads a polygon shapefile together with its `.dbf` attribute table and
//! `.prj` coordinate system into a [`Boundary`].

use crate::error::{ShapefileError, ShapefileResult};
use crate::shape::multipolygon_from_shape;
use crate::sidecar::read_projection;
use acregrid_core::{AttributeValue, Boundary, BoundaryFeature, FieldDef, FieldKind, GridError};
use shapefile::dbase::{self, FieldType, FieldValue};
use std::path::Path;

/// Load the boundary layer stored at `path`.
///
/// A missing `.dbf` yields features without attributes.
pub fn load_boundary(path: impl AsRef<Path>) -> ShapefileResult<Boundary> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ShapefileError::NotFound(path.to_path_buf()));
    }
    let crs = read_projection(path)?;

    let dbf = path.with_extension("dbf");
    let (schema, features) = if dbf.is_file() {
        read_with_table(path, &dbf)?
    } else {
        tracing::warn!("No attribute table at {}, loading geometry only", dbf.display());
        read_geometry_only(path)?
    };

    if features.is_empty() {
        return Err(GridError::EmptyBoundary.into());
    }
    tracing::info!(
        "Loaded {} features with {} attribute fields from {} ({})",
        features.len(),
        schema.len(),
        path.display(),
        crs
    );
    Ok(Boundary::new(crs, schema, features))
}

fn read_with_table(
    path: &Path,
    dbf: &Path,
) -> ShapefileResult<(Vec<FieldDef>, Vec<BoundaryFeature>)> {
    let shapes = shapefile::ShapeReader::from_path(path)?;
    let table = dbase::Reader::from_path(dbf)?;
    let schema: Vec<FieldDef> = table
        .fields()
        .iter()
        .map(|info| FieldDef::new(info.name(), field_kind(info.field_type())))
        .collect();

    let mut reader = shapefile::Reader::new(shapes, table);
    let mut features = Vec::new();
    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item?;
        let Some(geometry) = multipolygon_from_shape(shape, index)? else {
            tracing::warn!("Skipping null shape in record {}", index);
            continue;
        };
        let attributes = schema
            .iter()
            .map(|field| {
                record
                    .get(&field.name)
                    .map(attribute_value)
                    .unwrap_or(AttributeValue::Null)
            })
            .collect();
        features.push(BoundaryFeature::new(geometry, attributes));
    }
    Ok((schema, features))
}

fn read_geometry_only(path: &Path) -> ShapefileResult<(Vec<FieldDef>, Vec<BoundaryFeature>)> {
    let shapes = shapefile::ShapeReader::from_path(path)?.read()?;
    let mut features = Vec::new();
    for (index, shape) in shapes.into_iter().enumerate() {
        match multipolygon_from_shape(shape, index)? {
            Some(geometry) => features.push(BoundaryFeature::new(geometry, Vec::new())),
            None => tracing::warn!("Skipping null shape in record {}", index),
        }
    }
    Ok((Vec::new(), features))
}

fn field_kind(field_type: FieldType) -> FieldKind {
    match field_type {
        FieldType::Numeric
        | FieldType::Float
        | FieldType::Integer
        | FieldType::Double
        | FieldType::Currency => FieldKind::Number,
        FieldType::Logical => FieldKind::Logical,
        _ => FieldKind::Text,
    }
}

fn attribute_value(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) | FieldValue::Memo(s) => AttributeValue::Text(s.clone()),
        FieldValue::Numeric(Some(n)) => AttributeValue::Number(*n),
        FieldValue::Float(Some(n)) => AttributeValue::Number(f64::from(*n)),
        FieldValue::Integer(n) => AttributeValue::Number(f64::from(*n)),
        FieldValue::Double(n) | FieldValue::Currency(n) => AttributeValue::Number(*n),
        FieldValue::Logical(Some(b)) => AttributeValue::Logical(*b),
        FieldValue::Date(Some(d)) => {
            AttributeValue::Text(format!("{:04}{:02}{:02}", d.year(), d.month(), d.day()))
        }
        _ => AttributeValue::Null,
    }
}
