//! # Grid Writer
//!
//! Writes numbered cells to a shapefile. The dBase table carries the source
//! feature's attributes followed by `cell_id`.

use crate::error::{ShapefileError, ShapefileResult};
use crate::shape::shape_from_multipolygon;
use crate::sidecar::{write_code_page, write_projection};
use acregrid_core::{AttributeValue, Boundary, CellRecord, FieldKind, GridError};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use std::path::Path;

/// Name of the identifier column.
pub const CELL_ID_FIELD: &str = "cell_id";

const MAX_CHARACTER_LENGTH: usize = 254;

/// dBase column type chosen for a carried field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Character { length: u8 },
    Numeric { length: u8, decimals: u8 },
    Logical,
}

struct OutputField {
    /// Index into the boundary schema
    source: usize,
    name: String,
    column: Column,
}

/// Write `records` to `path` in the CRS of `boundary`.
///
/// `boundary` supplies the attribute schema and the rows that
/// `feature_index` refers to.
pub fn write_cells(
    path: impl AsRef<Path>,
    records: &[CellRecord],
    boundary: &Boundary,
) -> ShapefileResult<()> {
    let path = path.as_ref();
    let fields = plan_fields(records, boundary);

    let mut builder = TableWriterBuilder::new();
    for field in &fields {
        let name = field_name(&field.name)?;
        builder = match field.column {
            Column::Character { length } => builder.add_character_field(name, length),
            Column::Numeric { length, decimals } => {
                builder.add_numeric_field(name, length, decimals)
            }
            Column::Logical => builder.add_logical_field(name),
        };
    }
    builder = builder.add_numeric_field(field_name(CELL_ID_FIELD)?, 10, 0);

    let mut writer = shapefile::Writer::from_path(path, builder)?;
    for record in records {
        if record.geometry.0.is_empty() {
            return Err(GridError::Geometry(format!("cell {} has no geometry", record.cell_id)).into());
        }
        let attributes = record
            .feature_index
            .and_then(|index| boundary.features.get(index))
            .map(|feature| feature.attributes.as_slice());

        let mut row = Record::default();
        for field in &fields {
            let value = attributes
                .and_then(|values| values.get(field.source))
                .unwrap_or(&AttributeValue::Null);
            row.insert(field.name.clone(), field_value(field.column, value));
        }
        row.insert(
            CELL_ID_FIELD.to_string(),
            FieldValue::Numeric(Some(record.cell_id as f64)),
        );
        writer.write_shape_and_record(&shape_from_multipolygon(&record.geometry), &row)?;
    }
    drop(writer);

    write_projection(path, &boundary.crs)?;
    write_code_page(path)?;
    tracing::info!(
        "Wrote {} cells with {} fields to {}",
        records.len(),
        fields.len() + 1,
        path.display()
    );
    Ok(())
}

fn field_name(name: &str) -> ShapefileResult<FieldName> {
    FieldName::try_from(name).map_err(|_| ShapefileError::InvalidFieldName(name.to_string()))
}

/// Choose a column for every carried field from the values actually written.
fn plan_fields(records: &[CellRecord], boundary: &Boundary) -> Vec<OutputField> {
    let rows: Vec<&[AttributeValue]> = records
        .iter()
        .filter_map(|r| r.feature_index)
        .filter_map(|i| boundary.features.get(i))
        .map(|f| f.attributes.as_slice())
        .collect();

    boundary
        .schema
        .iter()
        .enumerate()
        .filter(|(_, def)| {
            let clash = def.name.eq_ignore_ascii_case(CELL_ID_FIELD);
            if clash {
                tracing::warn!("Dropping boundary field '{}', replaced by cell ids", def.name);
            }
            !clash
        })
        .map(|(source, def)| {
            let mut values = rows.iter().filter_map(|row| row.get(source));
            let column = match def.kind {
                FieldKind::Text => {
                    let longest = values.map(|v| v.to_string().len()).max().unwrap_or(0);
                    Column::Character {
                        length: longest.clamp(1, MAX_CHARACTER_LENGTH) as u8,
                    }
                }
                FieldKind::Number => {
                    let integral = values.all(|v| match v {
                        AttributeValue::Number(n) => n.fract() == 0.0 && n.abs() < 1e17,
                        _ => true,
                    });
                    if integral {
                        Column::Numeric { length: 18, decimals: 0 }
                    } else {
                        Column::Numeric { length: 24, decimals: 15 }
                    }
                }
                FieldKind::Logical => Column::Logical,
            };
            OutputField {
                source,
                name: def.name.clone(),
                column,
            }
        })
        .collect()
}

fn field_value(column: Column, value: &AttributeValue) -> FieldValue {
    match column {
        Column::Character { .. } => match value {
            AttributeValue::Null => FieldValue::Character(None),
            other => FieldValue::Character(Some(truncate(other.to_string()))),
        },
        Column::Numeric { .. } => FieldValue::Numeric(match value {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }),
        Column::Logical => FieldValue::Logical(match value {
            AttributeValue::Logical(b) => Some(*b),
            _ => None,
        }),
    }
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_CHARACTER_LENGTH {
        let mut end = MAX_CHARACTER_LENGTH;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
