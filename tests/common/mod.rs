use acregrid::Crs;
use acregrid_io::write_projection;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, PolygonRing};
use std::path::Path;

/// Axis-aligned square stand: name, lower-left corner, side length.
pub struct Stand {
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Write a boundary layer with a NAME column and a `.prj` for `epsg`.
pub fn write_boundary(path: &Path, epsg: u32, stands: &[Stand]) {
    let builder = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("NAME").unwrap(), 16);
    let mut writer = shapefile::Writer::from_path(path, builder).unwrap();
    for stand in stands {
        let (x, y, s) = (stand.x, stand.y, stand.size);
        let ring = vec![
            Point::new(x, y),
            Point::new(x, y + s),
            Point::new(x + s, y + s),
            Point::new(x + s, y),
            Point::new(x, y),
        ];
        let polygon = shapefile::Polygon::with_rings(vec![PolygonRing::Outer(ring)]);
        let mut record = Record::default();
        record.insert(
            "NAME".to_string(),
            FieldValue::Character(Some(stand.name.to_string())),
        );
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }
    drop(writer);
    write_projection(path, &Crs::from_epsg(epsg).unwrap()).unwrap();
}
