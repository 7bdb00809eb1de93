mod common;

use acregrid::{load_boundary, run_pipeline, Crs, GridConfig};
use acregrid_core::{AttributeValue, Transformer};
use common::{write_boundary, Stand};
use geo::{Area, Coord};
use std::path::Path;
use tempfile::TempDir;

fn config_for(dir: &Path, input: &str) -> GridConfig {
    GridConfig {
        input_path: dir.join(input),
        output_path: dir.join("grid.shp"),
        ..GridConfig::default()
    }
}

fn cell_ids(path: &Path) -> Vec<f64> {
    let grid = load_boundary(path).unwrap();
    let column = grid
        .schema
        .iter()
        .position(|f| f.name == "cell_id")
        .expect("cell_id column");
    grid.features
        .iter()
        .map(|f| match f.attributes[column] {
            AttributeValue::Number(n) => n,
            ref other => panic!("cell_id {:?}", other),
        })
        .collect()
}

#[test]
fn test_projected_square_yields_sixteen_cells() {
    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("woods.shp"),
        32616,
        &[Stand { name: "Duncan", x: 500_000.0, y: 4_700_000.0, size: 200.0 }],
    );
    let config = config_for(dir.path(), "woods.shp");

    let summary = run_pipeline(&config).unwrap();
    assert_eq!(summary.lattice_cells, 16);
    assert_eq!(summary.cells_written, 16);
    assert!((summary.total_acres - 40_000.0 / 4_046.856_422_4).abs() < 1e-3);

    let ids = cell_ids(&config.output_path);
    let expected: Vec<f64> = (1..=16).map(|i| i as f64).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_geographic_boundary_is_projected() {
    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("woods.shp"),
        4326,
        &[Stand { name: "Duncan", x: -87.0, y: 45.0, size: 0.002 }],
    );
    let config = config_for(dir.path(), "woods.shp");
    let summary = run_pipeline(&config).unwrap();
    assert_eq!(summary.target, Crs::from_epsg(32616).unwrap());

    let grid = load_boundary(&config.output_path).unwrap();
    assert_eq!(grid.crs, Crs::from_epsg(32616).unwrap());
    assert_eq!(grid.features.len(), summary.cells_written);

    // 0.002 degree at 45N is about 158 m by 222 m, so 3 x 4 cells.
    assert_eq!(summary.cells_written, 12);
    let area: f64 = grid.features.iter().map(|f| f.geometry.unsigned_area()).sum();
    assert!((area - 157.7 * 222.2).abs() < 300.0, "area {}", area);
}

#[test]
fn test_oblique_mercator_boundary_is_projected() {
    // Place a 200 m stand in Michigan GeoRef where UTM 16N has (500 km, 4700 km).
    let georef = Crs::from_epsg(3078).unwrap();
    let to_georef = Transformer::new(&Crs::from_epsg(32616).unwrap(), &georef).unwrap();
    let corner = to_georef
        .transform(Coord { x: 500_000.0, y: 4_700_000.0 })
        .unwrap();

    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("woods.shp"),
        3078,
        &[Stand { name: "Duncan", x: corner.x, y: corner.y, size: 200.0 }],
    );
    let config = config_for(dir.path(), "woods.shp");
    let summary = run_pipeline(&config).unwrap();

    let grid = load_boundary(&config.output_path).unwrap();
    assert_eq!(grid.crs, Crs::from_epsg(32616).unwrap());
    // The square is slightly rotated in UTM; its area alone spans more than ten cells.
    assert!(summary.cells_written > 10, "{} cells", summary.cells_written);
    let acres = 40_000.0 / 4_046.856_422_4;
    assert!(
        (summary.total_acres - acres).abs() < acres * 0.02,
        "{} acres",
        summary.total_acres
    );
    for feature in &grid.features {
        let c = feature.geometry.0[0].exterior().0[0];
        assert!((c.x - 500_000.0).abs() < 1_000.0 && (c.y - 4_700_000.0).abs() < 1_000.0);
    }
}

#[test]
fn test_attributes_follow_their_stand() {
    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("stands.shp"),
        32616,
        &[
            Stand { name: "North", x: 500_000.0, y: 4_700_100.0, size: 100.0 },
            Stand { name: "South", x: 500_000.0, y: 4_700_000.0, size: 100.0 },
        ],
    );
    let config = config_for(dir.path(), "stands.shp");
    run_pipeline(&config).unwrap();

    let grid = load_boundary(&config.output_path).unwrap();
    let names: Vec<_> = grid.schema.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["NAME", "cell_id"]);
    for feature in &grid.features {
        let centre_y = geo::BoundingRect::bounding_rect(&feature.geometry)
            .unwrap()
            .center()
            .y;
        let expected = if centre_y > 4_700_100.0 { "North" } else { "South" };
        assert_eq!(feature.attributes[0], AttributeValue::Text(expected.into()));
    }
}

#[test]
fn test_merged_fragments_drop_attributes() {
    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("stands.shp"),
        32616,
        &[
            Stand { name: "West", x: 500_000.0, y: 4_700_000.0, size: 30.0 },
            Stand { name: "East", x: 500_030.0, y: 4_700_000.0, size: 30.0 },
        ],
    );
    let per_feature = config_for(dir.path(), "stands.shp");
    assert_eq!(run_pipeline(&per_feature).unwrap().cells_written, 2);

    let merged = GridConfig {
        merge_fragments: true,
        ..per_feature
    };
    let summary = run_pipeline(&merged).unwrap();
    assert_eq!(summary.cells_written, 1);
    let grid = load_boundary(&merged.output_path).unwrap();
    assert_eq!(grid.features[0].attributes[0], AttributeValue::Null);
}

#[test]
fn test_rerun_is_deterministic() {
    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("woods.shp"),
        32616,
        &[Stand { name: "Duncan", x: 500_010.0, y: 4_700_020.0, size: 150.0 }],
    );
    let config = config_for(dir.path(), "woods.shp");
    run_pipeline(&config).unwrap();
    let first = load_boundary(&config.output_path).unwrap();
    run_pipeline(&config).unwrap();
    let second = load_boundary(&config.output_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_input_names_the_file() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path(), "absent.shp");
    let err = run_pipeline(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.shp"));
    assert!(!config.output_path.exists());
}

#[test]
fn test_bad_projection_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let shp = dir.path().join("woods.shp");
    write_boundary(&shp, 32616, &[Stand { name: "Duncan", x: 0.0, y: 0.0, size: 100.0 }]);
    std::fs::write(shp.with_extension("prj"), "not a coordinate system").unwrap();

    let err = run_pipeline(&config_for(dir.path(), "woods.shp")).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("woods.shp"), "{}", message);
    assert_eq!(message.matches("Cannot parse CRS definition").count(), 1, "{}", message);
}

#[test]
fn test_degree_sized_lattice_hits_cell_limit() {
    let dir = TempDir::new().unwrap();
    write_boundary(
        &dir.path().join("woods.shp"),
        32616,
        &[Stand { name: "Duncan", x: 500_000.0, y: 4_700_000.0, size: 1_000.0 }],
    );
    let config = GridConfig {
        grid_size: 0.001,
        ..config_for(dir.path(), "woods.shp")
    };
    let err = run_pipeline(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("cells"), "{:#}", err);
}
