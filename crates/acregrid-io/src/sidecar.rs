//! `.prj` and `.cpg` files stored next to a `.shp`.

use crate::error::{ShapefileError, ShapefileResult};
use acregrid_core::Crs;
use std::fs;
use std::path::{Path, PathBuf};

/// Code page written for every output layer.
pub const CODE_PAGE: &str = "UTF-8";

pub fn projection_path(shp: &Path) -> PathBuf {
    shp.with_extension("prj")
}

pub fn code_page_path(shp: &Path) -> PathBuf {
    shp.with_extension("cpg")
}

/// Read and interpret the `.prj` belonging to `shp`.
pub fn read_projection(shp: &Path) -> ShapefileResult<Crs> {
    let path = projection_path(shp);
    if !path.exists() {
        return Err(ShapefileError::MissingProjection(path));
    }
    let text = fs::read_to_string(&path)?;
    let crs = Crs::from_wkt(text.trim())?;
    tracing::debug!("Read {} from {}", crs, path.display());
    Ok(crs)
}

/// Write `crs` as ESRI WKT, the dialect desktop GIS expects in a `.prj`.
pub fn write_projection(shp: &Path, crs: &Crs) -> ShapefileResult<()> {
    fs::write(projection_path(shp), crs.to_esri_wkt()?)?;
    Ok(())
}

pub fn write_code_page(shp: &Path) -> ShapefileResult<()> {
    fs::write(code_page_path(shp), CODE_PAGE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_projection_round_trip() {
        let dir = TempDir::new().unwrap();
        let shp = dir.path().join("grid.shp");
        let crs = Crs::from_epsg(32616).unwrap();
        write_projection(&shp, &crs).unwrap();
        assert!(dir.path().join("grid.prj").exists());
        assert_eq!(read_projection(&shp).unwrap(), crs);
    }

    #[test]
    fn test_state_plane_projection_round_trip() {
        let dir = TempDir::new().unwrap();
        let shp = dir.path().join("woods.shp");
        write_projection(&shp, &Crs::from_epsg(26990).unwrap()).unwrap();
        let text = fs::read_to_string(projection_path(&shp)).unwrap();
        assert!(text.starts_with("PROJCS["), "{}", text);
        let crs = read_projection(&shp).unwrap();
        assert!(crs.is_projected());
        assert!(crs.require_projected().is_ok());
    }

    #[test]
    fn test_missing_projection() {
        let dir = TempDir::new().unwrap();
        let shp = dir.path().join("woods.shp");
        assert!(matches!(
            read_projection(&shp),
            Err(ShapefileError::MissingProjection(_))
        ));
    }

    #[test]
    fn test_code_page() {
        let dir = TempDir::new().unwrap();
        let shp = dir.path().join("grid.shp");
        write_code_page(&shp).unwrap();
        let text = fs::read_to_string(dir.path().join("grid.cpg")).unwrap();
        assert_eq!(text, "UTF-8");
    }

    #[test]
    fn test_unparseable_projection() {
        let dir = TempDir::new().unwrap();
        let shp = dir.path().join("woods.shp");
        fs::write(projection_path(&shp), "not a coordinate system").unwrap();
        assert!(matches!(read_projection(&shp), Err(ShapefileError::Crs(_))));
    }
}
