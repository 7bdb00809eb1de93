//! # Coordinate Reference Systems
//!
//! An owned description of a GDAL/OGR spatial reference. A [`Crs`] keeps the
//! WKT it was built from, so it can be cloned, compared and logged freely;
//! the GDAL handle is rebuilt whenever a transformation needs one.
//!
//! Anything GDAL understands is accepted: EPSG codes, OGC WKT and the ESRI
//! WKT found in shapefile `.prj` sidecars.

use crate::error::{CrsError, CrsResult};
use gdal::spatial_ref::{AxisMappingStrategy, SpatialRef};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Linear units within this distance of 1.0 count as metres.
const METRE_TOLERANCE: f64 = 1e-9;

/// A coordinate reference system.
#[derive(Debug, Clone)]
pub struct Crs {
    name: String,
    epsg: Option<u32>,
    projected: bool,
    /// Metres per linear unit, projected systems only
    linear_unit: Option<f64>,
    wkt: String,
}

impl Crs {
    /// Resolve an EPSG code through the PROJ database.
    pub fn from_epsg(code: u32) -> CrsResult<Self> {
        let srs = SpatialRef::from_epsg(code).map_err(|_| CrsError::UnknownEpsg(code))?;
        Self::from_spatial_ref(&srs, Some(code))
    }

    /// Interpret `.prj` or other user-supplied text (OGC WKT, ESRI WKT,
    /// `EPSG:n`, PROJ strings).
    ///
    /// When GDAL can identify the definition as an EPSG system the result
    /// equals `Crs::from_epsg` for that code.
    pub fn from_wkt(text: &str) -> CrsResult<Self> {
        let mut srs = SpatialRef::from_definition(text.trim())
            .map_err(|e| CrsError::WktParse(e.to_string()))?;
        match identify_epsg(&mut srs) {
            Some(code) => Self::from_epsg(code),
            None => Self::from_spatial_ref(&srs, None),
        }
    }

    fn from_spatial_ref(srs: &SpatialRef, epsg: Option<u32>) -> CrsResult<Self> {
        let wkt = srs.to_wkt()?;
        let projected = srs.is_projected();
        if !projected && !srs.is_geographic() {
            return Err(CrsError::UnsupportedWkt(format!(
                "'{}' is neither geographic nor projected",
                wkt_name(&wkt).unwrap_or(&wkt)
            )));
        }
        Ok(Self {
            name: wkt_name(&wkt).unwrap_or("unnamed").to_string(),
            epsg,
            projected,
            linear_unit: projected.then(|| srs.linear_units()),
            wkt,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// OGC WKT of this system.
    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    /// Whether coordinates are projected (planar) rather than lon/lat.
    pub fn is_projected(&self) -> bool {
        self.projected
    }

    /// Fail unless this CRS is projected with metre units, the only units
    /// a metre-sized grid makes sense in.
    pub fn require_projected(&self) -> CrsResult<()> {
        match self.linear_unit {
            None => Err(CrsError::NotProjected(self.to_string())),
            Some(unit) if (unit - 1.0).abs() > METRE_TOLERANCE => Err(CrsError::NotMetric {
                crs: self.to_string(),
                unit,
            }),
            Some(_) => Ok(()),
        }
    }

    /// A GDAL handle in traditional GIS axis order (x = easting/longitude).
    pub fn spatial_ref(&self) -> CrsResult<SpatialRef> {
        let mut srs = match self.epsg {
            Some(code) => SpatialRef::from_epsg(code)?,
            None => SpatialRef::from_wkt(&self.wkt)?,
        };
        srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        Ok(srs)
    }

    /// ESRI-flavoured WKT, the form shapefile `.prj` files conventionally hold.
    pub fn to_esri_wkt(&self) -> CrsResult<String> {
        let srs = self.spatial_ref()?;
        srs.morph_to_esri()?;
        Ok(srs.to_wkt()?)
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        match (self.epsg, other.epsg) {
            (Some(a), Some(b)) => a == b,
            _ => self.wkt == other.wkt,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(code) = self.epsg {
            write!(f, " (EPSG:{})", code)?;
        }
        Ok(())
    }
}

fn epsg_authority(srs: &SpatialRef) -> Option<u32> {
    match srs.auth_name() {
        Ok(name) if name.eq_ignore_ascii_case("EPSG") => {
            srs.auth_code().ok().and_then(|code| u32::try_from(code).ok())
        }
        _ => None,
    }
}

/// EPSG code of `srs`, asking GDAL to identify it when no authority is set.
fn identify_epsg(srs: &mut SpatialRef) -> Option<u32> {
    if let Some(code) = epsg_authority(srs) {
        return Some(code);
    }
    if let Err(e) = srs.auto_identify_epsg() {
        tracing::debug!("No EPSG code identified: {}", e);
        return None;
    }
    epsg_authority(srs)
}

fn wkt_name_regex() -> &'static Regex {
    static WKT_NAME: OnceLock<Regex> = OnceLock::new();
    WKT_NAME.get_or_init(|| {
        Regex::new(r#"^\s*[A-Za-z_0-9]+\s*[\[(]\s*"([^"]*)""#).expect("invalid regex pattern")
    })
}

/// The quoted name of the root WKT node.
fn wkt_name(wkt: &str) -> Option<&str> {
    wkt_name_regex()
        .captures(wkt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_epsg() {
        let utm = Crs::from_epsg(32616).unwrap();
        assert!(utm.is_projected());
        assert_eq!(utm.epsg(), Some(32616));
        assert_eq!(utm.name(), "WGS 84 / UTM zone 16N");
        assert_eq!(utm.to_string(), "WGS 84 / UTM zone 16N (EPSG:32616)");

        let geographic = Crs::from_epsg(4326).unwrap();
        assert!(!geographic.is_projected());
        assert_eq!(geographic.name(), "WGS 84");
    }

    #[test]
    fn test_unknown_epsg() {
        assert!(matches!(
            Crs::from_epsg(999_999),
            Err(CrsError::UnknownEpsg(999_999))
        ));
    }

    #[test]
    fn test_require_projected() {
        assert!(Crs::from_epsg(32616).unwrap().require_projected().is_ok());
        assert!(Crs::from_epsg(3078).unwrap().require_projected().is_ok());
        assert!(Crs::from_epsg(26990).unwrap().require_projected().is_ok());

        let err = Crs::from_epsg(4326).unwrap().require_projected().unwrap_err();
        assert!(matches!(err, CrsError::NotProjected(_)));

        // NAD83 / Michigan South (ft)
        let err = Crs::from_epsg(2253).unwrap().require_projected().unwrap_err();
        assert!(matches!(err, CrsError::NotMetric { .. }));
    }

    #[test]
    fn test_esri_wkt_round_trip() {
        for code in [4326, 4269, 32616, 32734, 26916] {
            let crs = Crs::from_epsg(code).unwrap();
            let esri = crs.to_esri_wkt().unwrap();
            assert_eq!(Crs::from_wkt(&esri).unwrap(), crs, "EPSG:{}", code);
        }
        let esri = Crs::from_epsg(32616).unwrap().to_esri_wkt().unwrap();
        assert!(esri.starts_with("PROJCS[\"WGS_1984_UTM_Zone_16N\""), "{}", esri);
    }

    #[test]
    fn test_non_utm_projections_are_accepted() {
        // Michigan GeoRef (Hotine oblique Mercator) and Michigan South (Lambert)
        for code in [3078, 26990] {
            let crs = Crs::from_epsg(code).unwrap();
            let reread = Crs::from_wkt(&crs.to_esri_wkt().unwrap()).unwrap();
            assert!(reread.is_projected(), "EPSG:{}", code);
            assert!(reread.name().contains("Michigan"), "{}", reread.name());
        }
    }

    #[test]
    fn test_from_wkt_authority() {
        let wkt = r#"PROJCS["WGS 84 / UTM zone 16N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",-87],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["metre",1],AUTHORITY["EPSG","32616"]]"#;
        assert_eq!(Crs::from_wkt(wkt).unwrap().epsg(), Some(32616));
    }

    #[test]
    fn test_from_wkt_rejects_garbage() {
        assert!(matches!(Crs::from_wkt("garbage"), Err(CrsError::WktParse(_))));
    }

    #[test]
    fn test_wkt_name() {
        assert_eq!(wkt_name(r#"GEOGCS["WGS 84",DATUM["x"]]"#), Some("WGS 84"));
        assert_eq!(wkt_name(r#"  PROJCS ( "a b" , 1)"#), Some("a b"));
        assert_eq!(wkt_name("EPSG:4326"), None);
    }
}
