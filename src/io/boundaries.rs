//! Region boundary reference file (GeoJSON `FeatureCollection`).
//!
//! Only what the choropleth needs is modelled: each feature's
//! `properties.name` and its polygon rings in lon/lat.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_BOUNDARY_FILE: &str = "spain_ccaa.geojson";

/// A closed ring of `[lon, lat, ..]` positions.
pub type Ring = Vec<Vec<f64>>;

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Properties,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl Feature {
    pub fn name(&self) -> Option<&str> {
        self.properties.name.as_deref()
    }

    /// Outer rings of every polygon, as `(lon, lat)` points.
    pub fn outer_rings(&self) -> Vec<Vec<(f64, f64)>> {
        let polygons: Vec<&Vec<Ring>> = match &self.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![coordinates],
            Some(Geometry::MultiPolygon { coordinates }) => coordinates.iter().collect(),
            Some(Geometry::Unsupported) | None => Vec::new(),
        };

        polygons
            .into_iter()
            .filter_map(|rings| rings.first())
            .map(|ring| {
                ring.iter()
                    .filter(|pos| pos.len() >= 2)
                    .map(|pos| (pos[0], pos[1]))
                    .collect::<Vec<_>>()
            })
            .filter(|ring| ring.len() >= 3)
            .collect()
    }
}

/// Resolve the boundary file: an explicit path wins, otherwise the default file
/// name is looked up in the working directory and then next to the executable.
pub fn resolve_boundary_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(DEFAULT_BOUNDARY_FILE);
    if local.exists() {
        return local;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_BOUNDARY_FILE)))
        .filter(|p| p.exists())
        .unwrap_or(local)
}

pub fn read_boundaries(path: &Path) -> Result<FeatureCollection, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open boundary file '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::config(format!("Invalid boundary GeoJSON '{}': {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Ceuta", "cod_ccaa": "18"},
             "geometry": {"type": "Polygon", "coordinates": [[[-5.4, 35.9], [-5.3, 35.9], [-5.3, 35.8], [-5.4, 35.9]]]}},
            {"type": "Feature", "properties": {"name": "Baleares"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[2.3, 39.5, 0.0], [3.2, 39.5, 0.0], [3.2, 39.9, 0.0], [2.3, 39.5, 0.0]]],
                [[[4.0, 39.8], [4.3, 39.8], [4.3, 40.0], [4.0, 39.8]]]
             ]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}
        ]
    }"#;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccaa.geojson");
        std::fs::write(&path, SAMPLE).unwrap();

        let fc = read_boundaries(&path).unwrap();
        assert_eq!(fc.features.len(), 3);
        assert_eq!(fc.features[0].name(), Some("Ceuta"));
        assert_eq!(fc.features[0].outer_rings().len(), 1);
        assert_eq!(fc.features[1].outer_rings().len(), 2);
        assert_eq!(fc.features[1].outer_rings()[0][1], (3.2, 39.5));
        assert_eq!(fc.features[2].name(), None);
        assert!(fc.features[2].outer_rings().is_empty());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = read_boundaries(Path::new("/nonexistent/spain_ccaa.geojson")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn explicit_path_wins() {
        let p = Path::new("/tmp/custom.geojson");
        assert_eq!(resolve_boundary_path(Some(p)), p.to_path_buf());
    }
}
