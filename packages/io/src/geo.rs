//! Bounding box of a city boundary `GeoJSON` file.

use std::path::Path;

use geojson::GeoJson;
use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Axis-aligned bounding box in the file's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x (longitude).
    pub min_x: f64,
    /// Largest x (longitude).
    pub max_x: f64,
    /// Smallest y (latitude).
    pub min_y: f64,
    /// Largest y (latitude).
    pub max_y: f64,
}

/// Computes the bounds of every `Polygon` ring in a `FeatureCollection`.
///
/// Returns `Ok(None)` if the file does not exist, is not a feature
/// collection, or holds no polygon coordinates.
///
/// # Errors
///
/// Returns [`LoadError`] if the file exists but cannot be read or parsed.
pub fn load_geojson_bounds(path: &Path) -> Result<Option<Bounds>, LoadError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    let geojson: GeoJson = text.parse()?;
    Ok(polygon_bounds(&geojson))
}

/// Computes the bounds of every `Polygon` ring in an already parsed
/// document. See [`load_geojson_bounds`].
#[must_use]
pub fn polygon_bounds(geojson: &GeoJson) -> Option<Bounds> {
    let GeoJson::FeatureCollection(collection) = geojson else {
        return None;
    };

    let mut bounds: Option<Bounds> = None;
    let points = collection
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .filter_map(|g| match &g.value {
            geojson::Value::Polygon(rings) => Some(rings),
            _ => None,
        })
        .flatten()
        .flatten()
        .filter(|pt| pt.len() >= 2);

    for pt in points {
        let (x, y) = (pt[0], pt[1]);
        bounds = Some(bounds.map_or(
            Bounds {
                min_x: x,
                max_x: x,
                min_y: y,
                max_y: y,
            },
            |b| Bounds {
                min_x: b.min_x.min(x),
                max_x: b.max_x.max(x),
                min_y: b.min_y.min(y),
                max_y: b.max_y.max(y),
            },
        ));
    }

    bounds
}
