//! World country geometry: loading, name lookup, and centroids.
//!
//! The world file is a `GeoJSON` `FeatureCollection` whose features carry
//! a `name` property matching the observation file's region column.
//! Centroids are precomputed at load time for marker placement; features
//! without a name or geometry are skipped with a debug log.

use std::fs;
use std::path::Path;

use geojson::{GeoJson, Geometry};
use serde_json::Value;
use tracing::debug;

use crate::error::FigureError;

/// A named country outline from the world file.
#[derive(Debug, Clone)]
pub struct CountryFeature {
    name: String,
    geometry: Geometry,
    centroid: Option<(f64, f64)>,
}

impl CountryFeature {
    /// Country name, as keyed in the observation file's region column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Representative `(longitude, latitude)` point for marker placement.
    ///
    /// None for geometry types without a polygon interior.
    pub const fn centroid(&self) -> Option<(f64, f64)> {
        self.centroid
    }

    /// The raw geometry as a JSON value for embedding in payloads.
    pub fn geometry_json(&self) -> Value {
        serde_json::to_value(&self.geometry).unwrap_or(Value::Null)
    }
}

/// All country features from the world file, in file order.
#[derive(Debug, Clone)]
pub struct WorldGeometry {
    features: Vec<CountryFeature>,
}

impl WorldGeometry {
    /// A geometry set with no countries, for when the world file is unavailable.
    pub const fn empty() -> Self {
        Self { features: Vec::new() }
    }

    /// Load and parse the world file.
    pub fn from_file(path: &Path) -> Result<Self, FigureError> {
        let contents = fs::read_to_string(path).map_err(|source| FigureError::GeometryRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse world geometry from a `GeoJSON` string.
    pub fn parse(contents: &str) -> Result<Self, FigureError> {
        let geojson = contents.parse::<GeoJson>()?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(FigureError::NotFeatureCollection);
        };
        let mut features = Vec::new();
        for feature in collection.features {
            let name = feature
                .properties
                .as_ref()
                .and_then(|props| props.get("name"))
                .and_then(Value::as_str)
                .map(str::to_owned);
            let Some(name) = name else {
                debug!("skipping world feature without a name property");
                continue;
            };
            let Some(geometry) = feature.geometry else {
                debug!(country = %name, "skipping world feature without geometry");
                continue;
            };
            let centroid = geometry_centroid(&geometry);
            features.push(CountryFeature { name, geometry, centroid });
        }
        debug!(countries = features.len(), "loaded world geometry");
        Ok(Self { features })
    }

    /// All features, in file order.
    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    /// Number of named countries.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the world file contained no usable features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a country by name.
    pub fn get(&self, name: &str) -> Option<&CountryFeature> {
        self.features.iter().find(|feature| feature.name == name)
    }
}

fn geometry_centroid(geometry: &Geometry) -> Option<(f64, f64)> {
    match &geometry.value {
        geojson::Value::Polygon(rings) => polygon_centroid(rings).map(|(x, y, _)| (x, y)),
        geojson::Value::MultiPolygon(polygons) => multi_polygon_centroid(polygons),
        _ => None,
    }
}

/// Area-weighted centroid across the member polygons.
fn multi_polygon_centroid(polygons: &[Vec<Vec<Vec<f64>>>]) -> Option<(f64, f64)> {
    let mut weighted_x = 0.0;
    let mut weighted_y = 0.0;
    let mut total_area = 0.0;
    for rings in polygons {
        if let Some((x, y, area)) = polygon_centroid(rings) {
            weighted_x = x.mul_add(area, weighted_x);
            weighted_y = y.mul_add(area, weighted_y);
            total_area += area;
        }
    }
    if total_area > 0.0 {
        Some((weighted_x / total_area, weighted_y / total_area))
    } else {
        // All member polygons were degenerate; fall back to the first.
        polygons.first().and_then(|rings| polygon_centroid(rings)).map(|(x, y, _)| (x, y))
    }
}

/// Centroid and area of a polygon, taken over its exterior ring.
fn polygon_centroid(rings: &[Vec<Vec<f64>>]) -> Option<(f64, f64, f64)> {
    rings.first().and_then(|ring| ring_centroid(ring))
}

/// Shoelace centroid of a closed ring.
fn ring_centroid(ring: &[Vec<f64>]) -> Option<(f64, f64, f64)> {
    let mut area2 = 0.0;
    let mut cx6 = 0.0;
    let mut cy6 = 0.0;
    for pair in ring.windows(2) {
        let (Some(a), Some(b)) = (pair.first(), pair.get(1)) else {
            continue;
        };
        let (Some(&ax), Some(&ay)) = (a.first(), a.get(1)) else {
            continue;
        };
        let (Some(&bx), Some(&by)) = (b.first(), b.get(1)) else {
            continue;
        };
        let cross = ax.mul_add(by, -(bx * ay));
        area2 += cross;
        cx6 = (ax + bx).mul_add(cross, cx6);
        cy6 = (ay + by).mul_add(cross, cy6);
    }
    if area2.abs() <= f64::EPSILON {
        return vertex_mean(ring);
    }
    let cx = cx6 / (3.0 * area2);
    let cy = cy6 / (3.0 * area2);
    Some((cx, cy, (area2 / 2.0).abs()))
}

/// Fallback for degenerate rings: plain vertex average with zero area.
fn vertex_mean(ring: &[Vec<f64>]) -> Option<(f64, f64, f64)> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0_u32;
    for position in ring {
        let (Some(&x), Some(&y)) = (position.first(), position.get(1)) else {
            continue;
        };
        sum_x += x;
        sum_y += y;
        count = count.saturating_add(1);
    }
    if count == 0 {
        return None;
    }
    let n = f64::from(count);
    Some((sum_x / n, sum_y / n, 0.0))
}
