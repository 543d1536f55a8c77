use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString};
use serde_json::{json, Map, Value};

use crate::map::{BoundaryCollection, BoundaryFeature, BoundaryGeometry, Rings};

impl BoundaryCollection {
    /// Read a GeoJSON FeatureCollection from disk.
    pub fn read_geojson(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read boundary file: {}", path.display()))?;
        Self::from_geojson_str(&text)
            .with_context(|| format!("Failed to load boundaries from {}", path.display()))
    }

    /// Parse a GeoJSON FeatureCollection from text.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Failed to parse GeoJSON")?;
        Self::from_geojson_value(&value)
    }

    /// Parse an already-decoded GeoJSON FeatureCollection.
    pub fn from_geojson_value(value: &Value) -> Result<Self> {
        let features = value["features"].as_array()
            .ok_or_else(|| anyhow!("GeoJSON is missing a \"features\" array"))?;

        features.iter().enumerate()
            .map(|(idx, feature)| parse_feature(feature)
                .with_context(|| format!("Invalid feature at index {}", idx)))
            .collect::<Result<Vec<_>>>()
            .map(BoundaryCollection::new)
    }

    /// Export as a GeoJSON FeatureCollection.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(BoundaryFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}

impl BoundaryFeature {
    /// Export as a GeoJSON Feature.
    pub fn to_geojson(&self) -> Value {
        feature_json(self.geometry.as_ref(), self.properties.clone())
    }
}

impl BoundaryGeometry {
    /// Parse a bare GeoJSON geometry object.
    pub fn from_geojson(geometry: &Value) -> Result<Self> { parse_geometry(geometry) }

    pub fn to_geojson(&self) -> Value { geometry_to_geojson(self) }
}

/// Assemble a GeoJSON Feature from a geometry and a property record.
pub(crate) fn feature_json(geometry: Option<&BoundaryGeometry>, properties: Map<String, Value>) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry.map(geometry_to_geojson).unwrap_or(Value::Null),
        "properties": properties,
    })
}

fn parse_feature(feature: &Value) -> Result<BoundaryFeature> {
    let properties = match &feature["properties"] {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => bail!("\"properties\" must be an object, found {}", other),
    };

    let geometry = match &feature["geometry"] {
        Value::Null => None,
        geometry => Some(parse_geometry(geometry)?),
    };

    Ok(BoundaryFeature::new(geometry, properties))
}

/// Parse a GeoJSON geometry object. Polygon and MultiPolygon coordinates are
/// validated; every other type is carried through untouched.
fn parse_geometry(geometry: &Value) -> Result<BoundaryGeometry> {
    let kind = geometry["type"].as_str()
        .ok_or_else(|| anyhow!("Geometry is missing a \"type\""))?;

    match kind {
        "Polygon" => {
            let rings = coords_array(geometry)?;
            Ok(BoundaryGeometry::Polygon(parse_polygon_coords(rings)?))
        }
        "MultiPolygon" => {
            let parts = coords_array(geometry)?.iter()
                .map(|polygon| polygon.as_array()
                    .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon must be an array"))
                    .and_then(|rings| parse_polygon_coords(rings)))
                .collect::<Result<Vec<_>>>()?;
            Ok(BoundaryGeometry::MultiPolygon(parts))
        }
        _ => Ok(BoundaryGeometry::Unsupported(geometry.clone())),
    }
}

fn coords_array(geometry: &Value) -> Result<&Vec<Value>> {
    geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("Geometry is missing a \"coordinates\" array"))
}

/// Parse GeoJSON Polygon coordinates: `[exterior, hole, hole, ...]`.
/// Rings are kept exactly as given; a polygon without rings stays empty.
fn parse_polygon_coords(rings: &[Value]) -> Result<Rings> {
    rings.iter()
        .map(|ring| ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring must be an array"))
            .and_then(|coords| parse_ring_coords(coords)))
        .collect()
}

/// Parse a ring from GeoJSON coordinates: `[[lon, lat], [lon, lat], ...]`.
/// Extra ordinates (altitude) are ignored.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let points = coords.iter().map(|pair| {
        let pair = pair.as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid coordinate: expected [lon, lat], found {}", pair))?;
        let x = pair[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: longitude must be a number"))?;
        let y = pair[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: latitude must be a number"))?;
        Ok(Coord { x, y })
    }).collect::<Result<Vec<_>>>()?;

    Ok(LineString(points))
}

/// Helper to convert a boundary geometry to a serde_json::Value representing GeoJSON Geometry.
fn geometry_to_geojson(geometry: &BoundaryGeometry) -> Value {
    match geometry {
        BoundaryGeometry::Polygon(rings) => json!({
            "type": "Polygon",
            "coordinates": polygon_coords(rings),
        }),
        BoundaryGeometry::MultiPolygon(parts) => json!({
            "type": "MultiPolygon",
            "coordinates": parts.iter().map(|rings| polygon_coords(rings)).collect::<Vec<_>>(),
        }),
        BoundaryGeometry::Unsupported(raw) => raw.clone(),
    }
}

fn polygon_coords(rings: &[LineString<f64>]) -> Vec<Vec<[f64; 2]>> {
    rings.iter()
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}
