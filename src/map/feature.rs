use geo::{BoundingRect, LineString, MultiPolygon, Polygon, Rect};
use serde_json::{Map, Value};

/// Rings of one polygon exactly as loaded: exterior first, then holes.
/// Rings are neither closed nor reoriented.
pub type Rings = Vec<LineString<f64>>;

/// Geometry of a boundary feature.
///
/// Only Polygon and MultiPolygon carry meaning for the dashboard; any other
/// GeoJSON geometry is kept verbatim so it can be written back out, but it
/// never produces an anchor point.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Rings),
    MultiPolygon(Vec<Rings>),
    Unsupported(Value),
}

impl BoundaryGeometry {
    /// GeoJSON type name.
    pub fn kind(&self) -> &str {
        match self {
            BoundaryGeometry::Polygon(_) => "Polygon",
            BoundaryGeometry::MultiPolygon(_) => "MultiPolygon",
            BoundaryGeometry::Unsupported(raw) => raw["type"].as_str().unwrap_or("Unknown"),
        }
    }

    /// Exterior ring of every part, as loaded. Parts without rings are skipped.
    pub fn exteriors(&self) -> Vec<&LineString<f64>> {
        match self {
            BoundaryGeometry::Polygon(rings) => rings.first().into_iter().collect(),
            BoundaryGeometry::MultiPolygon(parts) => parts.iter().filter_map(|rings| rings.first()).collect(),
            BoundaryGeometry::Unsupported(_) => Vec::new(),
        }
    }

    /// `geo` view of the geometry. Conversion closes every ring.
    pub fn to_multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        match self {
            BoundaryGeometry::Polygon(rings) => Some(MultiPolygon(vec![polygon_from_rings(rings)])),
            BoundaryGeometry::MultiPolygon(parts) => Some(parts.iter().map(|rings| polygon_from_rings(rings)).collect()),
            BoundaryGeometry::Unsupported(_) => None,
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.to_multi_polygon()?.bounding_rect()
    }
}

fn polygon_from_rings(rings: &[LineString<f64>]) -> Polygon<f64> {
    let mut rings = rings.iter().cloned();
    let exterior = rings.next().unwrap_or_else(|| LineString(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

impl From<Polygon<f64>> for BoundaryGeometry {
    fn from(polygon: Polygon<f64>) -> Self {
        let (exterior, interiors) = polygon.into_inner();
        BoundaryGeometry::Polygon(std::iter::once(exterior).chain(interiors).collect())
    }
}

impl From<MultiPolygon<f64>> for BoundaryGeometry {
    fn from(mp: MultiPolygon<f64>) -> Self {
        BoundaryGeometry::MultiPolygon(mp.0.into_iter().map(|polygon| {
            let (exterior, interiors) = polygon.into_inner();
            std::iter::once(exterior).chain(interiors).collect()
        }).collect())
    }
}

/// A single administrative boundary: geometry plus its raw property record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryFeature {
    pub geometry: Option<BoundaryGeometry>,
    pub properties: Map<String, Value>,
}

impl BoundaryFeature {
    pub fn new(geometry: Option<BoundaryGeometry>, properties: Map<String, Value>) -> Self {
        Self { geometry, properties }
    }

    /// Textual form of a property. Strings are returned as-is, numbers and
    /// booleans in their JSON spelling; null, arrays and objects yield `None`.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// First non-empty string property among `keys`.
    pub fn first_string(&self, keys: &[String]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.properties.get(key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }
}

/// Ordered set of boundary features, as delivered by a GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryCollection {
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryCollection {
    pub fn new(features: Vec<BoundaryFeature>) -> Self { Self { features } }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryFeature> { self.features.iter() }

    /// Bounding box `[min_lon, min_lat, max_lon, max_lat]` of every supported
    /// geometry, or `None` if there is none.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        self.features.iter()
            .filter_map(|f| f.geometry.as_ref()?.bounding_rect())
            .reduce(|a, b| Rect::new(
                geo::Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                geo::Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
            .map(|r| [r.min().x, r.min().y, r.max().x, r.max().y])
    }
}

impl FromIterator<BoundaryFeature> for BoundaryCollection {
    fn from_iter<I: IntoIterator<Item = BoundaryFeature>>(iter: I) -> Self {
        Self { features: iter.into_iter().collect() }
    }
}
