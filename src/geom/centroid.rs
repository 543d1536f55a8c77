use geo::{Centroid, Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::map::BoundaryGeometry;

/// How a label anchor is derived from a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentroidMode {
    /// Mean of the outer-ring vertices of the largest part (by vertex count),
    /// over the vertices exactly as loaded. A closing vertex present in the
    /// data is counted like any other; a missing one is not added.
    #[default]
    VertexMean,
    /// Area-weighted centroid of the whole geometry.
    AreaWeighted,
}

/// Representative `[latitude, longitude]` point for label placement.
///
/// Returns `None` for unsupported geometry types and for geometries whose
/// selected ring is empty.
pub fn anchor_point(geometry: &BoundaryGeometry, mode: CentroidMode) -> Option<[f64; 2]> {
    match mode {
        CentroidMode::VertexMean => vertex_mean(outer_ring(geometry)?),
        CentroidMode::AreaWeighted => {
            let point = geometry.to_multi_polygon()?.centroid()?;
            Some([point.y(), point.x()])
        }
    }
}

/// Outer ring used for the vertex mean: the polygon's exterior, or for a
/// MultiPolygon the exterior with the most vertices as loaded (first one on
/// ties).
fn outer_ring(geometry: &BoundaryGeometry) -> Option<&LineString<f64>> {
    geometry.exteriors().into_iter()
        .reduce(|best, ring| if ring.0.len() > best.0.len() { ring } else { best })
}

/// Unweighted mean of the ring vertices, swapped to (lat, lon).
fn vertex_mean(ring: &LineString<f64>) -> Option<[f64; 2]> {
    if ring.0.is_empty() { return None }

    let n = ring.0.len() as f64;
    let sum = ring.0.iter().fold(Coord { x: 0.0, y: 0.0 }, |acc, c| acc + *c);
    Some([sum.y / n, sum.x / n])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{polygon, LineString, MultiPolygon, Polygon};
    use serde_json::json;

    use super::*;

    fn unit_square() -> Polygon<f64> {
        // Written with its closing vertex, as GeoJSON stores it.
        polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0)]
    }

    #[test]
    fn unit_square_mean_counts_the_closing_vertex() {
        let [lat, lon] = anchor_point(&unit_square().into(), CentroidMode::VertexMean).unwrap();
        assert_relative_eq!(lat, 0.4);
        assert_relative_eq!(lon, 0.4);
    }

    #[test]
    fn unclosed_ring_is_averaged_as_given() {
        let geometry = BoundaryGeometry::from_geojson(&json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]]
        })).unwrap();
        let [lat, lon] = anchor_point(&geometry, CentroidMode::VertexMean).unwrap();
        assert_relative_eq!(lat, 0.5);
        assert_relative_eq!(lon, 0.5);
    }

    #[test]
    fn largest_part_is_judged_on_loaded_vertices() {
        // Both exteriors list four vertices; the second is unclosed and must
        // not gain a fifth, so the tie goes to the first part.
        let geometry = BoundaryGeometry::from_geojson(&json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[9.0, 9.0], [12.0, 9.0], [9.0, 12.0], [9.0, 9.0]]],
                [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]]
            ]
        })).unwrap();
        let [lat, lon] = anchor_point(&geometry, CentroidMode::VertexMean).unwrap();
        assert_relative_eq!(lat, 9.75);
        assert_relative_eq!(lon, 9.75);
    }

    #[test]
    fn output_is_latitude_first() {
        let ring = polygon![(x: 108.0, y: -7.0), (x: 108.0, y: -7.0), (x: 108.0, y: -7.0)];
        let [lat, lon] = anchor_point(&ring.into(), CentroidMode::VertexMean).unwrap();
        assert_relative_eq!(lat, -7.0);
        assert_relative_eq!(lon, 108.0);
    }

    #[test]
    fn multipolygon_uses_the_part_with_most_vertices() {
        let small = polygon![(x: 10.0, y: 10.0), (x: 11.0, y: 10.0), (x: 11.0, y: 11.0), (x: 10.0, y: 10.0)];
        let mp = MultiPolygon(vec![small, unit_square()]);
        let [lat, lon] = anchor_point(&mp.into(), CentroidMode::VertexMean).unwrap();
        assert_relative_eq!(lat, 0.4);
        assert_relative_eq!(lon, 0.4);
    }

    #[test]
    fn multipolygon_tie_keeps_the_first_part() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 3.0, y: 0.0), (x: 0.0, y: 3.0), (x: 0.0, y: 0.0)];
        let b = polygon![(x: 9.0, y: 9.0), (x: 12.0, y: 9.0), (x: 9.0, y: 12.0), (x: 9.0, y: 9.0)];
        let mp = MultiPolygon(vec![a, b]);
        let [lat, lon] = anchor_point(&mp.into(), CentroidMode::VertexMean).unwrap();
        assert_relative_eq!(lat, 0.75);
        assert_relative_eq!(lon, 0.75);
    }

    #[test]
    fn empty_ring_and_empty_multipolygon_have_no_anchor() {
        let empty = Polygon::new(LineString(Vec::new()), Vec::new());
        assert_eq!(anchor_point(&empty.into(), CentroidMode::VertexMean), None);
        assert_eq!(anchor_point(&MultiPolygon::<f64>(Vec::new()).into(), CentroidMode::VertexMean), None);
    }

    #[test]
    fn unsupported_geometry_has_no_anchor() {
        let point = BoundaryGeometry::Unsupported(json!({ "type": "Point", "coordinates": [1.0, 2.0] }));
        assert_eq!(anchor_point(&point, CentroidMode::VertexMean), None);
        assert_eq!(anchor_point(&point, CentroidMode::AreaWeighted), None);
    }

    #[test]
    fn area_weighted_square_is_centered() {
        let [lat, lon] = anchor_point(&unit_square().into(), CentroidMode::AreaWeighted).unwrap();
        assert_relative_eq!(lat, 0.5, epsilon = 1e-12);
        assert_relative_eq!(lon, 0.5, epsilon = 1e-12);
    }
}
