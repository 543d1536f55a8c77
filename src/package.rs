use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::geom::{anchor_point, CentroidMode};
use crate::map::BoundaryCollection;
use crate::stats::{merge_stats, EnrichedFeature, MergeOutcome, StatsTable};
use crate::style::{Category, Classification, LegendEntry};

/// Text shown on a feature's label anchor: the index to 2 decimals, or the
/// category's household share to 1 decimal with a percent sign.
pub fn marker_label(feature: &EnrichedFeature, category: Category) -> String {
    let value = category.scheme().metric(feature);
    match category {
        Category::IndeksDesa => format!("{:.2}", value),
        _ => format!("{:.1}%", value),
    }
}

/// Average index to display: the backend-reported figure when it has one,
/// the merged average otherwise.
#[inline]
pub fn displayed_average(reported: Option<f64>, computed: f64) -> f64 {
    reported.unwrap_or(computed)
}

/// Everything the map and sidebar need for one active category.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethPackage {
    pub category: Category,
    pub features: Vec<EnrichedFeature>,
    /// Tier and fill color per feature, parallel to `features`.
    pub styles: Vec<Classification>,
    /// Label anchor `[lat, lon]` per feature; `None` means no label.
    pub anchors: Vec<Option<[f64; 2]>>,
    pub legend: Vec<LegendEntry>,
    pub average: f64,
    /// `[min_lon, min_lat, max_lon, max_lat]` of the features.
    pub bounds: Option<[f64; 4]>,
}

impl ChoroplethPackage {
    /// Classify and anchor every merged feature for `category`.
    pub fn build(outcome: &MergeOutcome, category: Category, mode: CentroidMode) -> Self {
        let scheme = category.scheme();
        let features = outcome.features.clone();

        let styles = features.iter().map(|f| scheme.classify_feature(f)).collect();
        let anchors: Vec<Option<[f64; 2]>> = features.iter()
            .map(|f| f.boundary.geometry.as_ref().and_then(|g| anchor_point(g, mode)))
            .collect();

        let unlabeled = anchors.iter().filter(|a| a.is_none()).count();
        if unlabeled > 0 {
            debug!(unlabeled, "features without a label anchor");
        }

        let bounds = features.iter().map(|f| f.boundary.clone()).collect::<BoundaryCollection>().bounds();

        Self {
            category,
            features,
            styles,
            anchors,
            legend: scheme.legend(),
            average: outcome.average,
            bounds,
        }
    }

    /// Replace the average with the backend-reported figure, if any.
    pub fn with_reported_average(mut self, reported: Option<f64>) -> Self {
        self.average = displayed_average(reported, self.average);
        self
    }

    /// Serialize the package. Each feature carries its tier, fill color,
    /// anchor and label text alongside the enriched properties.
    pub fn to_json(&self) -> Value {
        let features: Vec<Value> = self.features.iter()
            .zip(&self.styles)
            .zip(&self.anchors)
            .map(|((feature, style), anchor)| {
                let mut geojson = feature.to_geojson();
                if let Some(properties) = geojson["properties"].as_object_mut() {
                    properties.insert("tier".into(), json!(style.tier));
                    properties.insert("fill_color".into(), json!(style.color));
                    properties.insert("anchor".into(), json!(anchor));
                    properties.insert("label".into(), json!(marker_label(feature, self.category)));
                }
                geojson
            })
            .collect();

        json!({
            "category": self.category,
            "title": self.category.title(),
            "average": self.average,
            "bounds": self.bounds,
            "legend": self.legend,
            "features": {
                "type": "FeatureCollection",
                "features": features,
            },
        })
    }
}

/// Filter, merge and classify in one pass for a deployment.
pub fn build_package(
    config: &Config,
    raw: &BoundaryCollection,
    stats: &StatsTable,
    category: Category,
) -> ChoroplethPackage {
    let villages = config.village_filter().apply(raw);
    let outcome = merge_stats(&villages, stats, &config.keys);
    ChoroplethPackage::build(&outcome, category, config.centroid)
}

#[cfg(test)]
mod tests {
    use geo::polygon;
    use serde_json::json;

    use super::*;
    use crate::map::{BoundaryFeature, BoundaryGeometry};

    fn outcome() -> MergeOutcome {
        let square = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0)];
        let boundaries: BoundaryCollection = [
            BoundaryFeature::new(
                Some(square.into()),
                json!({ "nm_kelurahan": "Citangtu" }).as_object().cloned().unwrap(),
            ),
            BoundaryFeature::new(
                Some(BoundaryGeometry::Unsupported(json!({ "type": "Point", "coordinates": [0, 0] }))),
                json!({ "nm_kelurahan": "Cihuni" }).as_object().cloned().unwrap(),
            ),
        ].into_iter().collect();
        let stats = StatsTable::from_json_value(&json!({
            "CITANGTU": { "sangat_rentan": 9, "total_kk": 20, "indeks_desa": 0.65 },
            "CIHUNI": { "sangat_rentan": 1, "total_kk": 20, "indeks_desa": 0.85 },
        })).unwrap();
        merge_stats(&boundaries, &stats, &crate::config::PropertyKeys::default())
    }

    #[test]
    fn marker_labels_follow_the_category_format() {
        let outcome = outcome();
        let f = &outcome.features[0];
        assert_eq!(marker_label(f, Category::IndeksDesa), "0.65");
        assert_eq!(marker_label(f, Category::SangatRentan), "45.0%");
        assert_eq!(marker_label(f, Category::Rentan), "0.0%");
    }

    #[test]
    fn package_classifies_and_anchors_each_feature() {
        let package = ChoroplethPackage::build(&outcome(), Category::IndeksDesa, CentroidMode::VertexMean);
        assert_eq!(package.styles[0].tier.index(), 2);
        assert_eq!(package.styles[1].tier.index(), 0);
        assert!(package.anchors[0].is_some());
        assert_eq!(package.anchors[1], None);
        assert_eq!(package.legend.len(), 5);
        assert!((package.average - 0.75).abs() < 1e-12);
        assert_eq!(package.bounds, Some([0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn reported_average_wins() {
        let package = ChoroplethPackage::build(&outcome(), Category::Rentan, CentroidMode::VertexMean);
        assert_eq!(package.clone().with_reported_average(Some(0.5)).average, 0.5);
        assert!((package.with_reported_average(None).average - 0.75).abs() < 1e-12);
    }

    #[test]
    fn json_output_carries_style_fields() {
        let package = ChoroplethPackage::build(&outcome(), Category::SangatRentan, CentroidMode::VertexMean);
        let value = package.to_json();
        assert_eq!(value["category"], "sangat_rentan");
        assert_eq!(value["title"], "Sangat Rentan");
        assert_eq!(value["legend"][0]["color"], "#7f1d1d");

        let props = &value["features"]["features"][0]["properties"];
        assert_eq!(props["tier"], 0);
        assert_eq!(props["fill_color"], "#7f1d1d");
        assert_eq!(props["label"], "45.0%");
        assert_eq!(value["features"]["features"][1]["properties"]["anchor"], Value::Null);
    }
}
