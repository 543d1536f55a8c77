use ahash::AHashMap;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::PropertyKeys;
use crate::map::{feature_json, BoundaryCollection, BoundaryFeature};
use crate::stats::{name_key, StatsTable, VillageStats, Vulnerability};

/// A boundary feature joined with its village statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFeature {
    pub boundary: BoundaryFeature,
    /// Display name as read from the boundary, if any.
    pub name: Option<String>,
    pub sangat_rentan: u64,
    pub rentan: u64,
    pub tidak_rentan: u64,
    /// Household total, at least 1.
    pub total_kk: u64,
    pub pct_sangat_rentan: f64,
    pub pct_rentan: f64,
    pub pct_tidak_rentan: f64,
    /// Village index, 0 when the statistics did not provide one.
    pub indeks_desa: f64,
    /// Whether a statistics record matched this feature.
    pub matched: bool,
}

impl EnrichedFeature {
    fn new(boundary: &BoundaryFeature, name: Option<&str>, stats: Option<&VillageStats>) -> Self {
        let stats = stats.copied().unwrap_or_default();
        let total_kk = stats.households();
        let pct = |count: u64| count as f64 / total_kk as f64 * 100.0;

        let sangat_rentan = stats.sangat_rentan.unwrap_or(0);
        let rentan = stats.rentan.unwrap_or(0);
        let tidak_rentan = stats.tidak_rentan.unwrap_or(0);

        Self {
            boundary: boundary.clone(),
            name: name.map(str::to_owned),
            sangat_rentan,
            rentan,
            tidak_rentan,
            total_kk,
            pct_sangat_rentan: pct(sangat_rentan),
            pct_rentan: pct(rentan),
            pct_tidak_rentan: pct(tidak_rentan),
            indeks_desa: stats.indeks_desa.unwrap_or(0.0),
            matched: false,
        }
    }

    /// Share of households in one vulnerability class, in percent.
    pub fn percentage(&self, class: Vulnerability) -> f64 {
        match class {
            Vulnerability::SangatRentan => self.pct_sangat_rentan,
            Vulnerability::Rentan => self.pct_rentan,
            Vulnerability::TidakRentan => self.pct_tidak_rentan,
        }
    }

    /// GeoJSON Feature with the derived fields injected into its properties.
    pub fn to_geojson(&self) -> Value {
        let mut properties = self.boundary.properties.clone();
        let derived = [
            ("nama", json!(self.name)),
            ("jumlah_sangat_rentan", json!(self.sangat_rentan)),
            ("jumlah_rentan", json!(self.rentan)),
            ("jumlah_tidak_rentan", json!(self.tidak_rentan)),
            ("total_kk", json!(self.total_kk)),
            ("pct_sangat_rentan", json!(self.pct_sangat_rentan)),
            ("pct_rentan", json!(self.pct_rentan)),
            ("pct_tidak_rentan", json!(self.pct_tidak_rentan)),
            ("indeks_desa", json!(self.indeks_desa)),
            ("pct_indeks_desa", json!(self.indeks_desa * 100.0)),
        ];
        for (key, value) in derived {
            properties.insert(key.to_string(), value);
        }
        feature_json(self.boundary.geometry.as_ref(), properties)
    }
}

/// Result of joining statistics onto a boundary set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    pub features: Vec<EnrichedFeature>,
    /// Mean index over the features whose statistics carried one; 0 if none did.
    pub average: f64,
    /// Statistics entries that overwrote an earlier entry with the same key.
    pub collisions: usize,
    /// Boundary features with no matching statistics record.
    pub unmatched: usize,
}

impl MergeOutcome {
    /// GeoJSON FeatureCollection of the enriched features.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(EnrichedFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}

/// Join village statistics onto boundary features by normalized name.
///
/// Total over its inputs: a feature without a matching record gets zero
/// counts and a household total of 1. The whole set is recomputed on every
/// call; nothing is cached between calls.
pub fn merge_stats(
    boundaries: &BoundaryCollection,
    stats: &StatsTable,
    keys: &PropertyKeys,
) -> MergeOutcome {
    let mut lookup: AHashMap<String, &VillageStats> = AHashMap::with_capacity(stats.len());
    let mut collisions = 0;
    for (name, record) in stats.iter() {
        if name.is_empty() { continue }
        let key = name_key(name);
        if lookup.insert(key, record).is_some() {
            warn!(village = name, "duplicate statistics key after normalization, last entry wins");
            collisions += 1;
        }
    }

    let mut index_sum = 0.0;
    let mut index_count = 0usize;
    let mut unmatched = 0;

    let features: Vec<EnrichedFeature> = boundaries.iter().map(|boundary| {
        let name = boundary.first_string(&keys.names);
        let record = name.map(name_key).and_then(|key| lookup.get(&key).copied());

        let mut feature = EnrichedFeature::new(boundary, name, record);
        feature.matched = record.is_some();
        if !feature.matched { unmatched += 1 }

        if let Some(index) = record.and_then(|r| r.indeks_desa) {
            index_sum += index;
            index_count += 1;
        }

        if Vulnerability::ALL.into_iter().any(|class| feature.percentage(class) > 100.0) {
            warn!(village = name.unwrap_or(""), total_kk = feature.total_kk, "class count exceeds household total");
        }

        feature
    }).collect();

    let average = if index_count > 0 { index_sum / index_count as f64 } else { 0.0 };

    debug!(features = features.len(), unmatched, collisions, average, "merged village statistics");

    MergeOutcome { features, average, collisions, unmatched }
}
