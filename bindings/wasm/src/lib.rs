use serde_json::json;
use wasm_bindgen::prelude::*;

use pangatikan_core::{
    anchor_point, build_package, BoundaryCollection, BoundaryGeometry, Category, Config, StatsTable,
};

mod common;

use common::{js_err, js_to_json, json_to_js};

/// Called automatically when the WASM module is instantiated.
/// Sets up panic hook so Rust panics appear as console.error in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Tier and fill color for a value: `{ tier, color }`.
/// Missing values read as 0; unknown categories use the default palette.
#[wasm_bindgen]
pub fn classify(value: Option<f64>, category: &str) -> Result<JsValue, JsValue> {
    let c = pangatikan_core::classify(value, category);
    json_to_js(&json!({ "tier": c.tier, "color": c.color }))
}

/// Legend text for a category and tier; empty when either is unknown.
#[wasm_bindgen(js_name = "legendLabel")]
pub fn legend_label(category: &str, tier: usize) -> String {
    pangatikan_core::legend_label(category, tier).to_string()
}

#[wasm_bindgen(js_name = "categoryTitle")]
pub fn category_title(category: &str) -> String {
    pangatikan_core::category_title(category).to_string()
}

/// Label anchor `[lat, lon]` of a GeoJSON geometry, or undefined when it has none.
/// Uses the anchor mode of `config` when given.
#[wasm_bindgen(js_name = "anchorPoint")]
pub fn anchor_point_js(geometry: JsValue, config: JsValue) -> Result<Option<Vec<f64>>, JsValue> {
    let config = read_config(config)?;
    let geometry = js_to_json(geometry, "geometry").map_err(js_err)?;
    let geometry = BoundaryGeometry::from_geojson(&geometry).map_err(js_err)?;
    Ok(anchor_point(&geometry, config.centroid).map(Vec::from))
}

/// Filter, merge and classify in one call.
///   boundaries: GeoJSON FeatureCollection
///   stats: { name: {...} } or { rekap_per_desa: { name: {...} } }
///   category: sangat_rentan, rentan, tidak_rentan or indeks_desa
///   reported_average: backend average index, preferred over the computed one
#[wasm_bindgen(js_name = "buildPackage")]
pub fn build_package_js(
    boundaries: JsValue,
    stats: JsValue,
    category: &str,
    reported_average: Option<f64>,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let config = read_config(config)?;
    let category: Category = category.parse().map_err(js_err)?;

    let boundaries = js_to_json(boundaries, "boundaries").map_err(js_err)?;
    let boundaries = BoundaryCollection::from_geojson_value(&boundaries).map_err(|e| js_err(format!("{:#}", e)))?;

    let stats = js_to_json(stats, "stats").map_err(js_err)?;
    let stats = StatsTable::from_json_value(&stats).map_err(|e| js_err(format!("{:#}", e)))?;

    let package = build_package(&config, &boundaries, &stats, category)
        .with_reported_average(reported_average);
    json_to_js(&package.to_json())
}

/// Deployment config from JS; `undefined` or `null` means the built-in defaults.
fn read_config(config: JsValue) -> Result<Config, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(Config::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(js_err)
}
