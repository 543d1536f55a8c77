use anyhow::{anyhow, Result};
use serde_json::Value;
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Convert a plain JS object or array into a JSON value.
pub(crate) fn js_to_json(value: JsValue, what: &str) -> Result<Value> {
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("{} is not valid JSON data: {}", what, e))
}

/// Hand a JSON value back to JS. Goes through a string and JSON.parse so
/// objects arrive as plain objects instead of Maps.
pub(crate) fn json_to_js(value: &Value) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value)
        .map_err(|e| js_err(format!("Failed to serialize result: {}", e)))?;
    js_sys::JSON::parse(&text)
}
