mod geojson;

pub(crate) use geojson::feature_json;
