use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PropertyKeys;
use crate::map::{normalize_code, AdminCode, BoundaryCollection};

/// Villages of interest: normalized unit code -> display name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AllowList {
    entries: BTreeMap<AdminCode, String>,
}

impl AllowList {
    /// Build an allow-list, normalizing every key.
    pub fn new<K: AsRef<str>, V: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            entries: entries.into_iter()
                .map(|(code, name)| (AdminCode::new(code.as_ref()), name.into()))
                .collect(),
        }
    }

    /// Look up a code (normalized before comparison).
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(&AdminCode::new(code)).map(String::as_str)
    }

    #[inline] pub fn contains(&self, code: &str) -> bool { self.get(code).is_some() }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&AdminCode, &str)> {
        self.entries.iter().map(|(code, name)| (code, name.as_str()))
    }
}

impl From<BTreeMap<String, String>> for AllowList {
    fn from(map: BTreeMap<String, String>) -> Self { Self::new(map) }
}

impl From<AllowList> for BTreeMap<String, String> {
    fn from(list: AllowList) -> Self {
        list.entries.into_iter().map(|(code, name)| (code.to_string(), name)).collect()
    }
}

/// Restricts a raw boundary set to the villages of one sub-district.
#[derive(Debug, Clone, Copy)]
pub struct VillageFilter<'a> {
    pub allow_list: &'a AllowList,
    pub parent_code: &'a str,
    pub keys: &'a PropertyKeys,
}

impl<'a> VillageFilter<'a> {
    pub fn new(allow_list: &'a AllowList, parent_code: &'a str, keys: &'a PropertyKeys) -> Self {
        Self { allow_list, parent_code, keys }
    }

    /// Keep the features whose normalized unit code is allow-listed and whose
    /// parent code equals the target. Everything else is dropped silently.
    pub fn apply(&self, raw: &BoundaryCollection) -> BoundaryCollection {
        let kept: BoundaryCollection = raw.iter()
            .filter(|f| f.property_text(&self.keys.parent_code).as_deref() == Some(self.parent_code))
            .filter(|f| f.property_text(&self.keys.unit_code)
                .is_some_and(|code| self.allow_list.contains(normalize_code(&code))))
            .cloned()
            .collect();

        debug!(total = raw.len(), kept = kept.len(), parent = self.parent_code, "filtered village boundaries");
        kept
    }
}

/// Keep only the features belonging to `parent_code`, e.g. the sub-district
/// outline drawn around the villages.
pub fn outline_filter(raw: &BoundaryCollection, parent_code: &str, keys: &PropertyKeys) -> BoundaryCollection {
    raw.iter()
        .filter(|f| f.property_text(&keys.parent_code).as_deref() == Some(parent_code))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::map::BoundaryFeature;

    fn feature(props: Value) -> BoundaryFeature {
        BoundaryFeature::new(None, props.as_object().cloned().unwrap_or_default())
    }

    fn allow() -> AllowList {
        AllowList::new([("001", "CITANGTU"), ("1002", "CIMARAGAS")])
    }

    #[test]
    fn allow_list_keys_are_normalized() {
        let list = allow();
        assert_eq!(list.get("002"), Some("CIMARAGAS"));
        assert_eq!(list.get("1001"), Some("CITANGTU"));
        assert_eq!(list.get("003"), None);
    }

    #[test]
    fn allow_list_deserializes_and_normalizes() {
        let list: AllowList = serde_json::from_value(json!({ "1007": "SUKARASA" })).unwrap();
        assert_eq!(list.get("007"), Some("SUKARASA"));
        assert_eq!(serde_json::to_value(&list).unwrap(), json!({ "007": "SUKARASA" }));
    }

    #[test]
    fn keeps_only_allowed_villages_of_the_target_parent() {
        let raw = BoundaryCollection::new(vec![
            feature(json!({ "kd_kelurahan": "1001", "kd_kecamatan": "041", "nm_kelurahan": "Citangtu" })),
            feature(json!({ "kd_kelurahan": "002", "kd_kecamatan": "041" })),
            feature(json!({ "kd_kelurahan": "1001", "kd_kecamatan": "042" })),
            feature(json!({ "kd_kelurahan": "1009", "kd_kecamatan": "041" })),
            feature(json!({ "kd_kecamatan": "041" })),
        ]);
        let list = allow();
        let keys = PropertyKeys::default();
        let kept = VillageFilter::new(&list, "041", &keys).apply(&raw);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept.features[0].property_text("nm_kelurahan").as_deref(), Some("Citangtu"));
        assert_eq!(kept.features[1].property_text("kd_kelurahan").as_deref(), Some("002"));
    }

    #[test]
    fn numeric_codes_compare_by_their_text() {
        let raw = BoundaryCollection::new(vec![
            feature(json!({ "kd_kelurahan": 1001, "kd_kecamatan": "041" })),
            feature(json!({ "kd_kelurahan": "1001", "kd_kecamatan": 41 })),
        ]);
        let list = allow();
        let keys = PropertyKeys::default();
        let kept = VillageFilter::new(&list, "041", &keys).apply(&raw);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn outline_keeps_every_feature_of_the_parent() {
        let raw = BoundaryCollection::new(vec![
            feature(json!({ "kd_kecamatan": "041" })),
            feature(json!({ "kd_kecamatan": "040" })),
        ]);
        let kept = outline_filter(&raw, "041", &PropertyKeys::default());
        assert_eq!(kept.len(), 1);
    }
}
