use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Per-village aggregate record as reported by the backend.
///
/// Every field may be absent (or `null`). Absent counts read as 0, an absent
/// or zero `total_kk` reads as 1, and an absent index is excluded from the
/// aggregate average. Counts may be written as integral floats (`20.0`).
///
/// A `null` index is treated as absent, so it is left out of the average.
/// The dashboard this replaces only checked for `undefined` and averaged a
/// `null` index in as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VillageStats {
    #[serde(default, deserialize_with = "whole_count", skip_serializing_if = "Option::is_none")]
    pub sangat_rentan: Option<u64>,
    #[serde(default, deserialize_with = "whole_count", skip_serializing_if = "Option::is_none")]
    pub rentan: Option<u64>,
    #[serde(default, deserialize_with = "whole_count", skip_serializing_if = "Option::is_none")]
    pub tidak_rentan: Option<u64>,
    #[serde(default, deserialize_with = "whole_count", skip_serializing_if = "Option::is_none")]
    pub total_kk: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indeks_desa: Option<f64>,
}

/// Household count: a non-negative integer, or a float with no fractional part.
fn whole_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let Some(n) = Option::<Number>::deserialize(deserializer)? else { return Ok(None) };
    if let Some(n) = n.as_u64() {
        return Ok(Some(n));
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(de::Error::custom(format!("expected a whole non-negative count, found {}", n))),
    }
}

impl VillageStats {
    /// Household total used as the percentage denominator; never 0.
    #[inline]
    pub fn households(&self) -> u64 {
        match self.total_kk {
            Some(0) | None => 1,
            Some(n) => n,
        }
    }
}

/// Canonical join key for village names: trimmed and uppercased.
pub fn name_key(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Village name -> statistics, in the order the source listed them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsTable {
    entries: Vec<(String, VillageStats)>,
}

impl StatsTable {
    pub fn new(entries: Vec<(String, VillageStats)>) -> Self { Self { entries } }

    /// Read statistics JSON from disk (see [`StatsTable::from_json_value`]).
    pub fn read_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read statistics file: {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse statistics file: {}", path.display()))?;
        Self::from_json_value(&value)
    }

    /// Accepts either `{ name: stats, ... }` or the backend envelope
    /// `{ "rekap_per_desa": { name: stats, ... } }`. `null` is an empty table.
    /// A `null` or malformed entry reads as a record with every field absent;
    /// malformed ones are logged. Only a body that is not an object fails.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let body = match value.get("rekap_per_desa") {
            Some(inner) if !inner.is_null() => inner,
            _ => value,
        };

        let object = match body {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => return Err(anyhow!("Statistics must be a JSON object, found {}", other)),
        };

        Ok(object.iter()
            .map(|(name, stats)| {
                let stats = match stats {
                    Value::Null => VillageStats::default(),
                    stats => VillageStats::deserialize(stats).unwrap_or_else(|err| {
                        warn!(village = name.as_str(), error = %err, "malformed statistics record, reading it as empty");
                        VillageStats::default()
                    }),
                };
                (name.clone(), stats)
            })
            .collect())
    }

    /// Export as a `{ name: stats }` JSON object.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self.entries.iter()
            .map(|(name, stats)| (name.clone(), serde_json::to_value(stats).unwrap_or(Value::Null)))
            .collect();
        Value::Object(object)
    }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VillageStats)> {
        self.entries.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn get(&self, name: &str) -> Option<&VillageStats> {
        self.entries.iter().rev().find(|(n, _)| n == name).map(|(_, stats)| stats)
    }
}

impl FromIterator<(String, VillageStats)> for StatsTable {
    fn from_iter<I: IntoIterator<Item = (String, VillageStats)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
