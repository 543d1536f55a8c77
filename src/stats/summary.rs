use std::{collections::BTreeMap, fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::stats::{StatsTable, VillageStats};

/// Village name used for households with no village recorded.
pub const UNNAMED_VILLAGE: &str = "Tanpa Nama Desa";

/// Filter value meaning "every village".
pub const ALL_VILLAGES: &str = "SEMUA";

/// Household vulnerability class assigned by the clustering model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vulnerability {
    SangatRentan,
    Rentan,
    TidakRentan,
}

impl Vulnerability {
    pub const ALL: [Vulnerability; 3] = [Self::SangatRentan, Self::Rentan, Self::TidakRentan];

    /// Label used by the model output, e.g. `"Sangat Rentan"`.
    pub fn label(&self) -> &'static str {
        match self {
            Vulnerability::SangatRentan => "Sangat Rentan",
            Vulnerability::Rentan => "Rentan",
            Vulnerability::TidakRentan => "Tidak Rentan",
        }
    }

    /// Weight in the village index: 1 for the most vulnerable, 3 for the least.
    fn index_weight(&self) -> u64 {
        match self {
            Vulnerability::SangatRentan => 1,
            Vulnerability::Rentan => 2,
            Vulnerability::TidakRentan => 3,
        }
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Vulnerability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vulnerability::ALL.into_iter()
            .find(|class| class.label() == s)
            .ok_or_else(|| format!("Unknown vulnerability class {:?}", s))
    }
}

/// One classified household, as stored by the training pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HouseholdRecord {
    #[serde(default)]
    pub desa: Option<String>,
    #[serde(default)]
    pub kategori_kerentanan: Option<String>,
}

impl HouseholdRecord {
    pub fn new(desa: Option<&str>, kategori: Option<&str>) -> Self {
        Self { desa: desa.map(str::to_owned), kategori_kerentanan: kategori.map(str::to_owned) }
    }

    /// Parsed class; unrecognized labels count toward totals only.
    pub fn class(&self) -> Option<Vulnerability> {
        self.kategori_kerentanan.as_deref()?.parse().ok()
    }

    /// Read a JSON array of household records from disk.
    pub fn read_json(path: &Path) -> Result<Vec<Self>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read household file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse household file: {}", path.display()))
    }
}

#[derive(Default)]
struct Tally {
    counts: [u64; 3],
    total: u64,
}

impl Tally {
    fn add(&mut self, class: Option<Vulnerability>) {
        self.total += 1;
        if let Some(class) = class {
            self.counts[class as usize] += 1;
        }
    }

    fn count(&self, class: Vulnerability) -> u64 { self.counts[class as usize] }

    /// `(1·sangat + 2·rentan + 3·tidak) / (3·total)`, rounded to 4 decimals.
    fn index(&self) -> f64 {
        if self.total == 0 { return 0.0 }
        let weighted: u64 = Vulnerability::ALL.iter().map(|c| c.index_weight() * self.count(*c)).sum();
        let raw = weighted as f64 / (self.total * 3) as f64;
        // Exact ties round away from zero here; the Python backend's round()
        // goes half-to-even, so the two can differ in the 4th decimal on a tie.
        (raw * 10_000.0).round() / 10_000.0
    }
}

/// Aggregate household records into per-village statistics, keyed by
/// village name in ascending order.
pub fn summarize_villages(records: &[HouseholdRecord]) -> StatsTable {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for record in records {
        let village = record.desa.as_deref().filter(|d| !d.is_empty()).unwrap_or(UNNAMED_VILLAGE);
        tallies.entry(village).or_default().add(record.class());
    }

    tallies.into_iter()
        .map(|(village, tally)| (village.to_string(), VillageStats {
            sangat_rentan: Some(tally.count(Vulnerability::SangatRentan)),
            rentan: Some(tally.count(Vulnerability::Rentan)),
            tidak_rentan: Some(tally.count(Vulnerability::TidakRentan)),
            total_kk: Some(tally.total),
            indeks_desa: Some(tally.index()),
        }))
        .collect()
}

/// Headline household counts shown next to the map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total_keluarga: u64,
    pub sangat_rentan: u64,
    pub rentan: u64,
    pub tidak_rentan: u64,
    pub filter_desa: String,
}

impl DashboardTotals {
    /// Count households, restricted to `village` unless it is [`ALL_VILLAGES`].
    pub fn compute(records: &[HouseholdRecord], village: &str) -> Self {
        let mut tally = Tally::default();
        records.iter()
            .filter(|r| village == ALL_VILLAGES || r.desa.as_deref() == Some(village))
            .for_each(|r| tally.add(r.class()));

        Self {
            total_keluarga: tally.total,
            sangat_rentan: tally.count(Vulnerability::SangatRentan),
            rentan: tally.count(Vulnerability::Rentan),
            tidak_rentan: tally.count(Vulnerability::TidakRentan),
            filter_desa: village.to_string(),
        }
    }

    pub fn count(&self, class: Vulnerability) -> u64 {
        match class {
            Vulnerability::SangatRentan => self.sangat_rentan,
            Vulnerability::Rentan => self.rentan,
            Vulnerability::TidakRentan => self.tidak_rentan,
        }
    }

    /// Percentage of all households in `class`; 0 when there are none.
    pub fn share(&self, class: Vulnerability) -> f64 {
        if self.total_keluarga == 0 { return 0.0 }
        self.count(class) as f64 / self.total_keluarga as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<HouseholdRecord> {
        vec![
            HouseholdRecord::new(Some("CITANGTU"), Some("Sangat Rentan")),
            HouseholdRecord::new(Some("CITANGTU"), Some("Rentan")),
            HouseholdRecord::new(Some("CITANGTU"), Some("Tidak Rentan")),
            HouseholdRecord::new(Some("CIHUNI"), Some("Sangat Rentan")),
            HouseholdRecord::new(None, Some("Tidak Rentan")),
            HouseholdRecord::new(Some("CIHUNI"), None),
        ]
    }

    #[test]
    fn parses_model_labels() {
        assert_eq!("Sangat Rentan".parse::<Vulnerability>(), Ok(Vulnerability::SangatRentan));
        assert_eq!("Tidak Rentan".parse::<Vulnerability>(), Ok(Vulnerability::TidakRentan));
        assert!("rentan".parse::<Vulnerability>().is_err());
    }

    #[test]
    fn summary_counts_classes_and_totals() {
        let table = summarize_villages(&records());
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["CIHUNI", "CITANGTU", UNNAMED_VILLAGE]);

        let citangtu = table.get("CITANGTU").unwrap();
        assert_eq!(citangtu.sangat_rentan, Some(1));
        assert_eq!(citangtu.rentan, Some(1));
        assert_eq!(citangtu.tidak_rentan, Some(1));
        assert_eq!(citangtu.total_kk, Some(3));
        // (1 + 2 + 3) / 9
        assert_eq!(citangtu.indeks_desa, Some(0.6667));

        let cihuni = table.get("CIHUNI").unwrap();
        assert_eq!(cihuni.total_kk, Some(2));
        // 1 / 6, the unclassified household still counts toward the total
        assert_eq!(cihuni.indeks_desa, Some(0.1667));
    }

    #[test]
    fn dashboard_totals_all_villages() {
        let totals = DashboardTotals::compute(&records(), ALL_VILLAGES);
        assert_eq!(totals.total_keluarga, 6);
        assert_eq!(totals.sangat_rentan, 2);
        assert_eq!(totals.rentan, 1);
        assert_eq!(totals.tidak_rentan, 2);
        assert_eq!(totals.filter_desa, "SEMUA");
    }

    #[test]
    fn dashboard_totals_one_village() {
        let totals = DashboardTotals::compute(&records(), "CIHUNI");
        assert_eq!(totals.total_keluarga, 2);
        assert_eq!(totals.sangat_rentan, 1);
        assert_eq!(totals.share(Vulnerability::SangatRentan), 50.0);
    }

    #[test]
    fn share_of_empty_totals_is_zero() {
        let totals = DashboardTotals::compute(&[], ALL_VILLAGES);
        assert_eq!(totals.share(Vulnerability::Rentan), 0.0);
    }
}
