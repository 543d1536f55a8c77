use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::EnrichedFeature;
use crate::style::Rgb;

/// Metric a choropleth layer is colored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SangatRentan,
    Rentan,
    TidakRentan,
    IndeksDesa,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category {0:?} (expected sangat_rentan, rentan, tidak_rentan or indeks_desa)")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 4] = [Self::SangatRentan, Self::Rentan, Self::TidakRentan, Self::IndeksDesa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SangatRentan => "sangat_rentan",
            Category::Rentan => "rentan",
            Category::TidakRentan => "tidak_rentan",
            Category::IndeksDesa => "indeks_desa",
        }
    }

    /// Styling rules for this category.
    pub fn scheme(&self) -> &'static Scheme {
        &SCHEMES[*self as usize]
    }

    #[inline] pub fn title(&self) -> &'static str { self.scheme().title }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL.into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// How a value is compared against a tier's lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `value >= bound`
    AtLeast,
    /// `value > bound`
    Above,
}

impl Comparison {
    #[inline]
    pub(crate) fn passes(self, value: f64, bound: f64) -> bool {
        match self {
            Comparison::AtLeast => value >= bound,
            Comparison::Above => value > bound,
        }
    }
}

/// Threshold regime: ordered tier bounds, the comparison used against them,
/// and the legend text of each tier.
#[derive(Debug)]
pub struct Regime {
    pub name: &'static str,
    /// Lower bounds of tiers 0..=3, most favorable first; tier 4 takes the rest.
    pub bounds: [f64; 4],
    pub comparison: Comparison,
    pub legend: [&'static str; 5],
}

/// Index scale 0.0–1.0, inclusive lower bounds.
pub static RATIO: Regime = Regime {
    name: "ratio",
    bounds: [0.8, 0.7, 0.6, 0.5],
    comparison: Comparison::AtLeast,
    legend: [
        "> 0.8 (Sangat Baik)",
        "> 0.7 (Baik)",
        "> 0.6 (Cukup)",
        "> 0.5 (Kurang)",
        "< 0.5 (Rentan)",
    ],
};

/// Household share in percent, strict lower bounds.
pub static PERCENTAGE: Regime = Regime {
    name: "percentage",
    bounds: [40.0, 30.0, 20.0, 10.0],
    comparison: Comparison::Above,
    legend: [
        "> 40% (Sangat Tinggi)",
        "> 30% (Tinggi)",
        "> 20% (Sedang)",
        "> 10% (Rendah)",
        "< 10% (Sangat Rendah)",
    ],
};

/// Everything needed to color and describe one category.
pub struct Scheme {
    pub category: Category,
    pub title: &'static str,
    pub regime: &'static Regime,
    /// Fill color per tier, tier 0 first.
    pub palette: [Rgb; 5],
    metric: fn(&EnrichedFeature) -> f64,
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheme")
            .field("category", &self.category)
            .field("regime", &self.regime.name)
            .finish_non_exhaustive()
    }
}

impl Scheme {
    /// Value of this scheme's metric on a feature.
    #[inline]
    pub fn metric(&self, feature: &EnrichedFeature) -> f64 { (self.metric)(feature) }
}

/// Indexed by `Category as usize`.
static SCHEMES: [Scheme; 4] = [
    Scheme {
        category: Category::SangatRentan,
        title: "Sangat Rentan",
        regime: &PERCENTAGE,
        palette: [
            Rgb::from_hex(0x7f1d1d),
            Rgb::from_hex(0xb91c1c),
            Rgb::from_hex(0xdc2626),
            Rgb::from_hex(0xef4444),
            Rgb::from_hex(0xfca5a5),
        ],
        metric: |f| f.pct_sangat_rentan,
    },
    Scheme {
        category: Category::Rentan,
        title: "Rentan",
        regime: &PERCENTAGE,
        palette: [
            Rgb::from_hex(0x713f12),
            Rgb::from_hex(0xa16207),
            Rgb::from_hex(0xd97706),
            Rgb::from_hex(0xf59e0b),
            Rgb::from_hex(0xfcd34d),
        ],
        metric: |f| f.pct_rentan,
    },
    Scheme {
        category: Category::TidakRentan,
        title: "Tidak Rentan",
        regime: &PERCENTAGE,
        palette: [
            Rgb::from_hex(0x14532d),
            Rgb::from_hex(0x15803d),
            Rgb::from_hex(0x16a34a),
            Rgb::from_hex(0x22c55e),
            Rgb::from_hex(0x86efac),
        ],
        metric: |f| f.pct_tidak_rentan,
    },
    Scheme {
        category: Category::IndeksDesa,
        title: "Indeks Desa",
        regime: &RATIO,
        // Dark green (best) to red (most vulnerable).
        palette: [
            Rgb::from_hex(0x15803d),
            Rgb::from_hex(0x22c55e),
            Rgb::from_hex(0xfacc15),
            Rgb::from_hex(0xf97316),
            Rgb::from_hex(0xb91c1c),
        ],
        metric: |f| f.indeks_desa,
    },
];

/// Scheme used when a category name is not recognized.
pub fn default_scheme() -> &'static Scheme {
    Category::SangatRentan.scheme()
}

/// Display title for a category name; empty for unknown names.
pub fn category_title(name: &str) -> &'static str {
    name.parse::<Category>().map(|c| c.title()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemes_are_indexed_by_category() {
        for category in Category::ALL {
            assert_eq!(category.scheme().category, category);
        }
    }

    #[test]
    fn parses_and_displays_names() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
        let err = "kemiskinan".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("kemiskinan".into()));
        assert!(err.to_string().contains("kemiskinan"));
    }

    #[test]
    fn serde_uses_snake_case_names() {
        assert_eq!(serde_json::to_value(Category::IndeksDesa).unwrap(), "indeks_desa");
        let parsed: Category = serde_json::from_value(serde_json::json!("tidak_rentan")).unwrap();
        assert_eq!(parsed, Category::TidakRentan);
    }

    #[test]
    fn only_the_index_uses_the_ratio_regime() {
        for category in Category::ALL {
            let ratio = std::ptr::eq(category.scheme().regime, &RATIO);
            assert_eq!(ratio, category == Category::IndeksDesa, "{category}");
        }
    }

    #[test]
    fn titles() {
        assert_eq!(category_title("sangat_rentan"), "Sangat Rentan");
        assert_eq!(category_title("indeks_desa"), "Indeks Desa");
        assert_eq!(category_title("unknown"), "");
    }
}
