use serde::Serialize;

use crate::style::{Category, Rgb, Scheme, Tier};

/// One legend row: swatch color and tier description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub tier: Tier,
    pub color: Rgb,
    pub label: &'static str,
}

impl Scheme {
    /// Description of one tier.
    #[inline] pub fn legend_label(&self, tier: Tier) -> &'static str { self.regime.legend[tier.index()] }

    /// All five legend rows, tier 0 first.
    pub fn legend(&self) -> Vec<LegendEntry> {
        Tier::all()
            .map(|tier| LegendEntry { tier, color: self.color(tier), label: self.legend_label(tier) })
            .collect()
    }
}

/// Legend text for a category name and tier index. Unknown categories and
/// tiers outside 0..=4 yield an empty string.
pub fn legend_label(category: &str, tier: usize) -> &'static str {
    match (category.parse::<Category>(), Tier::new(tier)) {
        (Ok(category), Some(tier)) => category.scheme().legend_label(tier),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_legend_uses_ratio_labels() {
        assert_eq!(legend_label("indeks_desa", 0), "> 0.8 (Sangat Baik)");
        assert_eq!(legend_label("indeks_desa", 2), "> 0.6 (Cukup)");
        assert_eq!(legend_label("indeks_desa", 4), "< 0.5 (Rentan)");
    }

    #[test]
    fn percentage_legend_is_shared_by_the_social_categories() {
        for name in ["sangat_rentan", "rentan", "tidak_rentan"] {
            assert_eq!(legend_label(name, 0), "> 40% (Sangat Tinggi)");
            assert_eq!(legend_label(name, 4), "< 10% (Sangat Rendah)");
        }
    }

    #[test]
    fn out_of_range_tier_and_unknown_category_are_empty() {
        assert_eq!(legend_label("rentan", 5), "");
        assert_eq!(legend_label("bogus", 0), "");
    }

    #[test]
    fn legend_rows_pair_palette_with_labels() {
        let rows = Category::Rentan.scheme().legend();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].color, Rgb::from_hex(0x713f12));
        assert_eq!(rows[3].label, "> 10% (Rendah)");
        assert_eq!(rows[4].tier.index(), 4);
    }
}
