use std::fmt;

use serde::Serialize;

use crate::stats::EnrichedFeature;
use crate::style::{default_scheme, Category, Regime, Rgb, Scheme};

/// Ordinal bucket 0..=4; tier 0 is the first bound of the regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Tier(u8);

impl Tier {
    pub const COUNT: usize = 5;

    pub fn new(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index as u8))
    }

    #[inline] pub fn index(&self) -> usize { self.0 as usize }

    pub fn all() -> impl Iterator<Item = Tier> {
        (0..Self::COUNT as u8).map(Tier)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Regime {
    /// First tier whose bound the value passes; the last tier otherwise.
    /// NaN never passes a bound and lands in the last tier.
    pub fn tier(&self, value: f64) -> Tier {
        self.bounds.iter()
            .position(|&bound| self.comparison.passes(value, bound))
            .map_or(Tier(self.bounds.len() as u8), |i| Tier(i as u8))
    }
}

/// Tier and fill color of one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: Tier,
    pub color: Rgb,
}

impl Scheme {
    pub fn tier(&self, value: f64) -> Tier { self.regime.tier(value) }

    #[inline] pub fn color(&self, tier: Tier) -> Rgb { self.palette[tier.index()] }

    pub fn classify(&self, value: f64) -> Classification {
        let tier = self.tier(value);
        Classification { tier, color: self.color(tier) }
    }

    /// Classify a feature by this scheme's metric.
    pub fn classify_feature(&self, feature: &EnrichedFeature) -> Classification {
        self.classify(self.metric(feature))
    }
}

impl Category {
    pub fn classify(&self, value: f64) -> Classification { self.scheme().classify(value) }
}

/// Classify a value for a category given by name. Missing values read as 0;
/// unknown names fall back to the default scheme.
pub fn classify(value: Option<f64>, category: &str) -> Classification {
    let scheme = category.parse::<Category>().map_or_else(|_| default_scheme(), |c| c.scheme());
    scheme.classify(value.unwrap_or(0.0))
}
