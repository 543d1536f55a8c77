//! Choropleth classification: tiers, palettes and legend text per category.

mod classify;
mod color;
mod legend;
mod scheme;

pub use classify::{classify, Classification, Tier};
pub use color::Rgb;
pub use legend::{legend_label, LegendEntry};
pub use scheme::{category_title, default_scheme, Category, Comparison, Regime, Scheme, UnknownCategory, PERCENTAGE, RATIO};
