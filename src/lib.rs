#![doc = "Pangatikan village-welfare choropleth engine"]
mod config;
mod geom;
mod map;
mod package;
mod stats;
mod style;

#[doc(inline)]
pub use config::{Config, PropertyKeys};

#[doc(inline)]
pub use geom::{anchor_point, CentroidMode};

#[doc(inline)]
pub use map::{
    normalize_code, outline_filter, AdminCode, AllowList, BoundaryCollection, BoundaryFeature,
    BoundaryGeometry, Rings, VillageFilter,
};

#[doc(inline)]
pub use stats::{
    merge_stats, name_key, summarize_villages, DashboardTotals, EnrichedFeature, HouseholdRecord,
    MergeOutcome, StatsTable, VillageStats, Vulnerability, ALL_VILLAGES, UNNAMED_VILLAGE,
};

#[doc(inline)]
pub use style::{
    category_title, classify, default_scheme, legend_label, Category, Classification, Comparison,
    LegendEntry, Regime, Rgb, Scheme, Tier, UnknownCategory, PERCENTAGE, RATIO,
};

#[doc(inline)]
pub use package::{build_package, displayed_average, marker_label, ChoroplethPackage};
