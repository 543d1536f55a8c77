mod merge;
mod summary;
mod table;

pub use merge::{merge_stats, EnrichedFeature, MergeOutcome};
pub use summary::{summarize_villages, DashboardTotals, HouseholdRecord, Vulnerability, ALL_VILLAGES, UNNAMED_VILLAGE};
pub use table::{name_key, StatsTable, VillageStats};
