mod code;
mod feature;
mod filter;
mod io;

pub use code::{normalize_code, AdminCode};
pub use feature::{BoundaryCollection, BoundaryFeature, BoundaryGeometry, Rings};
pub use filter::{outline_filter, AllowList, VillageFilter};

pub(crate) use io::feature_json;
