mod centroid;

pub use centroid::{anchor_point, CentroidMode};
