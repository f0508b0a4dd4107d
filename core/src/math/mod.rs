pub mod geodetic;
pub mod stats;

pub use geodetic::GeoPoint;
pub use stats::StatsHelper;
