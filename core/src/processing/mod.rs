pub mod filter;
pub mod normalize;
pub mod record;

pub use filter::{RecordFilter, SentinelSnrFilter};
pub use normalize::normalize_snr;
pub use record::{ProcessedBatch, RecordProcessor};
