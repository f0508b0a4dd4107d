//! Geometry and signal-normalization core for radiosonde sky charts.
//!
//! Telemetry records are filtered, located relative to a fixed ground
//! observer (azimuth, curvature-corrected elevation, slant range) and their
//! SNR is rescaled to a common reference range before being handed to a
//! renderer.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use interface::{DerivedObservation, ObservationBatch, ObserverLocation, TelemetryRecord};
pub use prelude::{PipelineConfig, PipelineError, PipelineResult, RecordError};
pub use processing::{ProcessedBatch, RecordProcessor};
