pub mod observation;
pub mod observer;
pub mod record;

pub use observation::{DerivedObservation, ObservationBatch};
pub use observer::ObserverLocation;
pub use record::{SondePayload, TelemetryRecord};
