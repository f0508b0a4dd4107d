use crate::interface::TelemetryRecord;

/// Predicate deciding which records enter derivation.
pub trait RecordFilter: Sync {
    fn retain(&self, record: &TelemetryRecord) -> bool;
}

/// Drops records whose raw SNR equals the "no measurement" marker.
#[derive(Debug, Clone, Copy)]
pub struct SentinelSnrFilter {
    sentinel: f64,
}

impl SentinelSnrFilter {
    pub fn new(sentinel: f64) -> Self {
        Self { sentinel }
    }
}

impl RecordFilter for SentinelSnrFilter {
    fn retain(&self, record: &TelemetryRecord) -> bool {
        record.snr != self.sentinel
    }
}

impl<F> RecordFilter for F
where
    F: Fn(&TelemetryRecord) -> bool + Sync,
{
    fn retain(&self, record: &TelemetryRecord) -> bool {
        self(record)
    }
}
