use crate::interface::record::TelemetryRecord;
use crate::math::stats::StatsHelper;
use serde::{Deserialize, Serialize};

/// Position and normalized signal of one retained record as seen from the observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedObservation {
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// SNR rescaled to the reference slant range, in dB.
    pub normalized_snr_db: f64,
    pub slant_range_m: f64,
    pub source: TelemetryRecord,
}

impl DerivedObservation {
    pub fn raw_snr_db(&self) -> f64 {
        self.source.snr
    }
}

/// Ordered observations for one run, handed to the renderer as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationBatch {
    observations: Vec<DerivedObservation>,
}

impl ObservationBatch {
    pub fn new(observations: Vec<DerivedObservation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivedObservation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[DerivedObservation] {
        &self.observations
    }

    /// Color-scale bounds. `None` when the batch is empty.
    pub fn normalized_snr_extent(&self) -> Option<(f64, f64)> {
        StatsHelper::extent(self.observations.iter().map(|o| o.normalized_snr_db))
    }

    pub fn raw_snr_extent(&self) -> Option<(f64, f64)> {
        StatsHelper::extent(self.observations.iter().map(|o| o.raw_snr_db()))
    }

    pub fn elevation_extent(&self) -> Option<(f64, f64)> {
        StatsHelper::extent(self.observations.iter().map(|o| o.elevation_deg))
    }
}

impl<'a> IntoIterator for &'a ObservationBatch {
    type Item = &'a DerivedObservation;
    type IntoIter = std::slice::Iter<'a, DerivedObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(normalized: f64, raw: f64) -> DerivedObservation {
        DerivedObservation {
            azimuth_deg: 10.0,
            elevation_deg: 5.0,
            normalized_snr_db: normalized,
            slant_range_m: 50_000.0,
            source: TelemetryRecord::new(46.5, 9.0, 10_000.0, raw),
        }
    }

    #[test]
    fn empty_batch_has_no_extents() {
        let batch = ObservationBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.normalized_snr_extent(), None);
        assert_eq!(batch.raw_snr_extent(), None);
    }

    #[test]
    fn extents_span_the_batch() {
        let batch = ObservationBatch::new(vec![
            observation(3.0, 12.0),
            observation(-4.5, 8.0),
            observation(7.25, 20.0),
        ]);
        assert_eq!(batch.normalized_snr_extent(), Some((-4.5, 7.25)));
        assert_eq!(batch.raw_snr_extent(), Some((8.0, 20.0)));
    }
}
