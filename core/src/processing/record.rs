use crate::interface::observer::valid_coordinate;
use crate::interface::{DerivedObservation, ObservationBatch, TelemetryRecord};
use crate::math::geodetic::{
    bearing, curvature_height_drop, elevation_angle, slant_range, surface_distance, GeoPoint,
};
use crate::prelude::{PipelineConfig, PipelineResult, RecordError};
use crate::processing::filter::{RecordFilter, SentinelSnrFilter};
use crate::processing::normalize::normalize_snr;
use crate::telemetry::{LogManager, MetricsRecorder};
use rayon::prelude::*;

/// Result of one pass over a batch of records.
#[derive(Debug, Clone, Default)]
pub struct ProcessedBatch {
    /// One entry per retained, valid record, in input order.
    pub observations: ObservationBatch,
    /// Records skipped for bad coordinates or measurements, in input order.
    pub rejected: Vec<RecordError>,
    /// Records dropped by the filter before derivation.
    pub filtered: usize,
}

/// Filters a batch of telemetry and derives sky position and normalized SNR
/// for every remaining record.
///
/// Derivation runs on the rayon pool; output order always matches input order.
pub struct RecordProcessor<F = SentinelSnrFilter> {
    config: PipelineConfig,
    filter: F,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl RecordProcessor<SentinelSnrFilter> {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let filter = SentinelSnrFilter::new(config.snr_sentinel);
        Self::with_filter(config, filter)
    }
}

impl<F: RecordFilter> RecordProcessor<F> {
    pub fn with_filter(config: PipelineConfig, filter: F) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            filter,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Runs filter, derivation and assembly over `records`.
    ///
    /// Bad records are collected in [`ProcessedBatch::rejected`]; a
    /// non-positive slant range aborts the whole batch.
    pub fn process(&self, records: Vec<TelemetryRecord>) -> PipelineResult<ProcessedBatch> {
        let total = records.len();
        let retained: Vec<(usize, TelemetryRecord)> = records
            .into_iter()
            .enumerate()
            .filter(|(_, record)| self.filter.retain(record))
            .collect();
        let filtered = total - retained.len();

        let outcomes = retained
            .into_par_iter()
            .map(|(index, record)| self.derive(index, record))
            .collect::<PipelineResult<Vec<_>>>()?;

        let mut observations = Vec::with_capacity(outcomes.len());
        let mut rejected = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(observation) => observations.push(observation),
                Err(error) => {
                    self.logger.skipped(&error);
                    rejected.push(error);
                }
            }
        }

        self.metrics.record_filtered(filtered);
        self.metrics.record_processed(observations.len());
        self.metrics.record_rejected(rejected.len());
        self.logger.record(&format!(
            "RecordProcessor derived {} of {} records ({} filtered, {} rejected)",
            observations.len(),
            total,
            filtered,
            rejected.len()
        ));

        Ok(ProcessedBatch {
            observations: ObservationBatch::new(observations),
            rejected,
            filtered,
        })
    }

    fn derive(
        &self,
        index: usize,
        record: TelemetryRecord,
    ) -> PipelineResult<Result<DerivedObservation, RecordError>> {
        if let Err(error) = check_record(index, &record) {
            return Ok(Err(error));
        }

        let observer = &self.config.observer;
        let radius = self.config.earth_radius_m;
        let origin = GeoPoint::from(observer);
        let target = GeoPoint::from(&record);

        let distance = surface_distance(origin, target, radius);
        let drop = curvature_height_drop(distance, radius);
        let elevation_deg = elevation_angle(record.altitude, observer.altitude, distance, drop);
        let slant_range_m = slant_range(distance, record.altitude);
        let azimuth_deg = bearing(origin, target);
        let normalized_snr_db =
            normalize_snr(record.snr, slant_range_m, self.config.reference_range_m)?;

        Ok(Ok(DerivedObservation {
            azimuth_deg,
            elevation_deg,
            normalized_snr_db,
            slant_range_m,
            source: record,
        }))
    }
}

fn check_record(index: usize, record: &TelemetryRecord) -> Result<(), RecordError> {
    if !valid_coordinate(record.latitude, record.longitude) {
        return Err(RecordError::InvalidCoordinate {
            index,
            serial: record.serial().to_string(),
            latitude: record.latitude,
            longitude: record.longitude,
        });
    }
    let field = if !record.altitude.is_finite() {
        "altitude"
    } else if !record.snr.is_finite() {
        "snr"
    } else {
        return Ok(());
    };
    Err(RecordError::InvalidMeasurement {
        index,
        serial: record.serial().to_string(),
        field,
    })
}
