use crate::interface::ObserverLocation;
use serde::{Deserialize, Serialize};

/// Mean spherical earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Raw SNR value marking "no valid measurement".
pub const SNR_SENTINEL: f64 = -99.0;

/// Slant range that SNR values are rescaled to, in meters.
pub const REFERENCE_RANGE_M: f64 = 100_000.0;

/// Constants shared by every derivation in one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub observer: ObserverLocation,
    pub earth_radius_m: f64,
    pub snr_sentinel: f64,
    pub reference_range_m: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            observer: ObserverLocation::default(),
            earth_radius_m: EARTH_RADIUS_M,
            snr_sentinel: SNR_SENTINEL,
            reference_range_m: REFERENCE_RANGE_M,
        }
    }
}

impl PipelineConfig {
    pub fn with_observer(observer: ObserverLocation) -> Self {
        Self {
            observer,
            ..Default::default()
        }
    }

    /// Rejects configurations no derivation could run against.
    pub fn validate(&self) -> PipelineResult<()> {
        self.observer.validate()?;
        if !(self.earth_radius_m.is_finite() && self.earth_radius_m > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "earth radius must be positive, got {}",
                self.earth_radius_m
            )));
        }
        if !(self.reference_range_m.is_finite() && self.reference_range_m > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "reference range must be positive, got {}",
                self.reference_range_m
            )));
        }
        Ok(())
    }
}

/// Failures that abort a whole batch.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("slant range must be strictly positive, got {0} m")]
    InvalidRange(f64),
    #[error("observer location ({latitude}, {longitude}, {altitude} m) is out of range")]
    InvalidObserver {
        latitude: f64,
        longitude: f64,
        altitude: f64,
    },
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Per-record failures. The record is skipped and the batch continues.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("record {index} ({serial}): coordinate ({latitude}, {longitude}) out of range")]
    InvalidCoordinate {
        index: usize,
        serial: String,
        latitude: f64,
        longitude: f64,
    },
    #[error("record {index} ({serial}): {field} is not a finite number")]
    InvalidMeasurement {
        index: usize,
        serial: String,
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_reference_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.earth_radius_m, 6_371_000.0);
        assert_eq!(config.snr_sentinel, -99.0);
        assert_eq!(config.reference_range_m, 100_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_radius() {
        let config = PipelineConfig {
            earth_radius_m: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"snr_sentinel": -1.0}"#).unwrap();
        assert_eq!(config.snr_sentinel, -1.0);
        assert_eq!(config.reference_range_m, REFERENCE_RANGE_M);
    }
}
