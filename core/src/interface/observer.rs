use crate::prelude::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

/// Fixed ground station every record is located against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above mean sea level.
    pub altitude: f64,
}

impl Default for ObserverLocation {
    fn default() -> Self {
        Self {
            latitude: 46.4,
            longitude: 8.9,
            altitude: 470.0,
        }
    }
}

impl ObserverLocation {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if valid_coordinate(self.latitude, self.longitude) && self.altitude.is_finite() {
            Ok(())
        } else {
            Err(PipelineError::InvalidObserver {
                latitude: self.latitude,
                longitude: self.longitude,
                altitude: self.altitude,
            })
        }
    }
}

/// Latitude within [-90, 90] and longitude within [-180, 180]. NaN fails both.
pub fn valid_coordinate(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_observer_is_valid() {
        assert!(ObserverLocation::default().validate().is_ok());
    }

    #[test]
    fn observer_outside_globe_is_rejected() {
        let observer = ObserverLocation::new(91.0, 8.9, 470.0);
        assert!(matches!(
            observer.validate(),
            Err(PipelineError::InvalidObserver { .. })
        ));
        assert!(ObserverLocation::new(0.0, f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn coordinate_bounds_are_inclusive() {
        assert!(valid_coordinate(90.0, -180.0));
        assert!(valid_coordinate(-90.0, 180.0));
        assert!(!valid_coordinate(-90.1, 0.0));
        assert!(!valid_coordinate(0.0, 180.5));
    }
}
