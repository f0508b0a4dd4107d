use crate::workflow::runner::WorkflowResult;
use serde::{Deserialize, Serialize};

/// One plotted point as served to chart clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub snr_100km: f64,
    pub snr: f64,
    pub serial: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkyChartModel {
    pub points: Vec<SkyPoint>,
    /// Color-scale bounds; absent when there is nothing to plot.
    pub snr_100km_extent: Option<(f64, f64)>,
    pub filtered: usize,
    pub rejected: usize,
    pub notes: Vec<String>,
}

impl From<&WorkflowResult> for SkyChartModel {
    fn from(result: &WorkflowResult) -> Self {
        let points = result
            .observations
            .iter()
            .map(|observation| SkyPoint {
                azimuth_deg: observation.azimuth_deg,
                elevation_deg: observation.elevation_deg,
                snr_100km: observation.normalized_snr_db,
                snr: observation.raw_snr_db(),
                serial: observation.source.serial().to_string(),
                timestamp: observation.source.payload.timestamp.clone(),
            })
            .collect();
        Self {
            points,
            snr_100km_extent: result.observations.normalized_snr_extent(),
            filtered: result.filtered,
            rejected: result.rejected.len(),
            notes: result.rejected.iter().map(|err| err.to_string()).collect(),
        }
    }
}
