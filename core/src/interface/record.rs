use serde::{Deserialize, Serialize};

/// Decoder fields the pipeline carries through without interpreting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SondePayload {
    pub timestamp: String,
    pub serial: String,
    pub frame: Option<u64>,
    pub vel_v: Option<f64>,
    pub vel_h: Option<f64>,
    pub heading: Option<f64>,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    #[serde(rename = "type")]
    pub sonde_type: String,
    pub freq_mhz: Option<f64>,
    pub f_error_hz: Option<f64>,
    pub sats: Option<u32>,
    pub batt_v: Option<f64>,
    pub burst_timer: Option<i64>,
    pub aux_data: String,
}

/// One decoded radiosonde position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Meters above mean sea level.
    #[serde(alias = "alt")]
    pub altitude: f64,
    /// Raw SNR in dB, or the run's sentinel when the decoder had none.
    pub snr: f64,
    #[serde(flatten)]
    pub payload: SondePayload,
}

impl TelemetryRecord {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, snr: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            snr,
            payload: SondePayload::default(),
        }
    }

    pub fn with_payload(mut self, payload: SondePayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn serial(&self) -> &str {
        &self.payload.serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_short_field_names() {
        let record: TelemetryRecord = serde_json::from_str(
            r#"{"lat": 46.5, "lon": 9.0, "alt": 15000.0, "snr": 10.0, "serial": "S1234567", "type": "RS41"}"#,
        )
        .unwrap();
        assert_eq!(record.latitude, 46.5);
        assert_eq!(record.serial(), "S1234567");
        assert_eq!(record.payload.sonde_type, "RS41");
        assert_eq!(record.payload.frame, None);
    }
}
