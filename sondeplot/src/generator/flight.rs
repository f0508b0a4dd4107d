use anyhow::{ensure, Context};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sondecore::interface::SondePayload;
use sondecore::prelude::{EARTH_RADIUS_M, SNR_SENTINEL};
use sondecore::{ObserverLocation, TelemetryRecord};

/// Parameters for a synthetic ascent/descent track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub observer: ObserverLocation,
    /// Launch site offset from the observer, meters east/north.
    pub launch_east_m: f64,
    pub launch_north_m: f64,
    pub ascent_rate_m_s: f64,
    pub descent_rate_m_s: f64,
    pub burst_altitude_m: f64,
    pub drift_m_s: f64,
    /// Direction the wind carries the sonde, degrees clockwise from north.
    pub drift_heading_deg: f64,
    pub sample_interval_s: f64,
    /// SNR received at 10 km slant range.
    pub snr_at_10km_db: f64,
    pub snr_jitter_db: f64,
    /// Share of samples reported without SNR.
    pub sentinel_fraction: f64,
    pub seed: u64,
    pub serial: String,
    pub sonde_type: String,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            observer: ObserverLocation::default(),
            launch_east_m: 4_000.0,
            launch_north_m: -2_000.0,
            ascent_rate_m_s: 5.0,
            descent_rate_m_s: 12.0,
            burst_altitude_m: 32_000.0,
            drift_m_s: 9.0,
            drift_heading_deg: 60.0,
            sample_interval_s: 30.0,
            snr_at_10km_db: 18.0,
            snr_jitter_db: 1.5,
            sentinel_fraction: 0.05,
            seed: 0,
            serial: "SYN00001".to_string(),
            sonde_type: "RS41".to_string(),
        }
    }
}

impl FlightConfig {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.ascent_rate_m_s > 0.0, "ascent rate must be positive");
        ensure!(self.descent_rate_m_s > 0.0, "descent rate must be positive");
        ensure!(self.sample_interval_s > 0.0, "sample interval must be positive");
        ensure!(
            self.burst_altitude_m > self.observer.altitude,
            "burst altitude must be above the observer"
        );
        ensure!(
            (0.0..=1.0).contains(&self.sentinel_fraction),
            "sentinel fraction must be within [0, 1]"
        );
        ensure!(self.snr_jitter_db >= 0.0, "SNR jitter must not be negative");
        Ok(())
    }

    fn flight_duration_s(&self) -> f64 {
        let climb = self.burst_altitude_m - self.observer.altitude;
        climb / self.ascent_rate_m_s + climb / self.descent_rate_m_s
    }

    fn altitude_at(&self, t: f64) -> f64 {
        let climb = self.burst_altitude_m - self.observer.altitude;
        let burst_time = climb / self.ascent_rate_m_s;
        if t <= burst_time {
            self.observer.altitude + t * self.ascent_rate_m_s
        } else {
            (self.burst_altitude_m - (t - burst_time) * self.descent_rate_m_s)
                .max(self.observer.altitude)
        }
    }
}

/// Offsets `observer` by local east/north meters on a spherical earth.
fn offset(observer: &ObserverLocation, east_m: f64, north_m: f64) -> (f64, f64) {
    let latitude = observer.latitude + (north_m / EARTH_RADIUS_M).to_degrees();
    let longitude = observer.longitude
        + (east_m / (EARTH_RADIUS_M * observer.latitude.to_radians().cos())).to_degrees();
    (latitude, longitude)
}

pub fn build_flight(config: &FlightConfig) -> anyhow::Result<Vec<TelemetryRecord>> {
    config.validate().context("invalid synthetic flight")?;

    let sample_count = (config.flight_duration_s() / config.sample_interval_s).ceil() as usize + 1;
    let heading = config.drift_heading_deg.to_radians();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(sample_count);

    for frame in 0..sample_count {
        let t = frame as f64 * config.sample_interval_s;
        let east = config.launch_east_m + config.drift_m_s * t * heading.sin();
        let north = config.launch_north_m + config.drift_m_s * t * heading.cos();
        let (latitude, longitude) = offset(&config.observer, east, north);
        let altitude = config.altitude_at(t);

        let slant = east.hypot(north).hypot(altitude - config.observer.altitude).max(1.0);
        let snr = if rng.gen_bool(config.sentinel_fraction) {
            SNR_SENTINEL
        } else {
            let jitter = if config.snr_jitter_db > 0.0 {
                rng.gen_range(-config.snr_jitter_db..config.snr_jitter_db)
            } else {
                0.0
            };
            config.snr_at_10km_db - 20.0 * (slant / 10_000.0).log10() + jitter
        };

        let payload = SondePayload {
            timestamp: format!("T+{:.0}s", t),
            serial: config.serial.clone(),
            frame: Some(frame as u64),
            sonde_type: config.sonde_type.clone(),
            ..Default::default()
        };
        records.push(
            TelemetryRecord::new(latitude, longitude, altitude, snr).with_payload(payload),
        );
    }

    Ok(records)
}
