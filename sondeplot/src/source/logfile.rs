//! Reader for decoder CSV logs (one header row, one position report per line).

use anyhow::Context;
use log::{debug, info, warn};
use serde::Deserialize;
use sondecore::interface::SondePayload;
use sondecore::TelemetryRecord;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One CSV row. Unparseable optional columns read as `None`.
#[derive(Debug, Deserialize)]
struct LogRow {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    serial: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    frame: Option<u64>,
    lat: f64,
    lon: f64,
    alt: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    vel_v: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    vel_h: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    heading: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    temp: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    humidity: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pressure: Option<f64>,
    #[serde(rename = "type", default)]
    sonde_type: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    freq_mhz: Option<f64>,
    snr: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    f_error_hz: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    sats: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batt_v: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    burst_timer: Option<i64>,
    #[serde(default)]
    aux_data: String,
}

impl From<LogRow> for TelemetryRecord {
    fn from(row: LogRow) -> Self {
        TelemetryRecord::new(row.lat, row.lon, row.alt, row.snr).with_payload(SondePayload {
            timestamp: row.timestamp,
            serial: row.serial,
            frame: row.frame,
            vel_v: row.vel_v,
            vel_h: row.vel_h,
            heading: row.heading,
            temp: row.temp,
            humidity: row.humidity,
            pressure: row.pressure,
            sonde_type: row.sonde_type,
            freq_mhz: row.freq_mhz,
            f_error_hz: row.f_error_hz,
            sats: row.sats,
            batt_v: row.batt_v,
            burst_timer: row.burst_timer,
            aux_data: row.aux_data,
        })
    }
}

/// Records gathered from every accepted log, in argument then line order.
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub records: Vec<TelemetryRecord>,
    pub malformed: usize,
    pub skipped_files: Vec<PathBuf>,
}

pub struct LogSource {
    skip_dfm: bool,
}

impl LogSource {
    pub fn new(skip_dfm: bool) -> Self {
        Self { skip_dfm }
    }

    /// DFM logs carry the sonde family in their file name.
    pub fn should_skip(&self, path: &Path) -> bool {
        self.skip_dfm
            && path
                .file_name()
                .map(|name| name.to_string_lossy().contains("DFM"))
                .unwrap_or(false)
    }

    pub fn read_all(&self, paths: &[PathBuf]) -> anyhow::Result<SourceBatch> {
        let mut batch = SourceBatch::default();
        for path in paths {
            if self.should_skip(path) {
                debug!("skipping DFM log {}", path.display());
                batch.skipped_files.push(path.clone());
                continue;
            }
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening log {}", path.display()))?;
            let (records, malformed) = read_records(file, &path.display().to_string())
                .with_context(|| format!("reading log {}", path.display()))?;
            info!(
                "{}: {} records ({} malformed rows)",
                path.display(),
                records.len(),
                malformed
            );
            batch.records.extend(records);
            batch.malformed += malformed;
        }
        Ok(batch)
    }
}

/// Parses every row of one log. Rows with unreadable position or SNR are
/// counted and skipped; a broken header fails the whole file.
pub fn read_records<R: Read>(
    reader: R,
    origin: &str,
) -> anyhow::Result<(Vec<TelemetryRecord>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    reader
        .headers()
        .with_context(|| format!("reading header of {}", origin))?;

    let mut records = Vec::new();
    let mut malformed = 0;
    for (line, row) in reader.deserialize::<LogRow>().enumerate() {
        match row {
            Ok(row) => records.push(TelemetryRecord::from(row)),
            Err(err) => {
                malformed += 1;
                warn!("{} row {}: {}", origin, line + 1, err);
            }
        }
    }
    Ok((records, malformed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "timestamp,serial,frame,lat,lon,alt,vel_v,vel_h,heading,temp,humidity,pressure,type,freq_mhz,snr,f_error_hz,sats,batt_v,burst_timer,aux_data\n";

    fn log_text(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn rows_map_to_records_with_payload() {
        let text = log_text(&[
            "2023-06-01T11:02:03.000Z,S1234567,1502,46.51,9.02,15012.3,5.1,3.2,45.0,-55.1,12.0,120.5,RS41,403.001,12.4,-250,9,2.9,-1,",
        ]);
        let (records, malformed) = read_records(text.as_bytes(), "test").unwrap();
        assert_eq!(malformed, 0);
        let record = &records[0];
        assert_eq!(record.latitude, 46.51);
        assert_eq!(record.altitude, 15012.3);
        assert_eq!(record.snr, 12.4);
        assert_eq!(record.serial(), "S1234567");
        assert_eq!(record.payload.frame, Some(1502));
        assert_eq!(record.payload.sonde_type, "RS41");
        assert_eq!(record.payload.burst_timer, Some(-1));
        assert_eq!(record.payload.aux_data, "");
    }

    #[test]
    fn bad_optional_fields_become_none() {
        let text = log_text(&[
            "2023-06-01T11:02:03.000Z,S1,x,46.51,9.02,15012.3,,3.2,45.0,-273.0,-1,-1,RS41,403.001,-99.0,-250,-1,-1,-1,-1",
        ]);
        let (records, _) = read_records(text.as_bytes(), "test").unwrap();
        assert_eq!(records[0].payload.frame, None);
        assert_eq!(records[0].payload.vel_v, None);
        assert_eq!(records[0].snr, -99.0);
        assert_eq!(records[0].payload.sats, None);
    }

    #[test]
    fn rows_with_bad_altitude_are_counted() {
        let text = log_text(&[
            "t1,S1,1,46.51,9.02,high,,,,,,,RS41,403.0,10.0,,,,,",
            "t2,S1,2,46.52,9.03,15100.0,,,,,,,RS41,403.0,11.0,,,,,",
        ]);
        let (records, malformed) = read_records(text.as_bytes(), "test").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(malformed, 1);
        assert_eq!(records[0].payload.timestamp, "t2");
    }

    #[test]
    fn dfm_logs_are_skipped_on_request() {
        let mut rs41 = NamedTempFile::new().unwrap();
        let rs41_text = log_text(&["t1,S1,1,46.51,9.02,15000.0,,,,,,,RS41,403.0,10.0,,,,,"]);
        rs41.write_all(rs41_text.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let dfm_path = dir.path().join("20230601-110000_DFM-123456_DFM_403000_sonde.log");
        std::fs::write(
            &dfm_path,
            log_text(&["t1,D1,1,46.51,9.02,15000.0,,,,,,,DFM,403.0,10.0,,,,,"]),
        )
        .unwrap();

        let paths = vec![rs41.path().to_path_buf(), dfm_path.clone()];
        let skipping = LogSource::new(true).read_all(&paths).unwrap();
        assert_eq!(skipping.records.len(), 1);
        assert_eq!(skipping.skipped_files, vec![dfm_path]);

        let keeping = LogSource::new(false).read_all(&paths).unwrap();
        assert_eq!(keeping.records.len(), 2);
        assert_eq!(keeping.records[1].serial(), "D1");
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = LogSource::new(false);
        assert!(source
            .read_all(&[PathBuf::from("/nonexistent/sonde.log")])
            .is_err());
    }
}
