use anyhow::Context;
use sondecore::ObservationBatch;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_observations_csv(batch: &ObservationBatch, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    write_observation_rows(batch, &mut writer)
        .with_context(|| format!("writing {}", path.display()))
}

fn write_observation_rows<W: Write>(
    batch: &ObservationBatch,
    writer: &mut csv::Writer<W>,
) -> anyhow::Result<()> {
    writer.write_record([
        "timestamp",
        "serial",
        "azimuth_deg",
        "elevation_deg",
        "slant_range_m",
        "snr",
        "snr_100km",
    ])?;
    for observation in batch {
        writer.write_record([
            observation.source.payload.timestamp.clone(),
            observation.source.serial().to_string(),
            format!("{:.3}", observation.azimuth_deg),
            format!("{:.3}", observation.elevation_deg),
            format!("{:.1}", observation.slant_range_m),
            format!("{:.1}", observation.raw_snr_db()),
            format!("{:.2}", observation.normalized_snr_db),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
