use crate::prelude::{PipelineError, PipelineResult};

/// Rescales `raw_snr_db` to what it would read at `reference_range_m`,
/// assuming free-space loss of 20 dB per decade of distance.
pub fn normalize_snr(
    raw_snr_db: f64,
    slant_range_m: f64,
    reference_range_m: f64,
) -> PipelineResult<f64> {
    if slant_range_m.is_nan() || slant_range_m <= 0.0 {
        return Err(PipelineError::InvalidRange(slant_range_m));
    }
    Ok(raw_snr_db - 20.0 * (reference_range_m / slant_range_m).log10())
}
