//! Polar sky chart: north up, azimuth clockwise, zenith in the middle.

use crate::chart::palette::viridis;
use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;
use sondecore::math::StatsHelper;
use sondecore::ObservationBatch;
use std::path::Path;

const RING_STEP_DEG: f64 = 15.0;
const SPOKE_STEP_DEG: f64 = 30.0;
const COLORBAR_WIDTH: u32 = 150;
const COLORBAR_STEPS: usize = 64;

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub title: String,
    pub dot_size: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Sky chart".to_string(),
            dot_size: 5,
            width: 900,
            height: 800,
        }
    }
}

/// Maps elevation to chart radius: 90° at the centre, `rim_deg` at radius 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialScale {
    pub rim_deg: f64,
}

impl RadialScale {
    /// Rim at the lowest elevation in the batch rounded down to a ring,
    /// never above the horizon.
    pub fn for_batch(batch: &ObservationBatch) -> Self {
        let rim_deg = batch
            .elevation_extent()
            .map(|(lowest, _)| (lowest / RING_STEP_DEG).floor() * RING_STEP_DEG)
            .unwrap_or(0.0)
            .min(0.0)
            .max(-90.0);
        Self { rim_deg }
    }

    pub fn radius(&self, elevation_deg: f64) -> f64 {
        ((90.0 - elevation_deg) / (90.0 - self.rim_deg)).clamp(0.0, 1.0)
    }

    /// Elevations that get a labelled ring, from the rim inwards.
    pub fn rings(&self) -> Vec<f64> {
        let mut rings = Vec::new();
        let mut elevation = self.rim_deg;
        while elevation < 90.0 {
            rings.push(elevation);
            elevation += RING_STEP_DEG;
        }
        rings
    }
}

/// Chart-space position of a point at `azimuth_deg` and `radius`.
pub fn project(azimuth_deg: f64, radius: f64) -> (f64, f64) {
    let theta = azimuth_deg.to_radians();
    (radius * theta.sin(), radius * theta.cos())
}

fn spoke_label(azimuth_deg: f64) -> String {
    match azimuth_deg as u32 {
        0 => "N".to_string(),
        90 => "E".to_string(),
        180 => "S".to_string(),
        270 => "W".to_string(),
        other => format!("{}°", other),
    }
}

/// Writes the chart to `path`; `.svg` selects vector output, anything else PNG.
pub fn render_sky_chart(
    batch: &ObservationBatch,
    style: &ChartStyle,
    path: &Path,
) -> anyhow::Result<()> {
    let is_svg = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);
    let drawn = if is_svg {
        let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
        draw_chart(root, batch, style)
    } else {
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        draw_chart(root, batch, style)
    };
    drawn.with_context(|| format!("rendering sky chart {}", path.display()))
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    batch: &ObservationBatch,
    style: &ChartStyle,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let plot_width = style.width.saturating_sub(COLORBAR_WIDTH);
    let (plot_area, bar_area) = root.split_horizontally(plot_width);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&style.title, ("sans-serif", 26).into_font())
        .margin(30)
        .build_cartesian_2d(-1.15f64..1.15f64, -1.15f64..1.15f64)?;

    let scale = RadialScale::for_batch(batch);
    let grid = BLACK.mix(0.25);
    let label_font = ("sans-serif", 14).into_font();

    for ring in scale.rings() {
        let radius = scale.radius(ring);
        chart.draw_series(LineSeries::new(
            (0..=360).map(|deg| project(deg as f64, radius)),
            &grid,
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.0}°", ring),
            project(22.5, radius),
            label_font.clone(),
        )))?;
    }

    let mut azimuth = 0.0;
    while azimuth < 360.0 {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), project(azimuth, 1.0)],
            &grid,
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            spoke_label(azimuth),
            project(azimuth, 1.08),
            label_font.clone(),
        )))?;
        azimuth += SPOKE_STEP_DEG;
    }

    let extent = batch.normalized_snr_extent();
    if let Some((min_snr, max_snr)) = extent {
        chart.draw_series(batch.iter().map(|observation| {
            let color = viridis(StatsHelper::unit_position(
                observation.normalized_snr_db,
                min_snr,
                max_snr,
            ));
            Circle::new(
                project(observation.azimuth_deg, scale.radius(observation.elevation_deg)),
                style.dot_size,
                color.filled(),
            )
        }))?;
    }

    draw_colorbar(&bar_area, extent)?;
    root.present()?;
    Ok(())
}

/// Vertical viridis strip labelled with the batch's min and max.
fn draw_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    extent: Option<(f64, f64)>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut bar = ChartBuilder::on(area)
        .margin_top(80)
        .margin_bottom(80)
        .margin_left(10)
        .margin_right(70)
        .caption("SNR(100km)", ("sans-serif", 16).into_font())
        .build_cartesian_2d(0.0f64..1.0f64, 0.0f64..1.0f64)?;

    let step = 1.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let low = i as f64 * step;
        Rectangle::new([(0.0, low), (1.0, low + step)], viridis(low + step / 2.0).filled())
    }))?;

    if let Some((min_snr, max_snr)) = extent {
        let font = ("sans-serif", 14).into_font();
        bar.draw_series([
            Text::new(format!("{:.2}", max_snr), (1.1, 1.0), font.clone()),
            Text::new(format!("{:.2}", min_snr), (1.1, 0.02), font),
        ])?;
    }
    Ok(())
}
