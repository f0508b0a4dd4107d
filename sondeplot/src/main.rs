use anyhow::{bail, Context};
use chart::{render_sky_chart, ChartStyle};
use clap::Parser;
use generator::flight::{build_flight, FlightConfig};
use gui_bridge::bridge::{bridge_bind_address, GuiBridge};
use gui_bridge::model::SkyChartModel;
use log::info;
use sondecore::ObserverLocation;
use source::logfile::LogSource;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::export::write_observations_csv;
use workflow::runner::Runner;

mod chart;
mod generator;
mod gui_bridge;
mod source;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Generate a polar sky chart from radiosonde log files")]
struct Args {
    /// Log files to process
    logfiles: Vec<PathBuf>,
    /// Do not use data from DFM sondes
    #[arg(long, default_value_t = false)]
    nodfm: bool,
    /// Load observer and chart settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Observer latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Observer altitude in meters
    #[arg(long, allow_hyphen_values = true)]
    alt: Option<f64>,
    /// Size of the dots in the diagram
    #[arg(long)]
    dot_size: Option<u32>,
    /// Chart output path (.svg or .png)
    #[arg(short, long, default_value = "skychart.png")]
    output: PathBuf,
    /// Also write the derived table as CSV
    #[arg(long)]
    csv_out: Option<PathBuf>,
    /// Plot a synthetic flight instead of log files
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Keep the HTTP bridge alive for further batches
    #[arg(long, default_value_t = false)]
    serve: bool,
}

/// Exactly one input: log files or the synthetic flight.
fn check_inputs(args: &Args) -> anyhow::Result<()> {
    match (args.demo, args.logfiles.is_empty()) {
        (true, false) => bail!("--demo cannot be combined with log files"),
        (false, true) => bail!("no log files supplied (pass files or --demo)"),
        _ => Ok(()),
    }
}

fn resolve_config(args: &Args) -> anyhow::Result<WorkflowConfig> {
    let config = match args.config.as_ref() {
        Some(path) => WorkflowConfig::load(path)?.with_overrides(
            args.lat,
            args.lon,
            args.alt,
            args.dot_size,
            args.nodfm,
        ),
        None => {
            let fallback = ObserverLocation::default();
            let observer = ObserverLocation::new(
                args.lat.unwrap_or(fallback.latitude),
                args.lon.unwrap_or(fallback.longitude),
                args.alt.unwrap_or(fallback.altitude),
            );
            let dot_size = args.dot_size.unwrap_or(WorkflowConfig::default().dot_size);
            WorkflowConfig::from_args(observer, dot_size, args.nodfm)
        }
    };
    config
        .pipeline
        .validate()
        .context("validating observer settings")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    check_inputs(&args)?;
    let workflow_config = resolve_config(&args)?;

    let records = if args.demo {
        let flight = FlightConfig {
            observer: workflow_config.pipeline.observer,
            ..Default::default()
        };
        build_flight(&flight)?
    } else {
        let source = LogSource::new(workflow_config.skip_dfm);
        let batch = source.read_all(&args.logfiles)?;
        info!(
            "read {} records ({} malformed rows, {} files skipped)",
            batch.records.len(),
            batch.malformed,
            batch.skipped_files.len()
        );
        batch.records
    };

    let runner = Runner::new(workflow_config.clone());
    let result = runner.execute(records)?;
    println!("Sky chart -> {}", result.summary());

    let style = ChartStyle {
        title: workflow_config.chart_title.clone(),
        dot_size: workflow_config.dot_size,
        ..Default::default()
    };
    render_sky_chart(&result.observations, &style, &args.output)?;
    println!("Chart written to {}", args.output.display());

    if let Some(path) = args.csv_out.as_ref() {
        write_observations_csv(&result.observations, path)?;
    }

    if args.serve {
        let gui_bridge = GuiBridge::new(Arc::new(runner));
        gui_bridge.publish(SkyChartModel::from(&result));
        let _server = gui_bridge.serve(bridge_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sondeplot").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn demo_with_log_files_is_rejected() {
        assert!(check_inputs(&parse(&["--demo", "flight.log"])).is_err());
        assert!(check_inputs(&parse(&[])).is_err());
        assert!(check_inputs(&parse(&["--demo"])).is_ok());
        assert!(check_inputs(&parse(&["a.log", "b.log"])).is_ok());
    }

    #[test]
    fn observer_flags_build_config_without_file() {
        let args = parse(&["--lat", "-33.9", "--alt", "12", "--nodfm", "a.log"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.pipeline.observer.latitude, -33.9);
        assert_eq!(config.pipeline.observer.longitude, 8.9);
        assert_eq!(config.pipeline.observer.altitude, 12.0);
        assert_eq!(config.dot_size, 5);
        assert!(config.skip_dfm);
    }

    #[test]
    fn out_of_range_observer_flag_is_rejected() {
        assert!(resolve_config(&parse(&["--lat", "95", "a.log"])).is_err());
    }
}
