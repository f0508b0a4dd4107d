use anyhow::Context;
use serde::{Deserialize, Serialize};
use sondecore::{ObserverLocation, PipelineConfig};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub pipeline: PipelineConfig,
    pub dot_size: u32,
    /// Skip log files recorded from DFM sondes.
    pub skip_dfm: bool,
    pub chart_title: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            dot_size: 5,
            skip_dfm: false,
            chart_title: "Sky chart".to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .pipeline
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(observer: ObserverLocation, dot_size: u32, skip_dfm: bool) -> Self {
        Self {
            pipeline: PipelineConfig::with_observer(observer),
            dot_size,
            skip_dfm,
            ..Default::default()
        }
    }

    /// Command-line values win over whatever the config file set.
    pub fn with_overrides(
        mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        altitude: Option<f64>,
        dot_size: Option<u32>,
        skip_dfm: bool,
    ) -> Self {
        let observer = &mut self.pipeline.observer;
        if let Some(latitude) = latitude {
            observer.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            observer.longitude = longitude;
        }
        if let Some(altitude) = altitude {
            observer.altitude = altitude;
        }
        if let Some(dot_size) = dot_size {
            self.dot_size = dot_size;
        }
        self.skip_dfm |= skip_dfm;
        self
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        self.pipeline
    }
}
