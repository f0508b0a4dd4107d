use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use sondecore::{ObservationBatch, RecordError, RecordProcessor, TelemetryRecord};

pub struct WorkflowResult {
    pub observations: ObservationBatch,
    pub rejected: Vec<RecordError>,
    pub filtered: usize,
}

impl WorkflowResult {
    pub fn summary(&self) -> String {
        let extent = match self.observations.normalized_snr_extent() {
            Some((min, max)) => format!("{:.2}..{:.2} dB", min, max),
            None => "n/a".to_string(),
        };
        format!(
            "observations={} filtered={} rejected={} snr(100km)={}",
            self.observations.len(),
            self.filtered,
            self.rejected.len(),
            extent
        )
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, records: Vec<TelemetryRecord>) -> anyhow::Result<WorkflowResult> {
        let processor = RecordProcessor::new(self.config.to_pipeline_config())
            .context("configuring record processor")?;
        let batch = processor
            .process(records)
            .context("deriving sky positions")?;

        Ok(WorkflowResult {
            observations: batch.observations,
            rejected: batch.rejected,
            filtered: batch.filtered,
        })
    }
}
