use crate::prelude::RecordError;
use log::{info, warn};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn skipped(&self, error: &RecordError) {
        warn!("skipping {}", error);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
