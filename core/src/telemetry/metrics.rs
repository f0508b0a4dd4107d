use std::sync::Mutex;

/// Thread-safe run counters, updated once per completed batch.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub filtered: usize,
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_processed(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += count;
        }
    }

    pub fn record_filtered(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.filtered += count;
        }
    }

    pub fn record_rejected(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += count;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
