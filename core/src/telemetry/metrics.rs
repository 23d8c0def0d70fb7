use std::sync::Mutex;

/// Per-row counters collected while transforming records.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rows_seen: usize,
    pub rows_sampled_out: usize,
    pub rows_invalid: usize,
    pub points_emitted: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_seen(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rows_seen += 1;
        }
    }

    pub fn record_sampled_out(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rows_sampled_out += 1;
        }
    }

    pub fn record_invalid(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rows_invalid += 1;
        }
    }

    pub fn record_emitted(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.points_emitted += 1;
        }
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            *metrics = MetricsSnapshot::default();
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_until_reset() {
        let metrics = MetricsRecorder::new();
        metrics.record_seen();
        metrics.record_seen();
        metrics.record_invalid();
        metrics.record_emitted();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rows_seen, 2);
        assert_eq!(snapshot.rows_invalid, 1);
        assert_eq!(snapshot.points_emitted, 1);
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
