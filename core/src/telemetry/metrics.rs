use serde::Serialize;
use std::sync::Mutex;

/// Aggregate session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub sweeps_completed: usize,
    pub points_spawned: usize,
    pub points_expired: usize,
    pub transitions_completed: usize,
    pub toggles_rejected: usize,
}

/// Thread-safe counters for one console session.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_sweep(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.sweeps_completed += 1;
        }
    }

    pub fn record_point_spawned(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.points_spawned += 1;
        }
    }

    pub fn record_points_expired(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.points_expired += count;
        }
    }

    pub fn record_transition(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.transitions_completed += 1;
        }
    }

    pub fn record_rejected_toggle(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.toggles_rejected += 1;
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
    fn counters_accumulate_independently() {
        let metrics = MetricsRecorder::new();
        metrics.record_sweep();
        metrics.record_point_spawned();
        metrics.record_point_spawned();
        metrics.record_points_expired(2);
        metrics.record_transition();
        metrics.record_rejected_toggle();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.sweeps_completed, 1);
        assert_eq!(snapshot.points_spawned, 2);
        assert_eq!(snapshot.points_expired, 2);
        assert_eq!(snapshot.transitions_completed, 1);
        assert_eq!(snapshot.toggles_rejected, 1);
    }
}
