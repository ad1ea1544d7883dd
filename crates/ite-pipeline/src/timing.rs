//! Per-stage timing log
//!
//! An append-only list of (stage name, wall-clock duration) pairs. The
//! driver writes one entry after each executed stage; stages themselves
//! never see the log, so enabling it cannot change pipeline output.

use std::time::Duration;

/// One timed stage execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTiming {
    /// Stage name as reported in errors and benchmarks.
    pub stage: &'static str,
    /// Wall-clock duration of the stage.
    pub duration: Duration,
}

/// Ordered per-stage timings of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct TimingLog {
    entries: Vec<StageTiming>,
}

impl TimingLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one stage record.
    pub fn record(&mut self, stage: &'static str, duration: Duration) {
        self.entries.push(StageTiming { stage, duration });
    }

    /// Recorded entries in execution order.
    pub fn entries(&self) -> &[StageTiming] {
        &self.entries
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total wall-clock time across all recorded stages.
    pub fn total(&self) -> Duration {
        self.entries.iter().map(|e| e.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_order_and_total() {
        let mut log = TimingLog::new();
        log.record("luma", Duration::from_micros(120));
        log.record("binarize", Duration::from_micros(880));

        let stages: Vec<&str> = log.entries().iter().map(|e| e.stage).collect();
        assert_eq!(stages, vec!["luma", "binarize"]);
        assert_eq!(log.total(), Duration::from_micros(1000));

        log.clear();
        assert!(log.entries().is_empty());
    }
}
