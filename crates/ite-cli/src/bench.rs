//! Benchmark aggregation
//!
//! Collects per-stage timings across trials and prints an aggregate
//! table (avg / min / max / stddev per stage, in milliseconds).

use ite_pipeline::TimingLog;

/// Per-stage timing samples in first-appearance order.
#[derive(Debug, Default)]
pub struct BenchAggregate {
    stages: Vec<(&'static str, Vec<f64>)>,
}

impl BenchAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one trial's log into the aggregate.
    pub fn add_trial(&mut self, log: &TimingLog) {
        for entry in log.entries() {
            let millis = entry.duration.as_secs_f64() * 1e3;
            match self.stages.iter_mut().find(|(name, _)| *name == entry.stage) {
                Some((_, samples)) => samples.push(millis),
                None => self.stages.push((entry.stage, vec![millis])),
            }
        }
    }

    /// Number of stages seen so far.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render the benchmark table.
    pub fn table(&self, trials: u32) -> String {
        let rule = "-".repeat(78);
        let mut out = String::new();
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!("BENCHMARK RESULTS ({trials} trials)\n"));
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!(
            "{:<24}{:>13}{:>13}{:>13}{:>13}\n",
            "Stage", "Avg (ms)", "Min (ms)", "Max (ms)", "StdDev"
        ));
        out.push_str(&format!("{rule}\n"));

        for (stage, samples) in &self.stages {
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
            let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

            out.push_str(&format!(
                "{stage:<24}{mean:>13.3}{min:>13.3}{max:>13.3}{:>13.3}\n",
                var.sqrt()
            ));
        }
        out.push_str(&format!("{rule}\n"));
        out
    }
}
