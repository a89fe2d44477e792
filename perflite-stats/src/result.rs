//! Benchmark Result
//!
//! Owns the raw samples of one benchmark run and reduces them to summary
//! statistics in the requested [`TimeUnit`]:
//! - Mean is summed in the raw nanosecond domain, then converted once
//! - Standard deviation is Bessel-corrected and computed on converted values
//! - Throughput always derives from the nanosecond mean, whatever the display unit

use crate::units::{TimeUnit, to_unit};
use serde::{Serialize, Serializer};

/// Means at or below this many nanoseconds report zero throughput
pub const OPS_EPSILON_NS: f64 = 1e-9;

/// Outcome of a single benchmark run
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    /// Display label
    pub name: String,
    /// Unit of `min_time`, `mean_time` and `stddev_time`
    pub time_unit: TimeUnit,
    /// Fastest observed invocation
    pub min_time: f64,
    /// Mean invocation time
    pub mean_time: f64,
    /// Sample standard deviation
    pub stddev_time: f64,
    /// Invocations per second, from the nanosecond mean
    pub ops_per_sec: f64,
    // Raw per-invocation intervals in nanoseconds; serialized as their count
    #[serde(rename = "samples", serialize_with = "serialize_count")]
    durations: Vec<f64>,
}

impl BenchmarkResult {
    /// Create an empty result; all statistics start at zero
    pub fn new(name: impl Into<String>, time_unit: TimeUnit) -> Self {
        Self {
            name: name.into(),
            time_unit,
            min_time: 0.0,
            mean_time: 0.0,
            stddev_time: 0.0,
            ops_per_sec: 0.0,
            durations: Vec::new(),
        }
    }

    /// Create an empty result with room for `capacity` samples
    pub fn with_capacity(name: impl Into<String>, time_unit: TimeUnit, capacity: usize) -> Self {
        let mut result = Self::new(name, time_unit);
        result.durations.reserve_exact(capacity);
        result
    }

    /// Create a result from existing nanosecond samples (statistics not yet computed)
    pub fn from_samples(name: impl Into<String>, time_unit: TimeUnit, durations: Vec<f64>) -> Self {
        Self {
            durations,
            ..Self::new(name, time_unit)
        }
    }

    /// Append one raw interval, in nanoseconds
    #[inline]
    pub fn push_sample(&mut self, nanos: f64) {
        self.durations.push(nanos);
    }

    /// Raw per-invocation intervals, in nanoseconds
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Number of raw samples held
    pub fn sample_count(&self) -> usize {
        self.durations.len()
    }

    /// Reduce the raw samples to summary statistics.
    ///
    /// With no samples every statistic stays at zero and a warning is logged.
    pub fn calculate_statistics(&mut self) {
        if self.durations.is_empty() {
            tracing::warn!(benchmark = %self.name, "No durations recorded for benchmark");
            return;
        }

        let n = self.durations.len();
        let unit = self.time_unit;

        let min_ns = self.durations.iter().copied().fold(f64::INFINITY, f64::min);
        self.min_time = to_unit(min_ns, unit);

        // Sum in nanoseconds, convert once
        let sum_ns: f64 = self.durations.iter().sum();
        self.mean_time = to_unit(sum_ns, unit) / n as f64;

        self.stddev_time = if n < 2 {
            0.0
        } else {
            let mean = self.mean_time;
            let variance = self
                .durations
                .iter()
                .map(|&d| (to_unit(d, unit) - mean).powi(2))
                .sum::<f64>()
                / (n - 1) as f64;
            variance.sqrt()
        };

        let mean_ns = sum_ns / n as f64;
        self.ops_per_sec = if mean_ns > OPS_EPSILON_NS {
            1e9 / mean_ns
        } else {
            0.0
        };
    }
}

fn serialize_count<S: Serializer>(durations: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(durations.len() as u64)
}
