#![warn(missing_docs)]
//! Perflite Statistics
//!
//! Result aggregation for benchmark runs:
//! - Time-unit conversion with fractional precision
//! - Min, mean, sample standard deviation and throughput
//! - Human-readable and serde-serializable results

mod format;
mod result;
mod units;

pub use result::{BenchmarkResult, OPS_EPSILON_NS};
pub use units::{ParseTimeUnitError, TimeUnit, to_unit};
