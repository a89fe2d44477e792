#![warn(missing_docs)]
//! # Perflite
//!
//! Micro-benchmarking you can drop into any code path without a framework.
//!
//! Perflite runs a closure through three phases:
//! - **Warmup**: a few untimed calls to settle caches and branch predictors
//! - **Calibration**: one timed batch of 1000 calls to estimate per-call cost
//! - **Measurement**: enough individually timed calls to fill the target
//!   duration, clamped to between 1,000 and 1,000,000 samples
//!
//! and reduces the samples to min, mean, sample standard deviation and
//! throughput in the unit of your choice.
//!
//! ## Quick Start
//!
//! ```
//! use perflite::prelude::*;
//! use std::time::Duration;
//!
//! let result = Runner::new()
//!     .name("collect")
//!     .unit(TimeUnit::Microseconds)
//!     .target_duration(Duration::from_millis(10))
//!     .run(|| (0..64).collect::<Vec<u32>>());
//!
//! println!("{result}");
//! ```
//!
//! ## Fallible Work
//!
//! ```
//! use perflite::Runner;
//!
//! let outcome = Runner::new().try_run(|| "42".parse::<u32>());
//! assert!(outcome.is_ok());
//! ```

// Re-export core types
pub use perflite_core::{
    CALIBRATION_ITERATIONS, MAX_MEASURED_ITERATIONS, MIN_MEASURED_ITERATIONS, Runner, Timer,
    adjusted_iterations, benchmark, benchmark_with, black_box, do_not_optimize, pin_to_cpu,
};

// Re-export stats
pub use perflite_stats::{BenchmarkResult, ParseTimeUnitError, TimeUnit, to_unit};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{BenchmarkResult, Runner, TimeUnit, benchmark, benchmark_with, black_box};
}
