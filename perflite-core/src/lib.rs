#![warn(missing_docs)]
//! Perflite Core - Benchmark Runtime
//!
//! This crate provides the execution side of perflite:
//! - `Runner` for warmup, calibration and per-invocation measurement
//! - `do_not_optimize` barrier to keep benchmarked work alive
//! - Monotonic nanosecond `Timer`
//! - Optional CPU pinning for steadier timings

mod barrier;
mod measure;
mod runner;

pub use barrier::{black_box, do_not_optimize};
pub use measure::{Timer, pin_to_cpu};
pub use runner::{
    CALIBRATION_ITERATIONS, DEFAULT_ITERATIONS, DEFAULT_NAME, DEFAULT_TARGET_DURATION,
    DEFAULT_WARMUP_ITERATIONS, MAX_MEASURED_ITERATIONS, MIN_MEASURED_ITERATIONS, Runner,
    adjusted_iterations, benchmark, benchmark_with,
};
