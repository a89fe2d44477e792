//! Runner - The Benchmark Execution Pipeline
//!
//! Runs a unit of work through three phases:
//! - Warmup: untimed invocations to settle caches and branch predictors
//! - Calibration: one timed batch to estimate the per-invocation cost
//! - Measurement: per-invocation timing, sized to fill the target duration
//!
//! Configuration errors are programmer errors and panic. Failures raised by
//! the work itself are never caught: a panic unwinds out of [`Runner::run`] and
//! an `Err` is returned verbatim from [`Runner::try_run`].

use crate::barrier::{black_box, do_not_optimize};
use crate::measure::Timer;
use perflite_stats::{BenchmarkResult, TimeUnit};
use std::convert::Infallible;
use std::time::Duration;

/// Invocations in the calibration batch, independent of configured iterations
pub const CALIBRATION_ITERATIONS: usize = 1_000;

/// Lower bound on calibrated measurement iterations
pub const MIN_MEASURED_ITERATIONS: usize = 1_000;

/// Upper bound on calibrated measurement iterations
pub const MAX_MEASURED_ITERATIONS: usize = 1_000_000;

/// Default untimed warmup invocations
pub const DEFAULT_WARMUP_ITERATIONS: usize = 10;

/// Default measured iterations (used when calibration cannot time the batch)
pub const DEFAULT_ITERATIONS: usize = 1_000;

/// Default duration the measurement phase aims to fill
pub const DEFAULT_TARGET_DURATION: Duration = Duration::from_millis(100);

/// Default benchmark label
pub const DEFAULT_NAME: &str = "Benchmark";

/// Number of measured iterations implied by a calibration batch.
///
/// `calibration_total_ns` is the elapsed time of [`CALIBRATION_ITERATIONS`]
/// invocations. The result is `target / per_invocation`, clamped to
/// [`MIN_MEASURED_ITERATIONS`]..=[`MAX_MEASURED_ITERATIONS`]. When the batch
/// did not register on the clock, `configured` is returned unchanged.
pub fn adjusted_iterations(calibration_total_ns: f64, target: Duration, configured: usize) -> usize {
    if calibration_total_ns.is_nan() || calibration_total_ns <= 0.0 {
        return configured;
    }

    let per_invocation_ns = calibration_total_ns / CALIBRATION_ITERATIONS as f64;
    if per_invocation_ns <= 0.0 {
        return configured;
    }

    let target_ns = target.as_nanos() as f64;
    // Float-to-int `as` saturates, so huge ratios land on usize::MAX before the clamp
    let adjusted = (target_ns / per_invocation_ns) as usize;
    adjusted.clamp(MIN_MEASURED_ITERATIONS, MAX_MEASURED_ITERATIONS)
}

/// Configures and executes benchmarks.
///
/// Built fluently; every setter validates its argument and panics on a
/// contract violation:
///
/// ```
/// use perflite_core::Runner;
/// use perflite_stats::TimeUnit;
///
/// let result = Runner::new()
///     .name("sum")
///     .warmup(5)
///     .unit(TimeUnit::Microseconds)
///     .run(|| (0..100u64).sum::<u64>());
/// assert!(result.sample_count() >= 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    warmup_iterations: usize,
    iterations: usize,
    target_duration: Duration,
    time_unit: TimeUnit,
    name: String,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            warmup_iterations: DEFAULT_WARMUP_ITERATIONS,
            iterations: DEFAULT_ITERATIONS,
            target_duration: DEFAULT_TARGET_DURATION,
            time_unit: TimeUnit::Nanoseconds,
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl Runner {
    /// Create a Runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of untimed warmup invocations.
    ///
    /// # Panics
    /// If `count` is zero.
    pub fn warmup(mut self, count: usize) -> Self {
        assert!(count > 0, "Warmup iterations must be greater than zero");
        self.warmup_iterations = count;
        self
    }

    /// Set the measured iteration count used when calibration fails.
    ///
    /// # Panics
    /// If `count` is zero.
    pub fn iterations(mut self, count: usize) -> Self {
        assert!(count > 0, "Benchmark iterations must be greater than zero");
        self.iterations = count;
        self
    }

    /// Set the wall-clock time the measurement phase should roughly fill.
    ///
    /// # Panics
    /// If `duration` is zero.
    pub fn target_duration(mut self, duration: Duration) -> Self {
        assert!(
            !duration.is_zero(),
            "Target duration must be greater than zero"
        );
        self.target_duration = duration;
        self
    }

    /// Set the unit statistics are reported in
    pub fn unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self
    }

    /// Set the display label
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Configured warmup invocations
    pub fn warmup_iterations(&self) -> usize {
        self.warmup_iterations
    }

    /// Configured fallback iteration count
    pub fn configured_iterations(&self) -> usize {
        self.iterations
    }

    /// Configured target duration
    pub fn configured_target_duration(&self) -> Duration {
        self.target_duration
    }

    /// Configured reporting unit
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Configured label
    pub fn label(&self) -> &str {
        &self.name
    }

    /// Benchmark `work` and return its statistics.
    ///
    /// Work returning `()` and work returning a value take the same path; the
    /// result of every invocation goes through [`do_not_optimize`] before the
    /// end timestamp. A panic in `work` unwinds through this call.
    pub fn run<T, F>(&self, mut work: F) -> BenchmarkResult
    where
        F: FnMut() -> T,
    {
        match self.execute(|| Ok::<T, Infallible>(work())) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Benchmark `work` called with a reference to `args` on every invocation
    pub fn run_with<A, T, F>(&self, mut work: F, args: A) -> BenchmarkResult
    where
        F: FnMut(&A) -> T,
    {
        self.run(|| work(black_box(&args)))
    }

    /// Benchmark fallible work.
    ///
    /// The first `Err` produced in any phase is returned as-is and the
    /// samples gathered so far are discarded. Nothing is retried.
    pub fn try_run<T, E, F>(&self, work: F) -> Result<BenchmarkResult, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.execute(work)
    }

    fn execute<T, E, F>(&self, mut step: F) -> Result<BenchmarkResult, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        // Warmup phase: untimed, but still kept alive through the barrier
        for _ in 0..self.warmup_iterations {
            do_not_optimize(step()?);
        }

        // Calibration phase: time the batch as a whole
        let timer = Timer::start();
        for _ in 0..CALIBRATION_ITERATIONS {
            do_not_optimize(step()?);
        }
        let calibration_ns = timer.stop();

        let iterations =
            adjusted_iterations(calibration_ns, self.target_duration, self.iterations);
        tracing::debug!(
            benchmark = %self.name,
            calibration_ns,
            per_invocation_ns = calibration_ns / CALIBRATION_ITERATIONS as f64,
            iterations,
            "calibrated measurement phase"
        );

        // Measurement phase: one sample per invocation
        let mut result = BenchmarkResult::with_capacity(&*self.name, self.time_unit, iterations);
        for _ in 0..iterations {
            let timer = Timer::start();
            let output = step()?;
            do_not_optimize(output);
            result.push_sample(timer.stop());
        }

        result.calculate_statistics();
        Ok(result)
    }
}

/// Benchmark `work` with a default [`Runner`]
pub fn benchmark<T, F>(work: F) -> BenchmarkResult
where
    F: FnMut() -> T,
{
    Runner::new().run(work)
}

/// Benchmark `work` applied to `args` with a default [`Runner`]
pub fn benchmark_with<A, T, F>(work: F, args: A) -> BenchmarkResult
where
    F: FnMut(&A) -> T,
{
    Runner::new().run_with(work, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick() -> Runner {
        Runner::new().target_duration(Duration::from_millis(1))
    }

    #[test]
    fn test_defaults() {
        let runner = Runner::new();
        assert_eq!(runner.warmup_iterations(), 10);
        assert_eq!(runner.configured_iterations(), 1000);
        assert_eq!(runner.configured_target_duration(), Duration::from_millis(100));
        assert_eq!(runner.time_unit(), TimeUnit::Nanoseconds);
        assert_eq!(runner.label(), "Benchmark");
    }

    #[test]
    fn test_fluent_configuration() {
        let runner = Runner::new()
            .warmup(3)
            .iterations(50)
            .target_duration(Duration::from_millis(20))
            .unit(TimeUnit::Milliseconds)
            .name("configured");

        assert_eq!(runner.warmup_iterations(), 3);
        assert_eq!(runner.configured_iterations(), 50);
        assert_eq!(runner.configured_target_duration(), Duration::from_millis(20));
        assert_eq!(runner.time_unit(), TimeUnit::Milliseconds);
        assert_eq!(runner.label(), "configured");
    }

    #[test]
    #[should_panic(expected = "Warmup iterations must be greater than zero")]
    fn test_zero_warmup_panics() {
        let _ = Runner::new().warmup(0);
    }

    #[test]
    #[should_panic(expected = "Benchmark iterations must be greater than zero")]
    fn test_zero_iterations_panics() {
        let _ = Runner::new().iterations(0);
    }

    #[test]
    #[should_panic(expected = "Target duration must be greater than zero")]
    fn test_zero_target_duration_panics() {
        let _ = Runner::new().target_duration(Duration::ZERO);
    }

    #[test]
    fn test_invalid_config_fails_before_any_invocation() {
        let calls = AtomicUsize::new(0);
        let outcome = std::panic::catch_unwind(|| {
            Runner::new().warmup(0).run(|| calls.fetch_add(1, Ordering::Relaxed))
        });

        assert!(outcome.is_err());
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_adjusted_iterations_divides_target_by_cost() {
        // 1000 invocations in 100µs -> 100ns each; 1ms target -> 10_000
        let n = adjusted_iterations(100_000.0, Duration::from_millis(1), 7);
        assert_eq!(n, 10_000);
    }

    #[test]
    fn test_adjusted_iterations_clamps() {
        // Very slow work: 1s per invocation
        assert_eq!(
            adjusted_iterations(1e12, Duration::from_millis(100), 5),
            MIN_MEASURED_ITERATIONS
        );
        // Very fast work: 1 picosecond per invocation
        assert_eq!(
            adjusted_iterations(1e-3, Duration::from_secs(3600), 5),
            MAX_MEASURED_ITERATIONS
        );
        // Cheapest representable positive batch
        assert_eq!(
            adjusted_iterations(f64::MIN_POSITIVE, Duration::from_millis(1), 5),
            MAX_MEASURED_ITERATIONS
        );
    }

    #[test]
    fn test_adjusted_iterations_always_in_bounds() {
        let targets = [1u64, 7, 100, 10_000, 86_400_000];
        let totals = [1.0, 37.0, 1e3, 1e5, 1e7, 1e9, 1e11, 1e14];
        for &ms in &targets {
            for &total in &totals {
                for configured in [1, 500, 5_000_000] {
                    let n = adjusted_iterations(total, Duration::from_millis(ms), configured);
                    assert!(
                        (MIN_MEASURED_ITERATIONS..=MAX_MEASURED_ITERATIONS).contains(&n),
                        "total={total} target={ms}ms configured={configured} -> {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_uncalibrated_falls_back_to_configured() {
        assert_eq!(adjusted_iterations(0.0, Duration::from_millis(100), 7), 7);
        assert_eq!(adjusted_iterations(-5.0, Duration::from_millis(100), 7), 7);
        assert_eq!(adjusted_iterations(f64::NAN, Duration::from_millis(100), 7), 7);
    }

    #[test]
    fn test_phases_invoke_expected_counts() {
        let calls = AtomicUsize::new(0);
        let result = quick().warmup(4).run(|| {
            calls.fetch_add(1, Ordering::Relaxed);
        });

        let measured = result.sample_count();
        assert!((MIN_MEASURED_ITERATIONS..=MAX_MEASURED_ITERATIONS).contains(&measured));
        assert_eq!(
            calls.load(Ordering::Relaxed),
            4 + CALIBRATION_ITERATIONS + measured
        );
    }

    #[test]
    fn test_run_value_returning_work() {
        let result = quick()
            .name("sum")
            .unit(TimeUnit::Microseconds)
            .run(|| (0..1000u64).sum::<u64>());

        assert_eq!(result.name, "sum");
        assert_eq!(result.time_unit, TimeUnit::Microseconds);
        assert!(result.mean_time > 0.0);
        assert!(result.min_time <= result.mean_time);
        assert!(result.ops_per_sec > 0.0);
    }

    #[test]
    fn test_noop_has_positive_mean() {
        let result = quick().run(|| {});
        assert!(!result.durations().is_empty());
        assert!(result.mean_time > 0.0);
    }

    #[test]
    fn test_run_with_passes_args() {
        let seen = AtomicUsize::new(0);
        let result = quick().run_with(
            |v: &Vec<usize>| {
                seen.store(v.len(), Ordering::Relaxed);
                v.iter().sum::<usize>()
            },
            vec![1, 2, 3],
        );

        assert_eq!(seen.load(Ordering::Relaxed), 3);
        assert!(result.sample_count() >= MIN_MEASURED_ITERATIONS);
    }

    #[derive(Debug, PartialEq)]
    struct WorkFailed(usize);

    #[test]
    fn test_try_run_propagates_first_error() {
        let calls = AtomicUsize::new(0);
        let outcome = quick().warmup(2).try_run(|| {
            let n = calls.fetch_add(1, Ordering::Relaxed);
            if n == 500 { Err(WorkFailed(n)) } else { Ok(n) }
        });

        assert_eq!(outcome.unwrap_err(), WorkFailed(500));
        assert_eq!(calls.load(Ordering::Relaxed), 501);
    }

    #[test]
    fn test_try_run_fails_in_warmup() {
        let outcome = quick().try_run(|| Err::<(), _>("warmup failure"));
        assert_eq!(outcome.unwrap_err(), "warmup failure");
    }

    #[test]
    fn test_try_run_success() {
        let result = quick().try_run(|| Ok::<_, WorkFailed>(1u8)).unwrap();
        assert!(result.sample_count() >= MIN_MEASURED_ITERATIONS);
    }

    #[test]
    #[should_panic(expected = "work exploded")]
    fn test_panic_propagates() {
        let calls = AtomicUsize::new(0);
        quick().run(|| {
            if calls.fetch_add(1, Ordering::Relaxed) == 3 {
                panic!("work exploded");
            }
        });
    }
}
