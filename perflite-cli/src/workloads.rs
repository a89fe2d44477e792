//! Built-in Workloads
//!
//! Small, self-contained functions the CLI can benchmark without user code.

use perflite_core::{Runner, black_box};
use perflite_stats::BenchmarkResult;

/// A named unit of work runnable by the CLI
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    /// Identifier used on the command line
    pub id: &'static str,
    /// One-line description for `--list`
    pub description: &'static str,
    run: fn(&Runner) -> BenchmarkResult,
}

impl Workload {
    /// Benchmark this workload; the runner's label is replaced by the workload id
    pub fn run(&self, runner: &Runner) -> BenchmarkResult {
        let runner = runner.clone().name(self.id);
        (self.run)(&runner)
    }
}

fn noop() {
    let x = black_box(0u32);
    black_box(x.wrapping_add(1));
}

fn increment() -> u32 {
    black_box(0u32) + 1
}

fn sum_range(n: &u64) -> u64 {
    (0..*n).sum()
}

fn vec_alloc() -> Vec<u64> {
    vec![black_box(7u64); 64]
}

/// Every built-in workload, in listing order
pub const WORKLOADS: &[Workload] = &[
    Workload {
        id: "noop",
        description: "Void function doing a single increment",
        run: |r| r.run(noop),
    },
    Workload {
        id: "increment",
        description: "Function returning an incremented value",
        run: |r| r.run(increment),
    },
    Workload {
        id: "sum",
        description: "Sum of the integers 0..1000",
        run: |r| r.run_with(sum_range, 1000u64),
    },
    Workload {
        id: "vec-alloc",
        description: "Allocate and fill a 64-element vector",
        run: |r| r.run(vec_alloc),
    },
];

/// Workloads run when none are named
pub const DEFAULT_WORKLOADS: &[&str] = &["noop", "increment"];

/// Look up a workload by id
pub fn find(id: &str) -> Option<&'static Workload> {
    WORKLOADS.iter().find(|w| w.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in WORKLOADS.iter().enumerate() {
            for b in &WORKLOADS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_defaults_exist() {
        for id in DEFAULT_WORKLOADS {
            assert!(find(id).is_some(), "missing default workload {id}");
        }
        assert!(find("missing").is_none());
    }

    #[test]
    fn test_workload_result_uses_id_as_name() {
        let runner = Runner::new()
            .name("ignored")
            .target_duration(Duration::from_millis(1));
        let result = find("sum").unwrap().run(&runner);

        assert_eq!(result.name, "sum");
        assert!(result.mean_time > 0.0);
    }

    #[test]
    fn test_sum_range() {
        assert_eq!(sum_range(&1000), 499_500);
    }
}
