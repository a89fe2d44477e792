#![warn(missing_docs)]
//! Perflite CLI Library
//!
//! Command-line front end that benchmarks perflite's built-in workloads.
//! Settings come from `perflite.toml` (discovered from the current directory
//! upward) with command-line flags taking precedence.

mod config;
mod workloads;

pub use config::*;
pub use workloads::{DEFAULT_WORKLOADS, WORKLOADS, Workload, find as find_workload};

use anyhow::Context;
use clap::Parser;
use perflite_core::pin_to_cpu;
use perflite_stats::{BenchmarkResult, TimeUnit};
use std::io::Write;
use std::path::PathBuf;

/// Perflite CLI arguments
#[derive(Parser, Debug)]
#[command(name = "perflite")]
#[command(author, version, about = "Perflite - lightweight micro-benchmarks")]
pub struct Cli {
    /// Workloads to run (see --list); defaults to noop and increment
    pub workloads: Vec<String>,

    /// List built-in workloads and exit
    #[arg(long)]
    pub list: bool,

    /// Reporting unit: ns, us, ms or s
    #[arg(short, long)]
    pub unit: Option<TimeUnit>,

    /// Untimed warmup invocations
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Measured iterations used when calibration cannot time the batch
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Measurement phase duration (e.g., "100ms", "1s")
    #[arg(long)]
    pub target_duration: Option<String>,

    /// Output format: human or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Configuration file (skips discovery of perflite.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pin the benchmark thread to this CPU core
    #[arg(long)]
    pub pin_cpu: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the Perflite CLI with process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Perflite CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if cli.list {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for w in WORKLOADS {
            writeln!(out, "{:<12} {}", w.id, w.description)?;
        }
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let (runner_config, format) = resolve(&cli, config);
    let runner = runner_config
        .to_runner()
        .context("Invalid benchmark configuration")?;

    let selected = select_workloads(&cli.workloads)?;

    if let Some(cpu) = cli.pin_cpu {
        match pin_to_cpu(cpu) {
            Ok(()) => tracing::debug!(cpu, "pinned benchmark thread"),
            Err(e) => tracing::warn!(cpu, error = %e, "failed to pin benchmark thread"),
        }
    }

    let mut results: Vec<BenchmarkResult> = Vec::with_capacity(selected.len());
    for workload in selected {
        tracing::info!(workload = workload.id, "running");
        results.push(workload.run(&runner));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, &results, format)?;
    out.flush()?;
    Ok(())
}

/// Install the tracing subscriber; logs go to stderr so stdout carries only results
fn init_logging(verbose: bool) {
    let filter = if verbose { "perflite=debug" } else { "perflite=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(explicit: Option<&std::path::Path>) -> anyhow::Result<PerfliteConfig> {
    match explicit {
        Some(path) => Ok(PerfliteConfig::load(path)?),
        None => Ok(PerfliteConfig::discover()?.unwrap_or_default()),
    }
}

/// Merge file configuration with command-line overrides (CLI wins)
pub fn resolve(cli: &Cli, config: PerfliteConfig) -> (RunnerConfig, OutputFormat) {
    let mut runner = config.runner;
    if let Some(unit) = cli.unit {
        runner.time_unit = unit;
    }
    if let Some(warmup) = cli.warmup {
        runner.warmup_iterations = warmup;
    }
    if let Some(iterations) = cli.iterations {
        runner.iterations = iterations;
    }
    if let Some(target) = &cli.target_duration {
        runner.target_duration = target.clone();
    }
    let format = cli.format.unwrap_or(config.output.format);
    (runner, format)
}

/// Resolve workload names, falling back to the defaults when none are given
pub fn select_workloads(names: &[String]) -> anyhow::Result<Vec<&'static Workload>> {
    if names.is_empty() {
        return Ok(DEFAULT_WORKLOADS
            .iter()
            .filter_map(|id| workloads::find(id))
            .collect());
    }
    names
        .iter()
        .map(|name| {
            workloads::find(name).ok_or_else(|| {
                anyhow::anyhow!("Unknown workload: {name} (use --list to see available workloads)")
            })
        })
        .collect()
}

/// Render results in the requested format
pub fn write_results<W: Write>(
    out: &mut W,
    results: &[BenchmarkResult],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => {
            for result in results {
                result.write_to(out)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("perflite").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&["--unit", "us", "--warmup", "3", "--target-duration", "5ms"]);
        let mut config = PerfliteConfig::default();
        config.runner.iterations = 77;
        config.output.format = OutputFormat::Json;

        let (runner, format) = resolve(&cli, config);
        assert_eq!(runner.time_unit, TimeUnit::Microseconds);
        assert_eq!(runner.warmup_iterations, 3);
        assert_eq!(runner.iterations, 77);
        assert_eq!(runner.target_duration, "5ms");
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_format_flag() {
        let cli = parse(&["--format", "json", "sum"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.workloads, vec!["sum".to_string()]);
    }

    #[test]
    fn test_bad_unit_rejected() {
        assert!(Cli::try_parse_from(["perflite", "--unit", "fortnights"]).is_err());
    }

    #[test]
    fn test_select_defaults() {
        let ids: Vec<&str> = select_workloads(&[]).unwrap().iter().map(|w| w.id).collect();
        assert_eq!(ids, DEFAULT_WORKLOADS);
    }

    #[test]
    fn test_select_unknown_workload() {
        let err = select_workloads(&["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown workload: nope"));
    }

    #[test]
    fn test_write_human_and_json() {
        let mut r = BenchmarkResult::from_samples("w", TimeUnit::Nanoseconds, vec![10.0, 30.0]);
        r.calculate_statistics();
        let results = vec![r];

        let mut human = Vec::new();
        write_results(&mut human, &results, OutputFormat::Human).unwrap();
        assert!(String::from_utf8(human).unwrap().contains("Mean:     20.00 ns"));

        let mut json = Vec::new();
        write_results(&mut json, &results, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed[0]["name"], "w");
        assert_eq!(parsed[0]["mean_time"], 20.0);
    }
}
