//! Output Formatting
//!
//! Human-readable rendering of a [`BenchmarkResult`]. Values are rounded only
//! for display; the stored statistics keep full precision.

use crate::result::BenchmarkResult;
use std::fmt;
use std::io::{self, Write};

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.time_unit.precision();
        let unit = self.time_unit.label();

        writeln!(f, "Benchmark: {}", self.name)?;
        writeln!(f, "  Min:      {:.p$} {unit}", self.min_time)?;
        writeln!(f, "  Mean:     {:.p$} {unit}", self.mean_time)?;
        writeln!(f, "  StdDev:   {:.p$} {unit}", self.stddev_time)?;
        writeln!(f, "  Ops/sec:  {:.p$}", self.ops_per_sec)?;
        writeln!(f)
    }
}

impl BenchmarkResult {
    /// Write the rendered result to `out`
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Write the rendered result to stdout
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)?;
        lock.flush()
    }
}
