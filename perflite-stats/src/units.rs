//! Time Units
//!
//! Conversion of raw nanosecond intervals into the unit a result is reported in.
//! Samples are kept as fractional nanoseconds, so converting to a coarser unit
//! never truncates (1500 ns is 1.5 µs, not 1 µs).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Unit used when reporting timing statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// 1e-9 s
    #[default]
    #[serde(alias = "ns")]
    Nanoseconds,
    /// 1e-6 s
    #[serde(alias = "us", alias = "µs")]
    Microseconds,
    /// 1e-3 s
    #[serde(alias = "ms")]
    Milliseconds,
    /// Seconds
    #[serde(alias = "s")]
    Seconds,
}

impl TimeUnit {
    /// All units, finest first
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
    ];

    /// Number of nanoseconds in one of this unit
    pub const fn nanos_per_unit(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1.0,
            TimeUnit::Microseconds => 1_000.0,
            TimeUnit::Milliseconds => 1_000_000.0,
            TimeUnit::Seconds => 1_000_000_000.0,
        }
    }

    /// Short label used in rendered output
    pub const fn label(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "µs",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }

    /// Decimal places used when rendering values in this unit.
    ///
    /// Coarser units get more places so sub-unit detail stays visible.
    pub const fn precision(self) -> usize {
        match self {
            TimeUnit::Nanoseconds => 2,
            TimeUnit::Microseconds => 3,
            TimeUnit::Milliseconds => 4,
            TimeUnit::Seconds => 6,
        }
    }

    /// Convert a [`Duration`] into this unit
    pub fn convert(self, duration: Duration) -> f64 {
        to_unit(duration.as_nanos() as f64, self)
    }
}

/// Express an interval of `nanos` nanoseconds in `unit`.
///
/// The input is fractional so sub-nanosecond remainders (e.g. a sum divided by
/// a count) survive the conversion.
#[inline]
pub fn to_unit(nanos: f64, unit: TimeUnit) -> f64 {
    nanos / unit.nanos_per_unit()
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string does not name a time unit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown time unit: {0:?} (expected ns, us, ms or s)")]
pub struct ParseTimeUnitError(pub String);

impl FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ns" | "nanos" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "µs" | "micros" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "secs" | "seconds" => Ok(TimeUnit::Seconds),
            _ => Err(ParseTimeUnitError(s.to_string())),
        }
    }
}
