//! Configuration loading from perflite.toml
//!
//! Perflite configuration can be specified in a `perflite.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use perflite_core::{DEFAULT_ITERATIONS, DEFAULT_WARMUP_ITERATIONS, Runner};
use perflite_stats::TimeUnit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "perflite.toml";

/// Errors from loading or applying configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// File that was being parsed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// Duration string has no parsable non-negative number
    #[error("Invalid duration {0:?}")]
    InvalidDuration(String),

    /// Duration suffix is not one of ns, us, ms, s, m
    #[error("Unknown duration unit: {0}")]
    UnknownDurationUnit(String),

    /// A count or duration was zero
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Offending setting
        field: &'static str,
    },

    /// Output format is neither human nor json
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Perflite configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PerfliteConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Untimed invocations before calibration
    #[serde(default = "default_warmup_iterations")]
    pub warmup_iterations: usize,
    /// Measured iterations used when calibration cannot time the batch
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Measurement duration to aim for (e.g., "100ms", "1s")
    #[serde(default = "default_target_duration")]
    pub target_duration: String,
    /// Reporting unit
    #[serde(default)]
    pub time_unit: TimeUnit,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: default_warmup_iterations(),
            iterations: default_iterations(),
            target_duration: default_target_duration(),
            time_unit: TimeUnit::default(),
        }
    }
}

fn default_warmup_iterations() -> usize {
    DEFAULT_WARMUP_ITERATIONS
}
fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}
fn default_target_duration() -> String {
    "100ms".to_string()
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON array of results
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default)]
    pub format: OutputFormat,
}

impl RunnerConfig {
    /// Validate values and build a [`Runner`].
    ///
    /// Values here come from users, so bad input is an error rather than the
    /// panic the builder raises for programmer mistakes.
    pub fn to_runner(&self) -> Result<Runner, ConfigError> {
        if self.warmup_iterations == 0 {
            return Err(ConfigError::NotPositive {
                field: "warmup_iterations",
            });
        }
        if self.iterations == 0 {
            return Err(ConfigError::NotPositive {
                field: "iterations",
            });
        }
        let target = parse_duration(&self.target_duration)?;
        if target.is_zero() {
            return Err(ConfigError::NotPositive {
                field: "target_duration",
            });
        }

        Ok(Runner::new()
            .warmup(self.warmup_iterations)
            .iterations(self.iterations)
            .target_duration(target)
            .unit(self.time_unit))
    }
}

impl PerfliteConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find `perflite.toml` in `start` or any of its ancestors
    pub fn find_from(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Try to discover and load configuration by walking up from current directory.
    ///
    /// Returns `Ok(None)` when no file exists; a file that fails to load is an error.
    pub fn discover() -> Result<Option<Self>, ConfigError> {
        let Ok(cwd) = std::env::current_dir() else {
            return Ok(None);
        };
        match Self::find_from(cwd) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Perflite Configuration

[runner]
# Untimed invocations before calibration
warmup_iterations = 10
# Measured iterations, used only when calibration cannot time the batch
iterations = 1000
# Measurement phase duration to aim for
target_duration = "100ms"
# Reporting unit: ns, us, ms or s
time_unit = "ns"

[output]
# Output format: human or json
format = "human"
"#
        .to_string()
    }
}

/// Parse duration string (e.g., "3s", "500ms", "2m") into a [`Duration`]
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidDuration(s.to_string()));
    }

    // Find where the number ends and unit begins
    let (num_part, unit_part) = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| s.split_at(i))
        .unwrap_or((s, "ms"));

    let value: f64 = num_part
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDuration(s.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidDuration(s.to_string()));
    }

    let multiplier: f64 = match unit_part.trim().to_lowercase().as_str() {
        "ns" => 1.0,
        "us" | "µs" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" | "min" => 60e9,
        other => return Err(ConfigError::UnknownDurationUnit(other.to_string())),
    };

    Ok(Duration::from_nanos((value * multiplier) as u64))
}
