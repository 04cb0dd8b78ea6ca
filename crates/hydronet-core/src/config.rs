// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Global model settings written to the manifest.
//!
//! These values are passed through to the external solver untouched; only
//! the simulation time span and the model-relative directories are checked
//! here.
use std::path::{Component, Path, PathBuf};

use hydronet_schema::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid global settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The simulation would not advance.
    #[error("endtime {end} must be after starttime {start}")]
    InvalidTimespan {
        /// Start of the simulation.
        start: Timestamp,
        /// End of the simulation.
        end: Timestamp,
    },
    /// A directory setting that points outside the model directory.
    #[error("{field} `{}` must be a relative path inside the model directory", path.display())]
    OutsideModelDir {
        /// Manifest key.
        field: &'static str,
        /// Offending path.
        path: PathBuf,
    },
}

/// Top-level manifest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Start of the simulation.
    pub starttime: Timestamp,
    /// End of the simulation.
    pub endtime: Timestamp,
    /// Table directory, relative to the manifest.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Result directory, relative to the manifest.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Allocation settings.
    #[serde(default)]
    pub allocation: Allocation,
    /// Solver settings.
    #[serde(default)]
    pub solver: Solver,
    /// Logging settings.
    #[serde(default)]
    pub logging: Logging,
    /// Result output settings.
    #[serde(default)]
    pub results: Results,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl ModelConfig {
    /// Defaults for the span `starttime..endtime`.
    pub fn new(starttime: Timestamp, endtime: Timestamp) -> Result<Self, ConfigError> {
        let config = Self {
            starttime,
            endtime,
            input_dir: default_input_dir(),
            results_dir: default_results_dir(),
            allocation: Allocation::default(),
            solver: Solver::default(),
            logging: Logging::default(),
            results: Results::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the time span is non-empty and that `input_dir` and
    /// `results_dir` stay below the model directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endtime <= self.starttime {
            return Err(ConfigError::InvalidTimespan {
                start: self.starttime,
                end: self.endtime,
            });
        }
        inside_model_dir("input_dir", &self.input_dir)?;
        inside_model_dir("results_dir", &self.results_dir)
    }
}

fn inside_model_dir(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ConfigError::OutsideModelDir {
            field,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// `[allocation]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Allocation {
    /// Allocation interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestep: Option<f64>,
    /// Whether allocation runs at all.
    pub use_allocation: bool,
    /// Objective function name.
    pub objective_type: String,
}

impl Default for Allocation {
    fn default() -> Self {
        Self {
            timestep: None,
            use_allocation: false,
            objective_type: "quadratic_relative".to_owned(),
        }
    }
}

/// `[solver]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solver {
    /// Integrator name.
    pub algorithm: String,
    /// Output interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saveat: Option<f64>,
    /// Adaptive time stepping.
    pub adaptive: bool,
    /// Fixed or initial time step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    /// Smallest time step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmin: Option<f64>,
    /// Largest time step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmax: Option<f64>,
    /// Continue at `dtmin` instead of failing.
    pub force_dtmin: bool,
    /// Absolute tolerance.
    pub abstol: f64,
    /// Relative tolerance.
    pub reltol: f64,
    /// Iteration cap.
    pub maxiters: u64,
    /// Sparse Jacobian.
    pub sparse: bool,
    /// Automatic differentiation.
    pub autodiff: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            algorithm: "QNDF".to_owned(),
            saveat: None,
            adaptive: true,
            dt: None,
            dtmin: None,
            dtmax: None,
            force_dtmin: false,
            abstol: 1e-6,
            reltol: 1e-5,
            maxiters: 1_000_000_000,
            sparse: true,
            autodiff: true,
        }
    }
}

/// Solver log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Everything.
    Debug,
    /// Progress messages.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Solver log level.
    pub verbosity: Verbosity,
    /// Print timings.
    pub timing: bool,
}

/// Result file compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Zstandard.
    #[default]
    Zstd,
    /// LZ4.
    Lz4,
}

/// `[results]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Results {
    /// File for the final state, if wanted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstate: Option<String>,
    /// Compression codec.
    pub compression: Compression,
    /// Codec level.
    pub compression_level: u8,
}

impl Default for Results {
    fn default() -> Self {
        Self {
            outstate: None,
            compression: Compression::default(),
            compression_level: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_span_is_rejected() {
        let t = Timestamp::from_ymd(2020, 1, 1).unwrap();
        assert_eq!(
            ModelConfig::new(t, t),
            Err(ConfigError::InvalidTimespan { start: t, end: t })
        );
        let end = Timestamp::from_ymd(2021, 1, 1).unwrap();
        let config = ModelConfig::new(t, end).unwrap();
        assert_eq!(config.solver.algorithm, "QNDF");
        assert_eq!(config.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn directories_must_stay_inside_the_model() {
        let mut config = ModelConfig::new(
            Timestamp::from_ymd(2020, 1, 1).unwrap(),
            Timestamp::from_ymd(2021, 1, 1).unwrap(),
        )
        .unwrap();
        config.input_dir = PathBuf::from("input/./tables");
        assert!(config.validate().is_ok());

        config.input_dir = PathBuf::from("input/../../elsewhere");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutsideModelDir { field: "input_dir", .. })
        ));
        config.input_dir = PathBuf::from(".");
        config.results_dir = PathBuf::from("/tmp/results");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutsideModelDir { field: "results_dir", .. })
        ));
    }
}
