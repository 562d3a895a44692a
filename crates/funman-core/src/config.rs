use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FunmanError};
use crate::interval::BIG_NUMBER;
use crate::logging::Verbosity;
use crate::serde::{from_json_slice, from_yaml_slice, to_yaml_string};

/// Analysis settings attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunmanConfig {
    /// Normalized box width below which the search stops splitting.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Number of unrolled steps handed to the encoder.
    #[serde(default = "default_num_steps")]
    pub num_steps: usize,
    /// Time units per step.
    #[serde(default = "default_step_size")]
    pub step_size: usize,
    /// Logging threshold for the request's components.
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Gap filling used when exporting frames.
    #[serde(default)]
    pub interpolate: Interpolation,
    /// Maximum number of trajectories sampled per label.
    #[serde(default = "default_trajectory_samples")]
    pub trajectory_samples: usize,
    /// Seed for trajectory sampling.
    #[serde(default)]
    pub sample_seed: u64,
    /// Half-width of the representable domain of every searched parameter.
    #[serde(default = "default_big_number")]
    pub big_number: i64,
}

fn default_tolerance() -> f64 {
    0.1
}

fn default_num_steps() -> usize {
    2
}

fn default_step_size() -> usize {
    1
}

fn default_trajectory_samples() -> usize {
    200
}

fn default_big_number() -> i64 {
    BIG_NUMBER
}

impl Default for FunmanConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            num_steps: default_num_steps(),
            step_size: default_step_size(),
            verbosity: Verbosity::default(),
            interpolate: Interpolation::default(),
            trajectory_samples: default_trajectory_samples(),
            sample_seed: 0,
            big_number: default_big_number(),
        }
    }
}

/// Gap filling strategy for exported series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Leave unobserved slots empty.
    None,
    /// Fill interior gaps linearly and carry the last value forward.
    #[default]
    Linear,
}

impl FunmanConfig {
    /// Parses a YAML document.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, FunmanError> {
        let config: Self = from_yaml_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, FunmanError> {
        let config: Self = from_json_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the settings as a YAML document.
    pub fn to_yaml_string(&self) -> Result<String, FunmanError> {
        to_yaml_string(self)
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, FunmanError> {
        let bytes = fs::read(path).map_err(|err| {
            FunmanError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_slice(&bytes),
            _ => Self::from_yaml_slice(&bytes),
        }
    }

    /// Rejects settings the search cannot run with.
    pub fn validate(&self) -> Result<(), FunmanError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(FunmanError::Config(
                ErrorInfo::new("invalid-tolerance", "tolerance must be positive")
                    .with_context("tolerance", self.tolerance.to_string()),
            ));
        }
        if self.step_size == 0 {
            return Err(FunmanError::Config(ErrorInfo::new(
                "invalid-step-size",
                "step_size must be at least 1",
            )));
        }
        if self.big_number <= 0 {
            return Err(FunmanError::Config(
                ErrorInfo::new("invalid-big-number", "big_number must be positive")
                    .with_context("big_number", self.big_number.to_string()),
            ));
        }
        Ok(())
    }
}
