use crate::error::{ConfigError, MlError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hyperparameters of a REINFORCE training run.
///
/// Missing JSON fields take their [`Default`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// Discount factor, in (0, 1]
    pub gamma: f32,
    pub learning_rate: f32,
    /// Seeds weight init and action sampling
    pub seed: u64,
    pub episodes: usize,
    /// Step cap per episode
    pub max_steps: usize,
    /// Log the rolling average every this many episodes
    pub report_every: usize,
    /// Number of recent episodes in the rolling average
    pub window: usize,
    /// Width of the shared hidden layer
    pub hidden: usize,
    /// Stop early once a full window averages at least this score
    pub solved_score: Option<f32>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            learning_rate: 0.02,
            seed: 0,
            episodes: 1250,
            max_steps: 1000,
            report_every: 50,
            window: 50,
            hidden: 128,
            solved_score: None,
        }
    }
}

impl TrainConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::Config`] for malformed JSON and
    /// [`MlError::InvalidConfig`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, MlError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// As [`TrainConfig::from_json_str`], plus I/O errors reading `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MlError> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_json_str(&json)
    }

    /// # Errors
    ///
    /// Returns [`MlError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), MlError> {
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(MlError::InvalidConfig(format!("gamma must be in (0, 1], got {}", self.gamma)));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(MlError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        for (name, value) in [
            ("episodes", self.episodes),
            ("max_steps", self.max_steps),
            ("report_every", self.report_every),
            ("window", self.window),
            ("hidden", self.hidden),
        ] {
            if value == 0 {
                return Err(MlError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}
