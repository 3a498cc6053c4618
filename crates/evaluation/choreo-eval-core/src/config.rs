//! Evaluation configuration.

use serde::{Deserialize, Serialize};

use choreo_motion::{CheckpointSet, ConfigError, DEFAULT_CHECKPOINTS};

pub const TIMEOUT_S: f32 = 20.0;
pub const PASS_THRESHOLD: f32 = 0.06;
pub const SETTLE_DELAY_S: f32 = 2.0;
pub const EXCELLENT_PROBABILITY: f32 = 0.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Disabled evaluation runs the clip as a plain preview.
    pub enabled: bool,
    /// Frame indices that pause playback until the pose is matched.
    pub checkpoints: Vec<usize>,
    pub timeout_s: f32,
    /// Distances at or below this pass.
    pub pass_threshold: f32,
    pub settle_delay_s: f32,
    pub excellent_probability: f32,
    /// Fixed seed for the pass-quality draw.
    pub seed: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            checkpoints: DEFAULT_CHECKPOINTS.to_vec(),
            timeout_s: TIMEOUT_S,
            pass_threshold: PASS_THRESHOLD,
            settle_delay_s: SETTLE_DELAY_S,
            excellent_probability: EXCELLENT_PROBABILITY,
            seed: None,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.timeout_s.is_finite() || self.timeout_s <= 0.0 {
            return Err(ConfigError::new("evaluation timeout must be finite and > 0"));
        }
        if !self.pass_threshold.is_finite() || self.pass_threshold < 0.0 {
            return Err(ConfigError::new("pass threshold must be finite and >= 0"));
        }
        if !self.settle_delay_s.is_finite() || self.settle_delay_s < 0.0 {
            return Err(ConfigError::new("settle delay must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.excellent_probability) {
            return Err(ConfigError::new("excellent probability must be within [0, 1]"));
        }
        Ok(())
    }

    pub fn checkpoint_set(&self) -> CheckpointSet {
        CheckpointSet::new(self.checkpoints.iter().copied())
    }

    #[inline]
    pub fn with_checkpoints<I: IntoIterator<Item = usize>>(mut self, frames: I) -> Self {
        self.checkpoints = frames.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
