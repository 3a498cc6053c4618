//! Playback and recording configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Multiplier applied to every tick's delta time.
    pub rate: f32,
    /// Wrap to the first frame instead of completing at the end of the clip.
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            looping: false,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(ConfigError::new(
                "playback rate must be finite and non-negative",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    #[inline]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Samples per second.
    pub frame_rate: u32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self { frame_rate: 120 }
    }
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::new("recorder frame rate must be > 0"));
        }
        Ok(())
    }

    pub fn interval(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}
