//! Combined session configuration.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use choreo_eval::EvalConfig;
use choreo_haptics::HapticConfig;
use choreo_motion::{PlaybackConfig, RecorderConfig};

/// Whole-session configuration document.
///
/// ```json
/// {
///   "playback":   { "rate": 1.0, "looping": false },
///   "recorder":   { "frame_rate": 120 },
///   "evaluation": { "enabled": true, "checkpoints": [139, 234], "seed": 7 },
///   "haptics":    { "mode": "RhythmGuidance", "feedback_interval_ms": 200 }
/// }
/// ```
///
/// Every section and field is optional and falls back to its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreoConfig {
    pub playback: PlaybackConfig,
    pub recorder: RecorderConfig,
    pub evaluation: EvalConfig,
    pub haptics: HapticConfig,
}

impl ChoreoConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text).context("failed to parse session config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.playback.validate().context("playback")?;
        self.recorder.validate().context("recorder")?;
        self.evaluation.validate().context("evaluation")?;
        self.haptics.validate().context("haptics")?;
        if self.evaluation.enabled && self.playback.looping {
            bail!("looping playback cannot be combined with evaluation");
        }
        Ok(())
    }

    /// Plain clip preview: evaluation off, looping on.
    pub fn preview() -> Self {
        let mut cfg = Self::default();
        cfg.evaluation.enabled = false;
        cfg.playback.looping = true;
        cfg
    }
}
