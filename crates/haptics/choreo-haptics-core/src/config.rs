use serde::{Deserialize, Serialize};

use crate::actuator::MotorPattern;
use crate::curve::ResponseCurve;
use crate::error::HapticError;
use crate::mode::HapticMode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticConfig {
    /// Mode selected when the session starts.
    pub mode: HapticMode,
    /// Rhythm pulse period.
    pub feedback_interval_ms: u32,
    pub pulse_pattern: MotorPattern,
    pub pulse_duration_ms: u32,
    /// Duration of each curve-driven burst, re-sent every tick.
    pub curve_duration_ms: u32,
    pub curve: ResponseCurve,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self {
            mode: HapticMode::Off,
            feedback_interval_ms: 200,
            pulse_pattern: [0, 0, 30],
            pulse_duration_ms: 100,
            curve_duration_ms: 100,
            curve: ResponseCurve::default(),
        }
    }
}

impl HapticConfig {
    pub fn validate(&self) -> Result<(), HapticError> {
        if self.feedback_interval_ms == 0 {
            return Err(HapticError::Config(
                "feedback_interval_ms must be > 0".into(),
            ));
        }
        self.curve.validate()
    }

    #[inline]
    pub fn with_mode(mut self, mode: HapticMode) -> Self {
        self.mode = mode;
        self
    }
}
