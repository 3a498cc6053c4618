use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HapticError {
    #[error("response curve needs finite low < high (got low={low}, high={high})")]
    InvalidCurve { low: f32, high: f32 },
    #[error("invalid haptic configuration: {0}")]
    Config(String),
}

/// Failure reported by an actuator backend.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("actuator failure: {reason}")]
pub struct ActuatorError {
    pub reason: String,
}

impl ActuatorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
