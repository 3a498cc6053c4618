//! Choreo Haptics Core
//!
//! Maps pose distance to actuator intensity through two quadratic response
//! curves and drives a two-channel actuator according to the selected
//! [`HapticMode`].

pub mod actuator;
pub mod config;
pub mod curve;
pub mod driver;
pub mod error;
pub mod mode;
pub mod rhythm;

pub use actuator::{Actuator, ActuatorCommand, Channel, MotorPattern, RecordingActuator};
pub use config::HapticConfig;
pub use curve::{
    error_intensity, guidance_intensity, CurveKind, ResponseCurve, HIGH, LOW, MAX_INTENSITY,
};
pub use driver::{HapticDriver, HapticFrame};
pub use error::{ActuatorError, HapticError};
pub use mode::{ChannelDrive, HapticMode, ModePlan, PatternLayout};
pub use rhythm::PulseTrain;
