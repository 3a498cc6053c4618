//! Per-tick haptic output for the selected mode.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::actuator::{Actuator, Channel, MotorPattern};
use crate::config::HapticConfig;
use crate::mode::{ChannelDrive, HapticMode};
use crate::rhythm::PulseTrain;

/// Patterns sent this tick, per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticFrame {
    pub left: Option<MotorPattern>,
    pub right: Option<MotorPattern>,
}

impl HapticFrame {
    fn set(&mut self, channel: Channel, pattern: MotorPattern) {
        match channel {
            Channel::Left => self.left = Some(pattern),
            Channel::Right => self.right = Some(pattern),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct HapticDriver {
    cfg: HapticConfig,
    pulses: [PulseTrain; 2],
    mode: HapticMode,
    active: bool,
}

impl HapticDriver {
    pub fn new(cfg: &HapticConfig) -> Self {
        Self {
            pulses: [
                PulseTrain::from_millis(cfg.feedback_interval_ms),
                PulseTrain::from_millis(cfg.feedback_interval_ms),
            ],
            mode: cfg.mode,
            active: false,
            cfg: cfg.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> HapticMode {
        self.mode
    }

    /// Run one tick.
    ///
    /// `active` is whether the stage is dancing. `distance` is the current
    /// pose distance; it is only read by curve-driven channels and may be
    /// `None` when the mode has none.
    pub fn tick<A: Actuator + ?Sized>(
        &mut self,
        dt: f32,
        active: bool,
        mode: HapticMode,
        distance: Option<f32>,
        actuator: &mut A,
    ) -> HapticFrame {
        let mut frame = HapticFrame::default();

        if !active {
            if self.active {
                debug!("haptics: stage inactive, stopping all actuators");
                self.pulses.iter_mut().for_each(PulseTrain::stop);
                if let Err(err) = actuator.stop_all() {
                    warn!("haptics: {err}");
                }
                self.active = false;
            }
            self.mode = mode;
            return frame;
        }
        self.active = true;

        if mode != self.mode {
            debug!("haptics: mode {:?} -> {:?}", self.mode, mode);
            self.pulses.iter_mut().for_each(PulseTrain::stop);
            self.mode = mode;
        }

        let plan = mode.plan();
        for channel in Channel::ALL {
            let pulse = &mut self.pulses[channel.index()];
            let (pattern, duration_ms) = match plan.drive(channel) {
                ChannelDrive::Idle => {
                    pulse.stop();
                    continue;
                }
                ChannelDrive::Pulse => {
                    if !pulse.tick(dt) {
                        continue;
                    }
                    (self.cfg.pulse_pattern, self.cfg.pulse_duration_ms)
                }
                ChannelDrive::Curve { kind, layout } => {
                    pulse.stop();
                    let Some(d) = distance else {
                        continue;
                    };
                    let intensity = self.cfg.curve.eval(kind, d);
                    if intensity == 0 {
                        continue;
                    }
                    (layout.pattern(intensity), self.cfg.curve_duration_ms)
                }
            };
            if let Err(err) = actuator.play(channel, pattern, duration_ms) {
                warn!("haptics: {channel:?}: {err}");
                continue;
            }
            frame.set(channel, pattern);
        }
        frame
    }
}
