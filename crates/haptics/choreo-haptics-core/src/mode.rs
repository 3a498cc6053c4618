//! Haptic modes and their per-channel dispatch table.

use serde::{Deserialize, Serialize};

use crate::actuator::{Channel, MotorPattern};
use crate::curve::CurveKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HapticMode {
    #[default]
    Off,
    Baseline,
    Rhythm,
    Error,
    Guidance,
    RhythmError,
    RhythmGuidance,
}

/// How a curve intensity is spread over a channel's three motors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternLayout {
    /// `[i, i, i]`
    Uniform,
    /// `[0, i, 0]`
    Center,
}

impl PatternLayout {
    pub fn pattern(self, intensity: u8) -> MotorPattern {
        match self {
            PatternLayout::Uniform => [intensity; 3],
            PatternLayout::Center => [0, intensity, 0],
        }
    }
}

/// What drives one channel while the stage is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelDrive {
    Idle,
    /// Fixed rhythm pulse train, independent of the pose.
    Pulse,
    Curve { kind: CurveKind, layout: PatternLayout },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePlan {
    pub left: ChannelDrive,
    pub right: ChannelDrive,
}

impl ModePlan {
    const fn both(drive: ChannelDrive) -> Self {
        Self {
            left: drive,
            right: drive,
        }
    }

    pub fn drive(&self, channel: Channel) -> ChannelDrive {
        match channel {
            Channel::Left => self.left,
            Channel::Right => self.right,
        }
    }

    /// True when any channel reads the pose distance.
    pub fn needs_distance(&self) -> bool {
        matches!(self.left, ChannelDrive::Curve { .. })
            || matches!(self.right, ChannelDrive::Curve { .. })
    }
}

const ERROR_BOTH: ChannelDrive = ChannelDrive::Curve {
    kind: CurveKind::Error,
    layout: PatternLayout::Uniform,
};
const GUIDANCE_BOTH: ChannelDrive = ChannelDrive::Curve {
    kind: CurveKind::Guidance,
    layout: PatternLayout::Uniform,
};
const ERROR_RIGHT: ChannelDrive = ChannelDrive::Curve {
    kind: CurveKind::Error,
    layout: PatternLayout::Center,
};
const GUIDANCE_RIGHT: ChannelDrive = ChannelDrive::Curve {
    kind: CurveKind::Guidance,
    layout: PatternLayout::Center,
};

impl HapticMode {
    pub const ALL: [HapticMode; 7] = [
        HapticMode::Off,
        HapticMode::Baseline,
        HapticMode::Rhythm,
        HapticMode::Error,
        HapticMode::Guidance,
        HapticMode::RhythmError,
        HapticMode::RhythmGuidance,
    ];

    pub const fn plan(self) -> ModePlan {
        match self {
            HapticMode::Off | HapticMode::Baseline => ModePlan::both(ChannelDrive::Idle),
            HapticMode::Rhythm => ModePlan::both(ChannelDrive::Pulse),
            HapticMode::Error => ModePlan::both(ERROR_BOTH),
            HapticMode::Guidance => ModePlan::both(GUIDANCE_BOTH),
            HapticMode::RhythmError => ModePlan {
                left: ChannelDrive::Pulse,
                right: ERROR_RIGHT,
            },
            HapticMode::RhythmGuidance => ModePlan {
                left: ChannelDrive::Pulse,
                right: GUIDANCE_RIGHT,
            },
        }
    }

    /// Operator hotkeys `1..=6`; `0` switches feedback off.
    pub fn from_hotkey(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(HapticMode::Off),
            1 => Some(HapticMode::Baseline),
            2 => Some(HapticMode::Rhythm),
            3 => Some(HapticMode::Error),
            4 => Some(HapticMode::Guidance),
            5 => Some(HapticMode::RhythmError),
            6 => Some(HapticMode::RhythmGuidance),
            _ => None,
        }
    }
}
