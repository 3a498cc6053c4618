//! Actuator collaborator: two forearm channels of three motors each.

use serde::{Deserialize, Serialize};

use crate::error::ActuatorError;

/// Per-motor intensities for one channel.
pub type MotorPattern = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }
}

pub trait Actuator {
    fn play(
        &mut self,
        channel: Channel,
        pattern: MotorPattern,
        duration_ms: u32,
    ) -> Result<(), ActuatorError>;

    fn stop_all(&mut self) -> Result<(), ActuatorError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActuatorCommand {
    Play {
        channel: Channel,
        pattern: MotorPattern,
        duration_ms: u32,
    },
    StopAll,
}

/// Records every command instead of driving hardware.
#[derive(Clone, Debug, Default)]
pub struct RecordingActuator {
    pub commands: Vec<ActuatorCommand>,
}

impl RecordingActuator {
    pub fn plays_on(&self, channel: Channel) -> Vec<MotorPattern> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                ActuatorCommand::Play {
                    channel: ch,
                    pattern,
                    ..
                } if *ch == channel => Some(*pattern),
                _ => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, ActuatorCommand::StopAll))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Actuator for RecordingActuator {
    fn play(
        &mut self,
        channel: Channel,
        pattern: MotorPattern,
        duration_ms: u32,
    ) -> Result<(), ActuatorError> {
        self.commands.push(ActuatorCommand::Play {
            channel,
            pattern,
            duration_ms,
        });
        Ok(())
    }

    fn stop_all(&mut self) -> Result<(), ActuatorError> {
        self.commands.push(ActuatorCommand::StopAll);
        Ok(())
    }
}
