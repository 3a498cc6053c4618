//! Shared per-experience context, owned by the conductor.

use log::debug;
use serde::{Deserialize, Serialize};

use choreo_haptics::HapticMode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageState {
    #[default]
    Idle,
    Dance,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub state: StageState,
    pub haptic_mode: HapticMode,
    /// Most recent pose distance seen by evaluation or haptics.
    pub last_distance: f32,
}

impl Stage {
    pub fn new(haptic_mode: HapticMode) -> Self {
        Self {
            haptic_mode,
            ..Default::default()
        }
    }

    pub fn is_dancing(&self) -> bool {
        self.state == StageState::Dance
    }

    /// Returns true when the state changed.
    pub fn set_state(&mut self, state: StageState) -> bool {
        if self.state == state {
            return false;
        }
        debug!("stage: {:?} -> {:?}", self.state, state);
        self.state = state;
        true
    }
}
