//! Outcome audio cues and the pass-quality draw.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::CueError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    PassGood,
    PassExcellent,
    Fail,
}

/// Host audio output.
pub trait CueSink {
    fn play_cue(&mut self, cue: AudioCue) -> Result<(), CueError>;
}

/// Collects cues in memory. Useful for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct CueLog {
    pub played: Vec<AudioCue>,
}

impl CueSink for CueLog {
    fn play_cue(&mut self, cue: AudioCue) -> Result<(), CueError> {
        self.played.push(cue);
        Ok(())
    }
}

/// Chooses the cue for a pass: one draw per pass, `PassExcellent` with the
/// configured probability.
#[derive(Clone, Debug)]
pub struct CueSelector {
    rng: Pcg32,
    excellent_probability: f32,
}

impl CueSelector {
    /// `seed: None` seeds from system entropy.
    pub fn new(excellent_probability: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_entropy(),
        };
        Self {
            rng,
            excellent_probability: excellent_probability.clamp(0.0, 1.0),
        }
    }

    pub fn draw_pass(&mut self) -> AudioCue {
        if self.rng.gen::<f32>() < self.excellent_probability {
            AudioCue::PassExcellent
        } else {
            AudioCue::PassGood
        }
    }
}
