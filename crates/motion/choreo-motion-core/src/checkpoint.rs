//! Checkpoints: frame indices where gated playback must halt.

use serde::{Deserialize, Serialize};

use crate::error::CheckpointError;

/// Frame indices used by the evaluation flow unless configured otherwise.
pub const DEFAULT_CHECKPOINTS: [usize; 8] = [139, 234, 328, 458, 592, 680, 760, 890];

/// Sorted, de-duplicated set of checkpoint frame indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSet {
    frames: Vec<usize>,
}

impl CheckpointSet {
    pub fn new<I: IntoIterator<Item = usize>>(frames: I) -> Self {
        let mut frames: Vec<usize> = frames.into_iter().collect();
        frames.sort_unstable();
        frames.dedup();
        Self { frames }
    }

    /// Ensure every checkpoint addresses a frame of a clip with `frame_count` frames.
    pub fn validate(&self, frame_count: usize) -> Result<(), CheckpointError> {
        match self.frames.iter().find(|f| **f >= frame_count) {
            Some(frame) => Err(CheckpointError::OutOfRange {
                frame: *frame,
                frame_count,
            }),
            None => Ok(()),
        }
    }

    /// Ordinal of `frame` within the set.
    pub fn ordinal(&self, frame: usize) -> Option<usize> {
        self.frames.binary_search(&frame).ok()
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.ordinal(frame).is_some()
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Checkpoint set plus a consumed flag per checkpoint ordinal.
#[derive(Clone, Debug, Default)]
pub struct CheckpointGate {
    set: CheckpointSet,
    consumed: Vec<bool>,
}

impl CheckpointGate {
    pub fn new(set: CheckpointSet) -> Self {
        let consumed = vec![false; set.len()];
        Self { set, consumed }
    }

    pub fn set(&self) -> &CheckpointSet {
        &self.set
    }

    /// True when `frame` is a checkpoint that has not been consumed yet.
    pub fn is_pending(&self, frame: usize) -> bool {
        self.set
            .ordinal(frame)
            .is_some_and(|o| !self.consumed[o])
    }

    pub fn is_consumed(&self, frame: usize) -> bool {
        self.set.ordinal(frame).is_some_and(|o| self.consumed[o])
    }

    /// Mark a checkpoint consumed. Returns false if `frame` is not a checkpoint.
    pub fn consume(&mut self, frame: usize) -> bool {
        match self.set.ordinal(frame) {
            Some(o) => {
                self.consumed[o] = true;
                true
            }
            None => false,
        }
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.iter().filter(|c| **c).count()
    }

    /// Clear all consumed flags (full clip restart only).
    pub fn reset(&mut self) {
        self.consumed.iter_mut().for_each(|c| *c = false);
    }
}
