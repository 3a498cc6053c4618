//! Playback engine: time accumulation, frame resolution and the checkpoint gate.
//!
//! Time math:
//! - `elapsed += dt * rate` each call (negative deltas are ignored).
//! - The frame index only moves forward, to the last frame whose timestamp is
//!   `<= elapsed`. Without a gate this is a pure function of `(clip, elapsed)`.
//! - With a gate, sweeping stops on the first pending checkpoint it enters and
//!   `elapsed` is pinned to that frame's timestamp until the checkpoint is
//!   consumed.
//! - Past the last timestamp a looping engine wraps to frame 0; otherwise it
//!   clamps to the last frame and reports completion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointGate;
use crate::config::PlaybackConfig;
use crate::data::{Frame, MotionClip};
use crate::error::PlaybackError;
use crate::skeleton::SkeletonSink;

/// Result of one [`PlaybackEngine::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Advance {
    /// Resolved frame index after this call.
    pub index: usize,
    pub elapsed: f32,
    /// Set when the resolved index is a pending checkpoint of the gate.
    pub checkpoint: Option<usize>,
    /// Non-looping playback sits on the last frame with nothing left to gate.
    pub completed: bool,
    /// Looping playback wrapped back to the first frame.
    pub wrapped: bool,
}

#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    clip: Arc<MotionClip>,
    elapsed: f32,
    index: usize,
    rate: f32,
    looping: bool,
}

impl PlaybackEngine {
    pub fn new(clip: Arc<MotionClip>, cfg: &PlaybackConfig) -> Result<Self, PlaybackError> {
        if clip.is_empty() {
            return Err(PlaybackError::EmptyClip);
        }
        Ok(Self {
            elapsed: clip.start_time(),
            clip,
            index: 0,
            rate: cfg.rate.max(0.0),
            looping: cfg.looping,
        })
    }

    pub fn clip(&self) -> &Arc<MotionClip> {
        &self.clip
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_frame(&self) -> &Frame {
        &self.clip.frames()[self.index]
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Return to the first frame.
    pub fn reset(&mut self) {
        self.elapsed = self.clip.start_time();
        self.index = 0;
    }

    /// Jump to `time` (clamped into the clip) and resolve the frame without gating.
    pub fn seek(&mut self, time: f32) {
        let t = if time.is_finite() { time } else { 0.0 };
        self.elapsed = t.clamp(self.clip.start_time(), self.clip.end_time());
        self.index = self.clip.index_at(self.elapsed);
    }

    /// Advance simulated time by `dt` seconds (scaled by the rate).
    pub fn advance(&mut self, dt: f32, gate: Option<&CheckpointGate>) -> Advance {
        let frames = self.clip.frames();
        let last = self.clip.last_index();

        // Sitting on a pending checkpoint holds time until it is consumed.
        let mut halted = gate.is_some_and(|g| g.is_pending(self.index));
        if halted {
            self.elapsed = frames[self.index].timestamp;
        } else if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt * self.rate;
        }

        while !halted
            && self.index < last
            && frames[self.index + 1].timestamp <= self.elapsed
        {
            self.index += 1;
            if gate.is_some_and(|g| g.is_pending(self.index)) {
                self.elapsed = frames[self.index].timestamp;
                halted = true;
                break;
            }
        }

        let mut wrapped = false;
        if !halted && self.elapsed > self.clip.end_time() {
            if self.looping {
                self.elapsed = self.clip.start_time();
                self.index = 0;
                wrapped = true;
            } else {
                self.elapsed = self.clip.end_time();
                self.index = last;
            }
        }

        let checkpoint = gate
            .filter(|g| g.is_pending(self.index))
            .map(|_| self.index);
        let completed = !self.looping && self.index == last && checkpoint.is_none();

        Advance {
            index: self.index,
            elapsed: self.elapsed,
            checkpoint,
            completed,
            wrapped,
        }
    }

    /// Push the current frame's rotations to the sink. Joints absent from the
    /// frame are left as they are.
    pub fn apply<S: SkeletonSink + ?Sized>(&self, sink: &mut S) {
        for pose in &self.current_frame().joints {
            sink.set_joint_local_rotation(pose.joint, pose.rotation);
        }
    }
}
