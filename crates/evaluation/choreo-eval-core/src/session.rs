//! Checkpoint evaluation state machine.
//!
//! Driven once per tick by the host loop, after playback resolution:
//! 1) `observe` reacts to the playback [`Advance`] (checkpoint or completion).
//! 2) `tick` polls the scorer while paused and counts down the settle delay.
//!
//! Timers are plain accumulated seconds; nothing here sleeps or spawns.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use choreo_motion::{Advance, CheckpointGate, PlaybackEngine, SkeletonSink};

use crate::config::EvalConfig;
use crate::cues::{AudioCue, CueSelector, CueSink};
use crate::error::EvalError;
use crate::scorer::SimilarityScorer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalState {
    Stopped,
    Playing,
    PausedAwaitingPerformance,
    Settling,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvalEvent {
    CheckpointReached {
        frame: usize,
        reference: usize,
    },
    Outcome {
        frame: usize,
        outcome: Outcome,
        cue: AudioCue,
        distance: f32,
        waited_s: f32,
    },
    Resumed {
        frame: usize,
        reference: usize,
    },
    Completed,
    /// A pause or settle in flight when the session was stopped.
    Cancelled {
        frame: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Stopped,
    Playing,
    Awaiting { frame: usize, waited: f32 },
    Settling { frame: usize, waited: f32 },
    Completed,
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    cfg: EvalConfig,
    gate: CheckpointGate,
    phase: Phase,
    selector: CueSelector,
    events: Vec<EvalEvent>,
}

impl Evaluator {
    /// Build an evaluator for a clip of `frame_count` frames. Every
    /// configured checkpoint must index a frame of that clip.
    pub fn new(cfg: &EvalConfig, frame_count: usize) -> Result<Self, EvalError> {
        let set = cfg.checkpoint_set();
        set.validate(frame_count)?;
        Ok(Self {
            selector: CueSelector::new(cfg.excellent_probability, cfg.seed),
            gate: CheckpointGate::new(set),
            cfg: cfg.clone(),
            phase: Phase::Stopped,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> EvalState {
        match self.phase {
            Phase::Stopped => EvalState::Stopped,
            Phase::Playing => EvalState::Playing,
            Phase::Awaiting { .. } => EvalState::PausedAwaitingPerformance,
            Phase::Settling { .. } => EvalState::Settling,
            Phase::Completed => EvalState::Completed,
        }
    }

    /// Whether playback time should advance this tick.
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing)
    }

    pub fn gate(&self) -> &CheckpointGate {
        &self.gate
    }

    pub fn config(&self) -> &EvalConfig {
        &self.cfg
    }

    /// Checkpoint frame currently being evaluated or settled.
    pub fn active_checkpoint(&self) -> Option<usize> {
        match self.phase {
            Phase::Awaiting { frame, .. } | Phase::Settling { frame, .. } => Some(frame),
            _ => None,
        }
    }

    pub fn start(&mut self) -> Result<(), EvalError> {
        match self.phase {
            Phase::Stopped | Phase::Completed => {
                debug!("eval: start from {:?}", self.state());
                self.phase = Phase::Playing;
                Ok(())
            }
            Phase::Playing => Ok(()),
            Phase::Awaiting { .. } | Phase::Settling { .. } => Err(EvalError::SessionActive {
                state: self.state(),
            }),
        }
    }

    /// Stop immediately. An in-flight evaluation is discarded: no cue, no
    /// reference advance, and its checkpoint stays pending.
    pub fn stop(&mut self) {
        if let Phase::Awaiting { frame, .. } | Phase::Settling { frame, .. } = self.phase {
            debug!("eval: cancelled at checkpoint {frame}");
            self.events.push(EvalEvent::Cancelled { frame });
        }
        self.phase = Phase::Stopped;
    }

    /// Return to a fresh session: gate cleared and stopped.
    pub fn reset(&mut self) {
        self.gate.reset();
        self.phase = Phase::Stopped;
    }

    /// React to this tick's playback result. Only acts while playing.
    pub fn observe(
        &mut self,
        advance: &Advance,
        playback: &mut PlaybackEngine,
        scorer: &mut SimilarityScorer,
    ) {
        if !matches!(self.phase, Phase::Playing) {
            return;
        }
        if let Some(frame) = advance.checkpoint {
            info!(
                "eval: checkpoint {frame} reached, awaiting pose {}",
                scorer.current_index()
            );
            self.phase = Phase::Awaiting { frame, waited: 0.0 };
            self.events.push(EvalEvent::CheckpointReached {
                frame,
                reference: scorer.current_index(),
            });
        } else if advance.completed {
            info!("eval: clip completed");
            playback.reset();
            self.gate.reset();
            scorer.reset_reference();
            self.phase = Phase::Completed;
            self.events.push(EvalEvent::Completed);
        }
    }

    /// Advance timers by `dt` seconds. Returns the distance polled this tick,
    /// if any.
    pub fn tick<S, C>(
        &mut self,
        dt: f32,
        scorer: &mut SimilarityScorer,
        live: &S,
        cues: &mut C,
    ) -> Option<f32>
    where
        S: SkeletonSink + ?Sized,
        C: CueSink + ?Sized,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.phase {
            Phase::Awaiting { frame, waited } => {
                let distance = scorer.measure(live);
                if distance <= self.cfg.pass_threshold {
                    self.conclude(frame, Outcome::Pass, distance, waited, cues);
                } else {
                    let waited = waited + dt;
                    if waited >= self.cfg.timeout_s {
                        self.conclude(frame, Outcome::Fail, distance, waited, cues);
                    } else {
                        self.phase = Phase::Awaiting { frame, waited };
                    }
                }
                Some(distance)
            }
            Phase::Settling { frame, waited } => {
                let waited = waited + dt;
                if waited >= self.cfg.settle_delay_s {
                    scorer.advance_reference();
                    self.gate.consume(frame);
                    self.phase = Phase::Playing;
                    debug!("eval: resumed after checkpoint {frame}");
                    self.events.push(EvalEvent::Resumed {
                        frame,
                        reference: scorer.current_index(),
                    });
                } else {
                    self.phase = Phase::Settling { frame, waited };
                }
                None
            }
            Phase::Stopped | Phase::Playing | Phase::Completed => None,
        }
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<EvalEvent> {
        std::mem::take(&mut self.events)
    }

    fn conclude<C: CueSink + ?Sized>(
        &mut self,
        frame: usize,
        outcome: Outcome,
        distance: f32,
        waited: f32,
        cues: &mut C,
    ) {
        let cue = match outcome {
            Outcome::Pass => self.selector.draw_pass(),
            Outcome::Fail => AudioCue::Fail,
        };
        info!("eval: checkpoint {frame} {outcome:?} (distance {distance:.4}, {waited:.2}s)");
        if let Err(err) = cues.play_cue(cue) {
            warn!("eval: {err}");
        }
        self.events.push(EvalEvent::Outcome {
            frame,
            outcome,
            cue,
            distance,
            waited_s: waited,
        });
        self.phase = Phase::Settling { frame, waited: 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CueError;

    struct Broken;

    impl CueSink for Broken {
        fn play_cue(&mut self, _cue: AudioCue) -> Result<(), CueError> {
            Err(CueError::new("no device"))
        }
    }

    #[test]
    fn starts_stopped_and_start_is_idempotent() {
        let mut ev = Evaluator::new(&EvalConfig::default(), 1000).unwrap();
        assert_eq!(ev.state(), EvalState::Stopped);
        ev.start().unwrap();
        ev.start().unwrap();
        assert_eq!(ev.state(), EvalState::Playing);
        assert!(ev.drain_events().is_empty());
    }

    #[test]
    fn out_of_range_checkpoints_are_rejected() {
        let cfg = EvalConfig::default().with_checkpoints([5]);
        assert!(matches!(
            Evaluator::new(&cfg, 5),
            Err(EvalError::Checkpoint(_))
        ));
    }

    #[test]
    fn cue_failures_do_not_stall_the_machine() {
        use crate::reference::ReferencePoseSet;
        use choreo_motion::{JointId, MemorySkeleton};

        let cfg = EvalConfig::default().with_checkpoints([0]).with_seed(1);
        let mut ev = Evaluator::new(&cfg, 1).unwrap();
        ev.phase = Phase::Awaiting {
            frame: 0,
            waited: 0.0,
        };
        let mut scorer = SimilarityScorer::new(ReferencePoseSet::default(), vec![JointId(0)]);
        let live = MemorySkeleton::new();
        ev.tick(0.1, &mut scorer, &live, &mut Broken);
        assert_eq!(ev.state(), EvalState::Settling);
    }
}
