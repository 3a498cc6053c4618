//! Per-tick passes. Each pass runs, in order:
//!   playback resolution + frame application -> evaluation observe/poll ->
//!   stage state -> haptics -> frame

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use choreo_eval::{CueSink, EvalState};
use choreo_haptics::Actuator;
use choreo_motion::SkeletonSink;

use crate::conductor::{Conductor, SessionState, StageFrame};
use crate::stage::StageState;

/// Events emitted by a preview session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewEvent {
    /// Playback wrapped back to the first frame.
    Looped,
    /// A non-looping preview reached its last frame and rewound.
    Completed,
}

/// Evaluation session: checkpoint-gated playback, scoring and cues.
pub fn run_evaluation_pass<S, A, C>(
    conductor: &mut Conductor<S, A, C>,
    dt: f32,
) -> Result<StageFrame>
where
    S: SkeletonSink,
    A: Actuator,
    C: CueSink,
{
    let mut events_out: Vec<JsonValue> = Vec::new();
    let mut polled = None;
    let mut state = SessionState::NotReady;

    if let Some(session) = conductor.session.as_mut() {
        if let Some(ev) = session.evaluator.as_mut() {
            // Playback phase
            if ev.is_playing() {
                let advance = session.playback.advance(dt, Some(ev.gate()));
                session.playback.apply(&mut conductor.skeleton);
                ev.observe(&advance, &mut session.playback, &mut conductor.scorer);
                if ev.state() == EvalState::Completed {
                    // back on the first frame
                    session.playback.apply(&mut conductor.skeleton);
                }
            }

            // Evaluation phase
            polled = ev.tick(
                dt,
                &mut conductor.scorer,
                &conductor.skeleton,
                &mut conductor.cues,
            );
            for e in ev.drain_events() {
                events_out.push(serde_json::to_value(e)?);
            }
            state = ev.state().into();
        }
    }

    // Settling and stopped sessions are idle for the haptics.
    let dancing = matches!(
        state,
        SessionState::Playing | SessionState::PausedAwaitingPerformance
    );
    Ok(finish_pass(conductor, dt, dancing, polled, state, events_out))
}

/// Plain preview: ungated playback, no scoring or cues.
pub fn run_preview_pass<S, A, C>(conductor: &mut Conductor<S, A, C>, dt: f32) -> Result<StageFrame>
where
    S: SkeletonSink,
    A: Actuator,
    C: CueSink,
{
    let mut events_out: Vec<JsonValue> = Vec::new();
    let mut dancing = false;

    if let Some(session) = conductor.session.as_mut() {
        if session.preview_playing {
            let advance = session.playback.advance(dt, None);
            session.playback.apply(&mut conductor.skeleton);
            if advance.wrapped {
                events_out.push(serde_json::to_value(PreviewEvent::Looped)?);
            }
            if advance.completed {
                session.preview_playing = false;
                session.playback.reset();
                session.playback.apply(&mut conductor.skeleton);
                events_out.push(serde_json::to_value(PreviewEvent::Completed)?);
            }
        }
        dancing = session.preview_playing;
    }

    let state = conductor.state();
    Ok(finish_pass(conductor, dt, dancing, None, state, events_out))
}

/// Stage state and haptics, shared by both passes.
fn finish_pass<S, A, C>(
    conductor: &mut Conductor<S, A, C>,
    dt: f32,
    dancing: bool,
    polled: Option<f32>,
    state: SessionState,
    events: Vec<JsonValue>,
) -> StageFrame
where
    S: SkeletonSink,
    A: Actuator,
    C: CueSink,
{
    conductor.stage.set_state(if dancing {
        StageState::Dance
    } else {
        StageState::Idle
    });

    let mode = conductor.stage.haptic_mode;
    let distance = if dancing && mode.plan().needs_distance() {
        Some(polled.unwrap_or_else(|| conductor.scorer.measure(&conductor.skeleton)))
    } else {
        polled
    };
    if let Some(d) = distance {
        conductor.stage.last_distance = d;
    }

    let haptics = conductor.haptics.tick(
        dt,
        conductor.stage.is_dancing(),
        mode,
        distance,
        &mut conductor.actuator,
    );

    let (frame_index, elapsed) = conductor
        .session
        .as_ref()
        .map_or((0, 0.0), |s| (s.playback.current_index(), s.playback.elapsed()));

    StageFrame {
        epoch: conductor.epoch,
        dt,
        frame_index,
        elapsed,
        state,
        stage: conductor.stage.state,
        distance,
        haptics,
        events,
    }
}
