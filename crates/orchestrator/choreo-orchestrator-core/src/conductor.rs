//! Tick driver and presentation-facing session API.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{error, info};
use serde::{Deserialize, Serialize};

use choreo_eval::{CueSink, EvalState, Evaluator, ReferencePoseSet, SimilarityScorer};
use choreo_haptics::{Actuator, HapticDriver, HapticFrame, HapticMode};
use choreo_motion::{decode, JointTable, PlaybackEngine, SkeletonSink};

use crate::config::ChoreoConfig;
use crate::stage::{Stage, StageState};

/// Presentation-facing session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No playable clip is loaded.
    NotReady,
    Stopped,
    Playing,
    PausedAwaitingPerformance,
    Settling,
    Completed,
}

impl From<EvalState> for SessionState {
    fn from(state: EvalState) -> Self {
        match state {
            EvalState::Stopped => SessionState::Stopped,
            EvalState::Playing => SessionState::Playing,
            EvalState::PausedAwaitingPerformance => SessionState::PausedAwaitingPerformance,
            EvalState::Settling => SessionState::Settling,
            EvalState::Completed => SessionState::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageFrame {
    pub epoch: u64,
    pub dt: f32,
    pub frame_index: usize,
    pub elapsed: f32,
    pub state: SessionState,
    pub stage: StageState,
    /// Distance polled or measured this tick, if any.
    pub distance: Option<f32>,
    pub haptics: HapticFrame,
    /// Evaluation and playback events, in emission order.
    pub events: Vec<serde_json::Value>,
}

#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) playback: PlaybackEngine,
    /// `None` runs the clip as a plain preview.
    pub(crate) evaluator: Option<Evaluator>,
    pub(crate) preview_playing: bool,
}

/// Top-level tick driver.
///
/// Owns the stage context and the host collaborators: the skeleton (`S`),
/// the haptic actuator (`A`) and the audio cue output (`C`).
#[derive(Debug)]
pub struct Conductor<S, A, C> {
    pub stage: Stage,
    pub epoch: u64,
    pub(crate) cfg: ChoreoConfig,
    pub(crate) table: JointTable,
    pub(crate) session: Option<Session>,
    pub(crate) not_ready: String,
    pub(crate) scorer: SimilarityScorer,
    pub(crate) haptics: HapticDriver,
    pub(crate) skeleton: S,
    pub(crate) actuator: A,
    pub(crate) cues: C,
}

impl<S, A, C> Conductor<S, A, C>
where
    S: SkeletonSink,
    A: Actuator,
    C: CueSink,
{
    /// Create a conductor with no clip loaded. The configuration is validated
    /// here; a bad configuration is an error, a missing clip is not.
    pub fn new(
        cfg: ChoreoConfig,
        table: JointTable,
        skeleton: S,
        actuator: A,
        cues: C,
    ) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            stage: Stage::new(cfg.haptics.mode),
            epoch: 0,
            scorer: SimilarityScorer::for_table(ReferencePoseSet::default(), &table),
            haptics: HapticDriver::new(&cfg.haptics),
            session: None,
            not_ready: "no motion clip loaded".into(),
            cfg,
            table,
            skeleton,
            actuator,
            cues,
        })
    }

    /// Load the motion clip from its text form. On failure the conductor
    /// stays not ready and the reason is logged once.
    pub fn with_clip_text(mut self, text: &str) -> Self {
        self.load_clip_text(text);
        self
    }

    pub fn with_reference_texts<I, T>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.load_reference_texts(texts);
        self
    }

    pub fn load_clip_text(&mut self, text: &str) {
        match self.build_session(text) {
            Ok(session) => {
                info!(
                    "conductor: clip loaded ({} frames, {})",
                    session.playback.clip().len(),
                    if session.evaluator.is_some() {
                        "evaluation"
                    } else {
                        "preview"
                    }
                );
                self.session = Some(session);
                self.apply_current_frame();
            }
            Err(err) => {
                error!("conductor: clip unavailable: {err:#}");
                self.not_ready = format!("{err:#}");
                self.session = None;
            }
        }
        self.stage.set_state(StageState::Idle);
    }

    pub fn load_reference_texts<I, T>(&mut self, texts: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let poses = ReferencePoseSet::from_texts(texts, &self.table);
        info!("conductor: {} reference poses loaded", poses.len());
        self.scorer = SimilarityScorer::for_table(poses, &self.table);
    }

    fn build_session(&self, text: &str) -> Result<Session> {
        let clip = Arc::new(decode(text, &self.table)?);
        let evaluator = if self.cfg.evaluation.enabled {
            Some(Evaluator::new(&self.cfg.evaluation, clip.len())?)
        } else {
            None
        };
        Ok(Session {
            playback: PlaybackEngine::new(clip, &self.cfg.playback)?,
            evaluator,
            preview_playing: false,
        })
    }

    /// Advance by `dt` seconds and report what happened.
    pub fn step(&mut self, dt: f32) -> Result<StageFrame> {
        self.epoch = self.epoch.wrapping_add(1);
        let evaluating = match &self.session {
            None => return Ok(self.not_ready_frame(dt)),
            Some(session) => session.evaluator.is_some(),
        };
        if evaluating {
            crate::schedule::run_evaluation_pass(self, dt)
        } else {
            crate::schedule::run_preview_pass(self, dt)
        }
    }

    fn not_ready_frame(&self, dt: f32) -> StageFrame {
        StageFrame {
            epoch: self.epoch,
            dt,
            frame_index: 0,
            elapsed: 0.0,
            state: SessionState::NotReady,
            stage: self.stage.state,
            distance: None,
            haptics: HapticFrame::default(),
            events: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_playing(&self) -> bool {
        match &self.session {
            Some(Session {
                evaluator: Some(ev),
                ..
            }) => ev.is_playing(),
            Some(session) => session.preview_playing,
            None => false,
        }
    }

    pub fn current_frame_index(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |s| s.playback.current_index())
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::NotReady,
            Some(Session {
                evaluator: Some(ev),
                ..
            }) => ev.state().into(),
            Some(session) if session.preview_playing => SessionState::Playing,
            Some(_) => SessionState::Stopped,
        }
    }

    /// Start or resume playback. Fails when no clip is loaded or while a
    /// checkpoint is still being evaluated.
    pub fn start(&mut self) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| anyhow!("conductor is not ready: {}", self.not_ready))?;
        match session.evaluator.as_mut() {
            Some(ev) => ev.start()?,
            None => session.preview_playing = true,
        }
        self.stage.set_state(StageState::Dance);
        Ok(())
    }

    /// Halt playback where it is. A checkpoint being evaluated is abandoned
    /// and stays pending.
    pub fn pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            match session.evaluator.as_mut() {
                Some(ev) => ev.stop(),
                None => session.preview_playing = false,
            }
        }
        self.stage.set_state(StageState::Idle);
    }

    /// Halt and rewind to the start of the clip with every checkpoint pending.
    pub fn stop(&mut self) {
        self.pause();
        if let Some(session) = self.session.as_mut() {
            session.playback.reset();
            if let Some(ev) = session.evaluator.as_mut() {
                ev.reset();
            }
        }
        self.scorer.reset_reference();
        self.apply_current_frame();
    }

    pub fn set_haptic_mode(&mut self, mode: HapticMode) {
        self.stage.haptic_mode = mode;
    }

    pub fn haptic_mode(&self) -> HapticMode {
        self.stage.haptic_mode
    }

    pub fn config(&self) -> &ChoreoConfig {
        &self.cfg
    }

    pub fn table(&self) -> &JointTable {
        &self.table
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn skeleton(&self) -> &S {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut S {
        &mut self.skeleton
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut C {
        &mut self.cues
    }

    pub(crate) fn apply_current_frame(&mut self) {
        if let Some(session) = &self.session {
            session.playback.apply(&mut self.skeleton);
        }
    }
}
