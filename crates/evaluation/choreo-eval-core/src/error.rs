use thiserror::Error;

use crate::session::EvalState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// `start()` while a checkpoint is being evaluated or settling.
    #[error("evaluation session is active ({state:?}); stop it before starting again")]
    SessionActive { state: EvalState },
    #[error(transparent)]
    Checkpoint(#[from] choreo_motion::CheckpointError),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("audio cue delivery failed: {reason}")]
pub struct CueError {
    pub reason: String,
}

impl CueError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
