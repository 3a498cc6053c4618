//! Choreo Evaluation Core
//!
//! Reference poses, the pose-distance scorer, outcome cues and the
//! checkpoint evaluation state machine that pauses playback until the
//! performer matches the target pose or the timeout expires.

pub mod config;
pub mod cues;
pub mod error;
pub mod reference;
pub mod scorer;
pub mod session;

pub use config::{EvalConfig, EXCELLENT_PROBABILITY, PASS_THRESHOLD, SETTLE_DELAY_S, TIMEOUT_S};
pub use cues::{AudioCue, CueLog, CueSelector, CueSink};
pub use error::{CueError, EvalError};
pub use reference::{parse_reference_pose, ReferencePose, ReferencePoseSet};
pub use scorer::{score, SimilarityScorer};
pub use session::{EvalEvent, EvalState, Evaluator, Outcome};
