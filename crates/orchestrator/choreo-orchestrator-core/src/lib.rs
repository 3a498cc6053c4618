//! choreo-orchestrator
//!
//! Ties the motion, evaluation and haptics crates into a single tick-driven
//! session. Hosts build a [`Conductor`] from a [`ChoreoConfig`] plus their
//! skeleton, actuator and audio collaborators, then call
//! [`Conductor::step`] once per frame.

pub mod conductor;
pub mod config;
pub mod schedule;
pub mod stage;

pub use crate::conductor::{Conductor, SessionState, StageFrame};
pub use crate::config::ChoreoConfig;
pub use crate::schedule::PreviewEvent;
pub use crate::stage::{Stage, StageState};
