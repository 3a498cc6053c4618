//! Error types for clip decoding, checkpoint validation and configuration.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("motion clip source is empty or has no parsable frames")]
    Empty,
    #[error("frame timestamps must be non-decreasing (row {row})")]
    NonMonotonicTime { row: usize },
    #[error("frame timestamp must be finite (row {row})")]
    NonFiniteTime { row: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckpointError {
    #[error("checkpoint frame {frame} is out of range for a clip of {frame_count} frames")]
    OutOfRange { frame: usize, frame_count: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid configuration: {reason}")]
pub struct ConfigError {
    pub reason: String,
}

impl ConfigError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("cannot play an empty motion clip")]
    EmptyClip,
}
