//! Choreo Motion Core
//!
//! Joint tables, the text clip codec, checkpoint bookkeeping, the
//! checkpoint-gated playback engine and a fixed-rate recorder. Hosts plug in
//! through the [`SkeletonSink`] and [`SkeletonSampler`] traits.

pub mod checkpoint;
pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod ids;
pub mod playback;
pub mod recorder;
pub mod skeleton;

pub use checkpoint::{CheckpointGate, CheckpointSet, DEFAULT_CHECKPOINTS};
pub use codec::{clip_to_samples, decode, encode, Sample};
pub use config::{PlaybackConfig, RecorderConfig};
pub use data::{Frame, JointPose, LocalTransform, MotionClip, Quat, Vec3, QUAT_IDENTITY};
pub use error::{CheckpointError, CodecError, ConfigError, PlaybackError};
pub use ids::{JointId, JointTable, HUMANOID_JOINTS, TRACKED_JOINTS};
pub use playback::{Advance, PlaybackEngine};
pub use recorder::Recorder;
pub use skeleton::{MemorySkeleton, SkeletonSampler, SkeletonSink};
