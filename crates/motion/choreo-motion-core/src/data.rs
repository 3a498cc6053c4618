//! Motion clip data model.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::ids::JointId;

/// Rotation quaternion in `[x, y, z, w]` order.
pub type Quat = [f32; 4];

/// 3D position.
pub type Vec3 = [f32; 3];

pub const QUAT_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

#[inline]
pub fn quat_norm(q: Quat) -> f32 {
    (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt()
}

#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Local transform of one joint, as sampled from a skeleton.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    pub rotation: Quat,
    pub position: Vec3,
}

/// One joint's contribution to a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointPose {
    pub joint: JointId,
    /// Local rotation relative to the parent joint.
    pub rotation: Quat,
    /// Local position, only present when the source clip carried position columns.
    #[serde(default)]
    pub position: Option<Vec3>,
}

/// One timestamped sample of joint orientations. Joints are kept sorted by id;
/// a joint missing here leaves the target skeleton untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub number: Option<u32>,
    /// Seconds.
    pub timestamp: f32,
    pub joints: Vec<JointPose>,
}

impl Frame {
    pub fn new(timestamp: f32) -> Self {
        Self {
            number: None,
            timestamp,
            joints: Vec::new(),
        }
    }

    /// Insert or replace a joint pose, keeping joints ordered by id.
    pub fn set(&mut self, pose: JointPose) {
        match self.joints.binary_search_by_key(&pose.joint, |p| p.joint) {
            Ok(i) => self.joints[i] = pose,
            Err(i) => self.joints.insert(i, pose),
        }
    }

    pub fn get(&self, joint: JointId) -> Option<&JointPose> {
        self.joints
            .binary_search_by_key(&joint, |p| p.joint)
            .ok()
            .map(|i| &self.joints[i])
    }
}

/// Immutable ordered frame sequence with non-decreasing timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionClip {
    frames: Vec<Frame>,
}

impl MotionClip {
    /// Build a clip, rejecting empty input and decreasing timestamps.
    pub fn new(frames: Vec<Frame>) -> Result<Self, CodecError> {
        if frames.is_empty() {
            return Err(CodecError::Empty);
        }
        let mut last = -f32::INFINITY;
        for (row, f) in frames.iter().enumerate() {
            if !f.timestamp.is_finite() {
                return Err(CodecError::NonFiniteTime { row });
            }
            if f.timestamp < last {
                return Err(CodecError::NonMonotonicTime { row });
            }
            last = f.timestamp;
        }
        Ok(Self { frames })
    }

    /// Wrap frames the caller has already validated.
    pub(crate) fn from_validated(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn start_time(&self) -> f32 {
        self.frames.first().map(|f| f.timestamp).unwrap_or(0.0)
    }

    pub fn end_time(&self) -> f32 {
        self.frames.last().map(|f| f.timestamp).unwrap_or(0.0)
    }

    pub fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Index of the last frame whose timestamp is `<= time` (0 before the first frame).
    pub fn index_at(&self, time: f32) -> usize {
        let upper = self.frames.partition_point(|f| f.timestamp <= time);
        upper.saturating_sub(1)
    }
}
