//! Skeleton collaborator traits.
//!
//! Hosts (engines, rigs, capture pipelines) implement these; the core only
//! reads world positions and writes local rotations through them.

use hashbrown::HashMap;

use crate::data::{LocalTransform, Quat, Vec3, QUAT_IDENTITY};
use crate::ids::JointId;

/// Target of playback and source of live world positions.
pub trait SkeletonSink {
    fn joint_world_position(&self, joint: JointId) -> Option<Vec3>;
    fn joint_world_rotation(&self, joint: JointId) -> Option<Quat>;
    fn set_joint_local_rotation(&mut self, joint: JointId, rotation: Quat);
}

/// Source of local transforms for recording.
pub trait SkeletonSampler {
    fn joint_local_transform(&self, joint: JointId) -> Option<LocalTransform>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct JointState {
    local: LocalTransform,
    world_position: Vec3,
    world_rotation: Quat,
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            local: LocalTransform {
                rotation: QUAT_IDENTITY,
                position: [0.0; 3],
            },
            world_position: [0.0; 3],
            world_rotation: QUAT_IDENTITY,
        }
    }
}

/// Flat in-memory skeleton. World values are set explicitly; no hierarchy is evaluated.
#[derive(Clone, Debug, Default)]
pub struct MemorySkeleton {
    joints: HashMap<JointId, JointState>,
}

impl MemorySkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skeleton with every given joint present at the origin with identity rotation.
    pub fn with_joints<I: IntoIterator<Item = JointId>>(joints: I) -> Self {
        let mut s = Self::new();
        for j in joints {
            s.joints.insert(j, JointState::default());
        }
        s
    }

    pub fn set_world_position(&mut self, joint: JointId, position: Vec3) {
        self.joints.entry(joint).or_default().world_position = position;
    }

    pub fn set_world_rotation(&mut self, joint: JointId, rotation: Quat) {
        self.joints.entry(joint).or_default().world_rotation = rotation;
    }

    pub fn set_local_transform(&mut self, joint: JointId, local: LocalTransform) {
        self.joints.entry(joint).or_default().local = local;
    }

    pub fn local_rotation(&self, joint: JointId) -> Option<Quat> {
        self.joints.get(&joint).map(|s| s.local.rotation)
    }

    pub fn remove(&mut self, joint: JointId) {
        self.joints.remove(&joint);
    }

    pub fn contains(&self, joint: JointId) -> bool {
        self.joints.contains_key(&joint)
    }
}

impl SkeletonSink for MemorySkeleton {
    fn joint_world_position(&self, joint: JointId) -> Option<Vec3> {
        self.joints.get(&joint).map(|s| s.world_position)
    }

    fn joint_world_rotation(&self, joint: JointId) -> Option<Quat> {
        self.joints.get(&joint).map(|s| s.world_rotation)
    }

    fn set_joint_local_rotation(&mut self, joint: JointId, rotation: Quat) {
        // Joints the skeleton does not have are ignored.
        if let Some(state) = self.joints.get_mut(&joint) {
            state.local.rotation = rotation;
        }
    }
}

impl SkeletonSampler for MemorySkeleton {
    fn joint_local_transform(&self, joint: JointId) -> Option<LocalTransform> {
        self.joints.get(&joint).map(|s| s.local)
    }
}
