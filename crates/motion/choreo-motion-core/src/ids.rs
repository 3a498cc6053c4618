//! Joint handles and the name table that maps skeleton joint names onto them.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Opaque handle for one joint of a skeleton. Dense, allocated by [`JointTable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct JointId(pub u16);

impl JointId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Canonical humanoid joint names in recording order.
pub const HUMANOID_JOINTS: [&str; 49] = [
    "Hips",
    "Spine",
    "Chest",
    "Neck",
    "Head",
    "LeftShoulder",
    "LeftUpperArm",
    "LeftLowerArm",
    "LeftHand",
    "LeftThumbProximal",
    "LeftThumbIntermediate",
    "LeftThumbDistal",
    "LeftIndexProximal",
    "LeftIndexIntermediate",
    "LeftIndexDistal",
    "LeftMiddleProximal",
    "LeftMiddleIntermediate",
    "LeftMiddleDistal",
    "LeftRingProximal",
    "LeftRingIntermediate",
    "LeftRingDistal",
    "LeftLittleProximal",
    "LeftLittleIntermediate",
    "LeftLittleDistal",
    "RightShoulder",
    "RightUpperArm",
    "RightLowerArm",
    "RightHand",
    "RightThumbProximal",
    "RightThumbIntermediate",
    "RightThumbDistal",
    "RightIndexProximal",
    "RightIndexIntermediate",
    "RightIndexDistal",
    "RightMiddleProximal",
    "RightMiddleIntermediate",
    "RightMiddleDistal",
    "RightRingProximal",
    "RightRingIntermediate",
    "RightRingDistal",
    "RightLittleProximal",
    "RightLittleIntermediate",
    "RightLittleDistal",
    "LeftUpperLeg",
    "LeftLowerLeg",
    "LeftFoot",
    "RightUpperLeg",
    "RightLowerLeg",
    "RightFoot",
];

/// Joints compared against reference poses.
pub const TRACKED_JOINTS: [&str; 6] = [
    "LeftUpperArm",
    "LeftLowerArm",
    "LeftHand",
    "RightUpperArm",
    "RightLowerArm",
    "RightHand",
];

/// Name <-> handle mapping, built once from a skeleton.
///
/// Handles are allocated monotonically in insertion order, so iterating
/// [`JointTable::iter`] yields joints in the order the table was built.
/// Lookups by name ignore ASCII case.
#[derive(Clone, Debug, Default)]
pub struct JointTable {
    names: Vec<String>,
    by_name: HashMap<String, JointId>,
}

impl JointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table over the canonical humanoid joint set.
    pub fn humanoid() -> Self {
        Self::from_names(HUMANOID_JOINTS)
    }

    /// Build a table from joint names. Duplicate names (ignoring case) keep the first handle.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for name in names {
            table.insert(name.as_ref());
        }
        table
    }

    /// Insert a joint name, returning its handle (existing handle if already present).
    pub fn insert(&mut self, name: &str) -> JointId {
        let key = name.to_ascii_lowercase();
        if let Some(id) = self.by_name.get(&key) {
            return *id;
        }
        let id = JointId(self.names.len() as u16);
        self.names.push(name.to_string());
        self.by_name.insert(key, id);
        id
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<JointId> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn name(&self, id: JointId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(handle, name)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (JointId(i as u16), n.as_str()))
    }

    /// Handles of the tracked arm joints present in this table, in tracking order.
    pub fn tracked(&self) -> Vec<JointId> {
        TRACKED_JOINTS.iter().filter_map(|n| self.get(n)).collect()
    }
}
