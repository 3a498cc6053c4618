//! Reference poses: target world positions per checkpoint.
//!
//! Text layout, one file per checkpoint:
//!
//! ```text
//! Bone,PosX,PosY,PosZ
//! LeftUpperArm,-0.20,1.40,0.00
//! ...
//! ```

use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use choreo_motion::{JointId, JointTable, Vec3};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePose {
    positions: HashMap<JointId, Vec3>,
}

impl ReferencePose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: JointId, position: Vec3) {
        self.positions.insert(joint, position);
    }

    pub fn get(&self, joint: JointId) -> Option<Vec3> {
        self.positions.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(JointId, Vec3)> for ReferencePose {
    fn from_iter<T: IntoIterator<Item = (JointId, Vec3)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Parse one reference pose file. The first row is a header; malformed rows
/// and unknown joints are skipped.
pub fn parse_reference_pose(text: &str, table: &JointTable) -> ReferencePose {
    let mut pose = ReferencePose::new();
    for line in text
        .split(['\r', '\n'])
        .filter(|l| !l.trim().is_empty())
        .skip(1)
    {
        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() < 4 {
            continue;
        }
        let Some(joint) = table.get(tokens[0]) else {
            debug!("reference: unknown joint '{}'", tokens[0]);
            continue;
        };
        let parsed: Option<Vec<f32>> = tokens[1..4]
            .iter()
            .map(|t| t.parse::<f32>().ok().filter(|v| v.is_finite()))
            .collect();
        if let Some(xyz) = parsed {
            pose.insert(joint, [xyz[0], xyz[1], xyz[2]]);
        }
    }
    pose
}

/// Ordered reference poses; order follows checkpoint progression.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoseSet {
    poses: Vec<ReferencePose>,
}

impl ReferencePoseSet {
    pub fn new(poses: Vec<ReferencePose>) -> Self {
        Self { poses }
    }

    pub fn from_texts<I, S>(texts: I, table: &JointTable) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            texts
                .into_iter()
                .map(|t| parse_reference_pose(t.as_ref(), table))
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> Option<&ReferencePose> {
        self.poses.get(index)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_header_and_bad_rows() {
        let table = JointTable::humanoid();
        let text = "Bone,PosX,PosY,PosZ\n\
                    LeftHand,0.1,0.2,0.3\n\
                    Tail,1,2,3\n\
                    RightHand,0.1,oops,0.3\n\
                    LeftUpperArm,1\n\
                    righthand , 1.0 , 2.0 , 3.0\n";
        let pose = parse_reference_pose(text, &table);
        assert_eq!(pose.len(), 2);
        assert_eq!(pose.get(table.get("LeftHand").unwrap()), Some([0.1, 0.2, 0.3]));
        assert_eq!(pose.get(table.get("RightHand").unwrap()), Some([1.0, 2.0, 3.0]));
    }
}
