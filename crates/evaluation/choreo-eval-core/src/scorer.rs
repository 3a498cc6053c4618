//! Pose distance between a live skeleton and the current reference pose.

use log::trace;

use choreo_motion::data::distance;
use choreo_motion::{JointId, JointTable, SkeletonSink};

use crate::reference::{ReferencePose, ReferencePoseSet};

/// Mean Euclidean distance over the `tracked` joints that both the live
/// skeleton and the pose provide. An empty intersection scores `0.0`.
pub fn score<S: SkeletonSink + ?Sized>(live: &S, pose: &ReferencePose, tracked: &[JointId]) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for &joint in tracked {
        let (Some(target), Some(actual)) = (pose.get(joint), live.joint_world_position(joint))
        else {
            continue;
        };
        sum += distance(actual, target);
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// Walks an ordered reference pose set as checkpoints are cleared.
#[derive(Clone, Debug)]
pub struct SimilarityScorer {
    poses: ReferencePoseSet,
    tracked: Vec<JointId>,
    current: usize,
    last_distance: f32,
}

impl SimilarityScorer {
    pub fn new(poses: ReferencePoseSet, tracked: Vec<JointId>) -> Self {
        Self {
            poses,
            tracked,
            current: 0,
            last_distance: 0.0,
        }
    }

    /// Scorer over the table's tracked arm joints.
    pub fn for_table(poses: ReferencePoseSet, table: &JointTable) -> Self {
        Self::new(poses, table.tracked())
    }

    /// Score against the current reference pose and remember the result.
    /// With no poses loaded the distance is `0.0`.
    pub fn measure<S: SkeletonSink + ?Sized>(&mut self, live: &S) -> f32 {
        let d = match self.poses.get(self.current) {
            Some(pose) => score(live, pose, &self.tracked),
            None => 0.0,
        };
        trace!("scorer: pose {} distance {:.4}", self.current, d);
        self.last_distance = d;
        d
    }

    pub fn last_distance(&self) -> f32 {
        self.last_distance
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn pose_count(&self) -> usize {
        self.poses.len()
    }

    /// Move to the next pose; stays on the last one.
    pub fn advance_reference(&mut self) {
        if self.current + 1 < self.poses.len() {
            self.current += 1;
        }
    }

    pub fn reset_reference(&mut self) {
        self.current = 0;
    }

    pub fn tracked(&self) -> &[JointId] {
        &self.tracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreo_motion::MemorySkeleton;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn mean_over_intersection_only() {
        let a = JointId(0);
        let b = JointId(1);
        let c = JointId(2);
        let pose: ReferencePose = [(a, [0.0, 0.0, 0.0]), (b, [1.0, 0.0, 0.0])].into_iter().collect();
        let mut live = MemorySkeleton::with_joints([a, c]);
        live.set_world_position(a, [0.0, 0.3, 0.4]);
        live.set_world_position(c, [9.0, 9.0, 9.0]);
        // b is not live and c has no target
        approx(score(&live, &pose, &[a, b, c]), 0.5, 1e-6);
        assert_eq!(score(&live, &pose, &[c]), 0.0);
        assert_eq!(score(&live, &pose, &[]), 0.0);
    }

    #[test]
    fn reference_pointer_saturates() {
        let poses = ReferencePoseSet::new(vec![ReferencePose::new(), ReferencePose::new()]);
        let mut scorer = SimilarityScorer::new(poses, vec![JointId(0)]);
        scorer.advance_reference();
        scorer.advance_reference();
        scorer.advance_reference();
        assert_eq!(scorer.current_index(), 1);
        scorer.reset_reference();
        assert_eq!(scorer.current_index(), 0);
    }

    #[test]
    fn no_poses_measures_zero() {
        let mut scorer = SimilarityScorer::new(ReferencePoseSet::default(), vec![JointId(0)]);
        let live = MemorySkeleton::with_joints([JointId(0)]);
        assert_eq!(scorer.measure(&live), 0.0);
        assert_eq!(scorer.last_distance(), 0.0);
    }
}
