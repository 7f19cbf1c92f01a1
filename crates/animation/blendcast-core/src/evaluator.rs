//! Pose evaluator boundary and a reference blending evaluator.

use crate::clip::AnimationClip;
use crate::error::EvaluateError;
use crate::pose::JointTransform;
use crate::topology::{BlendChild, BlendTopology};

/// Turns a blend topology into joint transforms.
///
/// Called once per non-empty tick with times from *before* that tick's
/// advance. `joints` is the player context's working buffer.
pub trait PoseEvaluator<C: ?Sized> {
    fn evaluate(
        &mut self,
        topology: &BlendTopology<'_, C>,
        joints: &mut [JointTransform],
    ) -> Result<(), EvaluateError>;
}

/// Leaves the joint buffer untouched; for callers that only need timing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEvaluator;

impl<C: ?Sized> PoseEvaluator<C> for NullEvaluator {
    fn evaluate(
        &mut self,
        _topology: &BlendTopology<'_, C>,
        _joints: &mut [JointTransform],
    ) -> Result<(), EvaluateError> {
        Ok(())
    }
}

/// Samples every leaf with [`AnimationClip::sample`] and folds branches
/// bottom-up with [`JointTransform::blend`].
///
/// Scratch poses grow to the largest topology seen and are then reused.
#[derive(Debug, Default, Clone)]
pub struct BlendEvaluator {
    leaf_poses: Vec<Vec<JointTransform>>,
    branch_poses: Vec<Vec<JointTransform>>,
}

impl BlendEvaluator {
    /// Pre-size scratch for `nodes` clips of `num_joints` joints.
    pub fn new(num_joints: usize, nodes: usize) -> Self {
        Self {
            leaf_poses: vec![vec![JointTransform::IDENTITY; num_joints]; nodes],
            branch_poses: vec![
                vec![JointTransform::IDENTITY; num_joints];
                nodes.saturating_sub(1)
            ],
        }
    }

    fn reserve(poses: &mut Vec<Vec<JointTransform>>, count: usize, num_joints: usize) {
        if poses.len() < count {
            poses.resize_with(count, Vec::new);
        }
        for pose in poses.iter_mut().take(count) {
            pose.resize(num_joints, JointTransform::IDENTITY);
        }
    }
}

fn child_pose<'p>(
    leaves: &'p [Vec<JointTransform>],
    branches: &'p [Vec<JointTransform>],
    child: BlendChild,
) -> Result<&'p [JointTransform], EvaluateError> {
    let pose = match child {
        BlendChild::Leaf(i) => leaves.get(i),
        BlendChild::Branch(i) => branches.get(i),
    };
    pose.map(Vec::as_slice)
        .ok_or_else(|| EvaluateError::new(format!("child {child:?} is not evaluated yet")))
}

impl<C: AnimationClip + ?Sized> PoseEvaluator<C> for BlendEvaluator {
    fn evaluate(
        &mut self,
        topology: &BlendTopology<'_, C>,
        joints: &mut [JointTransform],
    ) -> Result<(), EvaluateError> {
        let Some(root) = topology.root() else {
            return Ok(());
        };
        if let BlendChild::Leaf(i) = root {
            let leaf = &topology.leaves()[i];
            return leaf.clip.sample(leaf.time, joints);
        }

        let num_joints = joints.len();
        let leaves = topology.leaves();
        let branches = topology.branches();
        Self::reserve(&mut self.leaf_poses, leaves.len(), num_joints);
        Self::reserve(&mut self.branch_poses, branches.len(), num_joints);

        for (leaf, pose) in leaves.iter().zip(self.leaf_poses.iter_mut()) {
            leaf.clip.sample(leaf.time, pose)?;
        }
        // Children always precede their parent, so branch k only reads
        // branches [0, k).
        for (k, branch) in branches.iter().enumerate() {
            let (done, rest) = self.branch_poses.split_at_mut(k);
            let left = child_pose(&self.leaf_poses, done, branch.left)?;
            let right = child_pose(&self.leaf_poses, done, branch.right)?;
            for (out, (l, r)) in rest[0].iter_mut().zip(left.iter().zip(right.iter())) {
                *out = l.blend(r, branch.weight);
            }
        }

        let result = child_pose(&self.leaf_poses, &self.branch_poses, root)?;
        joints.copy_from_slice(result);
        Ok(())
    }
}
