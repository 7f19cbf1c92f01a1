//! Per-player scratch memory: the working joint buffer the evaluator writes,
//! and optionally a snapshot of the previous frame's buffer.

use crate::pose::JointTransform;
use crate::skeleton::Skeleton;

#[derive(Debug, Clone)]
pub struct PlaybackContext {
    joints: Vec<JointTransform>,
    previous: Option<Vec<JointTransform>>,
}

impl PlaybackContext {
    /// Allocate buffers sized to `skeleton`, initialized to the identity pose.
    pub fn new<S: Skeleton + ?Sized>(skeleton: &S, keep_previous: bool) -> Self {
        let count = skeleton.num_joints();
        Self {
            joints: vec![JointTransform::IDENTITY; count],
            previous: keep_previous.then(|| vec![JointTransform::IDENTITY; count]),
        }
    }

    #[inline]
    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn joints(&self) -> &[JointTransform] {
        &self.joints
    }

    #[inline]
    pub fn joints_mut(&mut self) -> &mut [JointTransform] {
        &mut self.joints
    }

    #[inline]
    pub fn previous_joints(&self) -> Option<&[JointTransform]> {
        self.previous.as_deref()
    }

    /// Copy the working buffer into the previous-frame buffer, if kept.
    pub fn snapshot_previous(&mut self) {
        if let Some(prev) = self.previous.as_mut() {
            prev.copy_from_slice(&self.joints);
        }
    }
}
