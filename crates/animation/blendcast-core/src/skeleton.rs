//! Skeleton provider boundary. Only the joint count is consumed, once, when a
//! playback context is created.

use serde::{Deserialize, Serialize};

pub trait Skeleton {
    fn num_joints(&self) -> usize;
}

impl<S: Skeleton + ?Sized> Skeleton for &S {
    fn num_joints(&self) -> usize {
        (**self).num_joints()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonInfo {
    pub name: String,
    pub joint_count: usize,
}

impl SkeletonInfo {
    pub fn new(name: impl Into<String>, joint_count: usize) -> Self {
        Self {
            name: name.into(),
            joint_count,
        }
    }
}

impl Skeleton for SkeletonInfo {
    fn num_joints(&self) -> usize {
        self.joint_count
    }
}
