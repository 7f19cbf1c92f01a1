//! Read-only accessor surface shared by both player variants.

use crate::error::PlaybackError;
use crate::ids::UserData;
use crate::pose::JointTransform;

/// Depth-indexed queries over a player's active chain (depth 0 = root).
pub trait PlaybackQuery {
    fn active_count(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    fn user_data(&self, depth: usize) -> Result<UserData, PlaybackError>;

    fn eval_time(&self, depth: usize) -> Result<f32, PlaybackError>;

    fn duration(&self, depth: usize) -> Result<f32, PlaybackError>;

    /// Crossfade progress in `[0, 1]`; only defined with exactly two active nodes.
    fn blend_alpha(&self) -> Result<f32, PlaybackError>;

    /// The context's working joint buffer, `None` before `prepare`.
    fn local_joints(&self) -> Option<&[JointTransform]>;
}
