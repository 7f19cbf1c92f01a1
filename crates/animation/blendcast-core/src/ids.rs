//! Identifiers used by the node arena.

use serde::{Deserialize, Serialize};

/// Opaque caller tag attached to a clip instance at `play` time and
/// returned unchanged by the query surface.
pub type UserData = u64;

/// Index of a slot in a player's fixed-capacity node pool.
///
/// Chain links are `Option<NodeIndex>`; `None` marks the chain tail.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u16);

impl NodeIndex {
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u16::MAX as usize, "node index {index} exceeds u16");
        Self(index as u16)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl From<NodeIndex> for usize {
    #[inline]
    fn from(idx: NodeIndex) -> Self {
        idx.get()
    }
}
