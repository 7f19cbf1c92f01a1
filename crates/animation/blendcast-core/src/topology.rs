//! Blend topology handed to the pose evaluator each tick.
//!
//! Nodes become leaves in chain order. Every node with a successor adds a
//! branch whose left child is everything built so far and whose right child
//! is the successor's leaf, so the tree is left-deep and the most recently
//! queued clip sits at the top-right:
//!
//! ```text
//! chain  A -> B -> C
//! leaves [A, B, C]
//! branch 0 = (Leaf 0, Leaf 1, alpha(A))
//! branch 1 = (Branch 0, Leaf 2, alpha(B))   <- root
//! ```

use crate::ids::UserData;

/// A child reference inside a [`Branch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendChild {
    Leaf(usize),
    Branch(usize),
}

/// One clip sampled at one time.
#[derive(Debug)]
pub struct Leaf<'a, C: ?Sized> {
    pub clip: &'a C,
    pub time: f32,
    pub user_data: UserData,
}

impl<C: ?Sized> Clone for Leaf<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Leaf<'_, C> {}

/// Weighted pairing: `weight` is the share of `right`, in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub left: BlendChild,
    pub right: BlendChild,
    pub weight: f32,
}

/// Leaves and branches for one tick. Buffers are reused across ticks.
#[derive(Debug)]
pub struct BlendTopology<'a, C: ?Sized> {
    leaves: Vec<Leaf<'a, C>>,
    branches: Vec<Branch>,
    root: Option<BlendChild>,
}

impl<'a, C: ?Sized> BlendTopology<'a, C> {
    /// Reserve room for a chain of up to `nodes` clips.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            leaves: Vec::with_capacity(nodes),
            branches: Vec::with_capacity(nodes.saturating_sub(1)),
            root: None,
        }
    }

    pub fn clear(&mut self) {
        self.leaves.clear();
        self.branches.clear();
        self.root = None;
    }

    /// Rebuild from a chain walked root first. Each entry is the node's leaf
    /// and its crossfade weight toward its successor (`None` on the tail).
    pub fn build<I>(&mut self, chain: I)
    where
        I: IntoIterator<Item = (Leaf<'a, C>, Option<f32>)>,
    {
        self.clear();
        let mut pending: Option<f32> = None;
        for (leaf, alpha) in chain {
            let child = BlendChild::Leaf(self.leaves.len());
            self.leaves.push(leaf);
            self.root = Some(match (self.root, pending) {
                (None, _) => child,
                (Some(left), weight) => {
                    self.branches.push(Branch {
                        left,
                        right: child,
                        weight: weight.unwrap_or(1.0).clamp(0.0, 1.0),
                    });
                    BlendChild::Branch(self.branches.len() - 1)
                }
            });
            pending = alpha;
        }
    }

    #[inline]
    pub fn root(&self) -> Option<BlendChild> {
        self.root
    }

    /// A single leaf with full weight; evaluators can skip blending.
    #[inline]
    pub fn is_pure_leaf(&self) -> bool {
        matches!(self.root, Some(BlendChild::Leaf(_)))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub fn leaves(&self) -> &[Leaf<'a, C>] {
        &self.leaves
    }

    #[inline]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipInfo;

    fn leaf(clip: &ClipInfo, time: f32) -> Leaf<'_, ClipInfo> {
        Leaf {
            clip,
            time,
            user_data: 0,
        }
    }

    #[test]
    fn empty_chain_has_no_root() {
        let mut topo = BlendTopology::<ClipInfo>::with_capacity(2);
        topo.build(std::iter::empty());
        assert!(topo.is_empty());
        assert!(!topo.is_pure_leaf());
    }

    #[test]
    fn single_node_is_pure_leaf() {
        let a = ClipInfo::new("a", 1.0);
        let mut topo = BlendTopology::with_capacity(2);
        topo.build([(leaf(&a, 0.25), None)]);
        assert!(topo.is_pure_leaf());
        assert_eq!(topo.root(), Some(BlendChild::Leaf(0)));
        assert!(topo.branches().is_empty());
    }

    #[test]
    fn chain_builds_left_deep_tree() {
        let a = ClipInfo::new("a", 1.0);
        let mut topo = BlendTopology::with_capacity(3);
        topo.build([
            (leaf(&a, 0.0), Some(0.75)),
            (leaf(&a, 0.1), Some(0.0)),
            (leaf(&a, 0.2), None),
        ]);
        assert_eq!(topo.leaves().len(), 3);
        assert_eq!(
            topo.branches(),
            &[
                Branch {
                    left: BlendChild::Leaf(0),
                    right: BlendChild::Leaf(1),
                    weight: 0.75
                },
                Branch {
                    left: BlendChild::Branch(0),
                    right: BlendChild::Leaf(2),
                    weight: 0.0
                },
            ]
        );
        assert_eq!(topo.root(), Some(BlendChild::Branch(1)));

        // rebuild reuses buffers and forgets the old chain
        topo.build([(leaf(&a, 0.5), None)]);
        assert_eq!(topo.leaves().len(), 1);
        assert!(topo.is_pure_leaf());
    }
}
