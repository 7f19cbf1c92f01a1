//! Fixed-capacity node arena holding the play-order chain of clip instances.
//!
//! Slots are addressed by [`NodeIndex`]; a node's `next` link names its
//! successor and `None` marks the tail. The pool keeps the chain's root and
//! tail indices and never allocates after construction.

use crate::clip::AnimationClip;
use crate::ids::{NodeIndex, UserData};
use crate::time::blend_alpha;

/// One slot of the pool. A slot with `clip == None` is free.
#[derive(Debug)]
pub struct PlaybackNode<'a, C: ?Sized> {
    pub clip: Option<&'a C>,
    /// Playback time in seconds, always in `[0, clip.duration())`.
    pub eval_time: f32,
    pub user_data: UserData,
    pub next: Option<NodeIndex>,
    /// Crossfade progress toward `next`. Meaningless on the tail.
    pub blend_time: f32,
    pub blend_duration: f32,
}

impl<C: ?Sized> Clone for PlaybackNode<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for PlaybackNode<'_, C> {}

impl<'a, C: AnimationClip + ?Sized> PlaybackNode<'a, C> {
    pub fn empty() -> Self {
        Self {
            clip: None,
            eval_time: 0.0,
            user_data: 0,
            next: None,
            blend_time: 0.0,
            blend_duration: 0.0,
        }
    }

    /// A fresh, unlinked node with no blend state.
    pub fn leaf(clip: &'a C, eval_time: f32, user_data: UserData) -> Self {
        Self {
            clip: Some(clip),
            eval_time,
            user_data,
            ..Self::empty()
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.clip.is_none()
    }

    /// Clip of a node that is part of the chain.
    ///
    /// # Panics
    /// If the slot is free; a free slot reachable from the chain is a
    /// bookkeeping bug.
    #[inline]
    pub fn active_clip(&self) -> &'a C {
        self.clip.expect("free node slot linked into the playback chain")
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.clip.map_or(0.0, |c| c.duration())
    }

    /// Crossfade weight toward the successor, `None` on the tail.
    #[inline]
    pub fn blend_alpha(&self) -> Option<f32> {
        self.next
            .map(|_| blend_alpha(self.blend_time, self.blend_duration))
    }

    /// Turn this node into a branch crossfading into `next`.
    fn link(&mut self, next: NodeIndex, blend_duration: f32) {
        self.next = Some(next);
        self.blend_time = 0.0;
        self.blend_duration = blend_duration;
    }
}

#[derive(Debug)]
pub struct NodePool<'a, C: ?Sized> {
    nodes: Vec<PlaybackNode<'a, C>>,
    root: Option<NodeIndex>,
    tail: Option<NodeIndex>,
    len: usize,
}

impl<'a, C: AnimationClip + ?Sized> NodePool<'a, C> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "node pool needs at least one slot");
        assert!(capacity <= u16::MAX as usize, "node pool capacity too large");
        Self {
            nodes: vec![PlaybackNode::empty(); capacity],
            root: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.nodes.len()
    }

    #[inline]
    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    #[inline]
    pub fn tail(&self) -> Option<NodeIndex> {
        self.tail
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> &PlaybackNode<'a, C> {
        assert!(idx.get() < self.nodes.len(), "node index {idx:?} out of pool bounds");
        &self.nodes[idx.get()]
    }

    #[inline]
    pub fn get_mut(&mut self, idx: NodeIndex) -> &mut PlaybackNode<'a, C> {
        assert!(idx.get() < self.nodes.len(), "node index {idx:?} out of pool bounds");
        &mut self.nodes[idx.get()]
    }

    fn alloc(&self) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(PlaybackNode::is_free)
            .map(NodeIndex::new)
    }

    /// Link `node` as the new tail. The previous tail, if any, becomes a
    /// branch blending into it over `blend_duration`.
    ///
    /// Returns `None` without touching the pool when it is full.
    pub fn push_tail(
        &mut self,
        node: PlaybackNode<'a, C>,
        blend_duration: f32,
    ) -> Option<NodeIndex> {
        debug_assert!(!node.is_free() && node.next.is_none());
        let idx = self.alloc()?;
        self.nodes[idx.get()] = node;
        match self.tail {
            Some(prev) => self.get_mut(prev).link(idx, blend_duration),
            None => self.root = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        self.debug_check();
        Some(idx)
    }

    /// Overwrite the tail in place with `node`, keeping its predecessor's
    /// crossfade state. Returns the evicted node.
    pub fn replace_tail(&mut self, node: PlaybackNode<'a, C>) -> Option<PlaybackNode<'a, C>> {
        debug_assert!(!node.is_free() && node.next.is_none());
        let tail = self.tail?;
        let slot = self.get_mut(tail);
        let evicted = std::mem::replace(slot, node);
        self.debug_check();
        Some(evicted)
    }

    /// Finish the head crossfade: the root's successor moves into the root
    /// slot with its own time and link, and its old slot is freed.
    ///
    /// Returns the outgoing root, or `None` when the root has no successor.
    pub fn collapse_head(&mut self) -> Option<PlaybackNode<'a, C>> {
        let root = self.root?;
        let succ = self.get(root).next?;
        let incoming = std::mem::replace(self.get_mut(succ), PlaybackNode::empty());
        let outgoing = std::mem::replace(self.get_mut(root), incoming);
        if self.tail == Some(succ) {
            self.tail = Some(root);
        }
        self.len -= 1;
        self.debug_check();
        Some(outgoing)
    }

    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            *node = PlaybackNode::empty();
        }
        self.root = None;
        self.tail = None;
        self.len = 0;
    }

    /// Chain in play order, root first.
    pub fn iter(&self) -> ChainIter<'_, 'a, C> {
        ChainIter {
            pool: self,
            cursor: self.root,
            remaining: self.len,
        }
    }

    /// Node at `depth` in the chain (0 = root).
    pub fn at_depth(&self, depth: usize) -> Option<&PlaybackNode<'a, C>> {
        self.iter().nth(depth).map(|(_, node)| node)
    }

    #[inline]
    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            self.check_invariants();
        }
    }

    /// Walk the chain and assert the pool bookkeeping is consistent.
    ///
    /// # Panics
    /// On any broken link, cycle, or count mismatch.
    pub fn check_invariants(&self) {
        let mut count = 0;
        let mut last = None;
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            assert!(count < self.nodes.len(), "cycle in playback chain");
            let node = self.get(idx);
            assert!(!node.is_free(), "free slot {idx:?} linked into chain");
            count += 1;
            last = Some(idx);
            cursor = node.next;
        }
        assert_eq!(count, self.len, "chain length does not match pool count");
        assert_eq!(last, self.tail, "tail does not terminate the chain");
        let occupied = self.nodes.iter().filter(|n| !n.is_free()).count();
        assert_eq!(occupied, self.len, "occupied slots outside the chain");
    }
}

pub struct ChainIter<'p, 'a, C: ?Sized> {
    pool: &'p NodePool<'a, C>,
    cursor: Option<NodeIndex>,
    remaining: usize,
}

impl<'p, 'a, C: AnimationClip + ?Sized> Iterator for ChainIter<'p, 'a, C> {
    type Item = (NodeIndex, &'p PlaybackNode<'a, C>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        assert!(self.remaining > 0, "playback chain longer than pool count");
        self.remaining -= 1;
        let node = self.pool.get(idx);
        self.cursor = node.next;
        Some((idx, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
