//! CascadePlayer: a fixed-capacity chain of clip instances crossfading in
//! play order.
//!
//! Per tick: build the topology from the chain, run the evaluator on the
//! pre-advance times, then advance. Only the head pair (root and its
//! successor) is phase-synchronized and only its crossfade timer runs; deeper
//! nodes advance on their own clock and start their crossfade once they
//! reach the head.

use crate::clip::AnimationClip;
use crate::config::PlayerConfig;
use crate::context::PlaybackContext;
use crate::error::PlaybackError;
use crate::evaluator::PoseEvaluator;
use crate::events::{EventBuffer, PlayOutcome, PlaybackEvent};
use crate::ids::UserData;
use crate::node::{NodePool, PlaybackNode};
use crate::pose::JointTransform;
use crate::query::PlaybackQuery;
use crate::skeleton::Skeleton;
use crate::time::{advance, advance_synced, wrap_time};
use crate::topology::{BlendTopology, Leaf};

#[derive(Debug)]
pub struct CascadePlayer<'a, C: ?Sized> {
    pool: NodePool<'a, C>,
    topology: BlendTopology<'a, C>,
    context: Option<PlaybackContext>,
    events: EventBuffer,
}

/// Reject clips and play parameters that would break the time invariants.
pub(crate) fn validate_play<C: AnimationClip + ?Sized>(
    clip: &C,
    start_time: f32,
    blend_duration: f32,
) -> Result<(), PlaybackError> {
    let duration = clip.duration();
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PlaybackError::InvalidClip { duration });
    }
    if !start_time.is_finite() {
        return Err(PlaybackError::InvalidStartTime { time: start_time });
    }
    if !blend_duration.is_finite() || blend_duration < 0.0 {
        return Err(PlaybackError::InvalidBlendDuration {
            duration: blend_duration,
        });
    }
    Ok(())
}

pub(crate) fn validate_dt(dt: f32) -> Result<(), PlaybackError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(PlaybackError::InvalidDeltaTime { dt });
    }
    Ok(())
}

impl<'a, C: AnimationClip + ?Sized> CascadePlayer<'a, C> {
    /// Create a player with the given sizing. Nothing is allocated later.
    pub fn new(cfg: &PlayerConfig) -> Result<Self, PlaybackError> {
        cfg.validate()?;
        Ok(Self {
            pool: NodePool::new(cfg.capacity),
            topology: BlendTopology::with_capacity(cfg.capacity),
            context: None,
            events: EventBuffer::new(cfg.event_capacity),
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, PlaybackError> {
        Self::new(&PlayerConfig::with_capacity(capacity))
    }

    /// Create the playback context sized to `skeleton`, replacing any
    /// previous one.
    pub fn prepare<S: Skeleton + ?Sized>(&mut self, skeleton: &S) {
        self.context = Some(PlaybackContext::new(skeleton, false));
        log::debug!(
            "cascade player prepared for {} joints",
            skeleton.num_joints()
        );
    }

    /// Drop the playback context. Queued nodes are kept.
    pub fn unprepare(&mut self) {
        self.context = None;
    }

    #[inline]
    pub fn is_prepared(&self) -> bool {
        self.context.is_some()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    #[inline]
    pub fn context(&self) -> Option<&PlaybackContext> {
        self.context.as_ref()
    }

    /// Topology built by the last non-empty tick.
    #[inline]
    pub fn topology(&self) -> &BlendTopology<'a, C> {
        &self.topology
    }

    #[inline]
    pub fn events(&self) -> &[PlaybackEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PlaybackEvent> {
        self.events.drain()
    }

    /// Queue `clip` at the end of the chain.
    ///
    /// The previous tail starts crossfading into it over `blend_duration`.
    /// When the pool is full, `evict_if_full` overwrites the tail in place
    /// (the playing root is never evicted, and the predecessor's crossfade
    /// timing is kept); otherwise the call fails with
    /// [`PlaybackError::Capacity`] and nothing changes.
    pub fn play(
        &mut self,
        clip: &'a C,
        start_time: f32,
        blend_duration: f32,
        user_data: UserData,
        evict_if_full: bool,
    ) -> Result<PlayOutcome, PlaybackError> {
        validate_play(clip, start_time, blend_duration)?;
        let leaf = PlaybackNode::leaf(clip, wrap_time(start_time, clip.duration()), user_data);

        if self.pool.is_empty() {
            self.pool.push_tail(leaf, 0.0);
            log::debug!("play {user_data}: started");
            self.events.push(PlaybackEvent::Started { user_data });
            return Ok(PlayOutcome::Started);
        }

        if !self.pool.is_full() {
            self.pool.push_tail(leaf, blend_duration);
            let depth = self.pool.len() - 1;
            log::debug!("play {user_data}: queued at depth {depth}, blend {blend_duration}s");
            self.events.push(PlaybackEvent::Queued { user_data, depth });
            return Ok(PlayOutcome::Queued);
        }

        if !evict_if_full {
            log::warn!(
                "play {user_data}: rejected, node pool full ({})",
                self.pool.capacity()
            );
            return Err(PlaybackError::Capacity {
                capacity: self.pool.capacity(),
            });
        }

        match self.pool.replace_tail(leaf) {
            Some(evicted) => {
                log::debug!("play {user_data}: replaced tail {}", evicted.user_data);
                self.events.push(PlaybackEvent::Replaced {
                    evicted: evicted.user_data,
                    user_data,
                });
                Ok(PlayOutcome::Replaced)
            }
            None => unreachable!("full pool without a tail"),
        }
    }

    /// Vacate every node and drop undrained events. The context is kept.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.topology.clear();
        self.events.clear();
    }

    /// Evaluate the pose for the current times, then advance by `dt`.
    ///
    /// An empty player is a no-op. Evaluator failures are logged and do not
    /// stop time from advancing.
    pub fn tick<E>(&mut self, dt: f32, evaluator: &mut E) -> Result<(), PlaybackError>
    where
        E: PoseEvaluator<C> + ?Sized,
    {
        validate_dt(dt)?;
        if self.pool.is_empty() {
            return Ok(());
        }
        let Some(ctx) = self.context.as_mut() else {
            return Err(PlaybackError::NotPrepared);
        };

        self.topology.build(self.pool.iter().map(|(_, node)| {
            (
                Leaf {
                    clip: node.active_clip(),
                    time: node.eval_time,
                    user_data: node.user_data,
                },
                node.blend_alpha(),
            )
        }));
        if let Err(err) = evaluator.evaluate(&self.topology, ctx.joints_mut()) {
            log::warn!("cascade tick: {err}");
        }

        self.advance(dt);
        Ok(())
    }

    fn advance(&mut self, dt: f32) {
        let Some(root) = self.pool.root() else {
            return;
        };
        let head = *self.pool.get(root);
        let Some(succ) = head.next else {
            let step = advance(head.eval_time, head.duration(), dt);
            self.pool.get_mut(root).eval_time = step.time;
            if step.looped {
                self.push_looped(head.user_data, 0);
            }
            log::trace!("cascade tick: root at {}", step.time);
            return;
        };

        let incoming = *self.pool.get(succ);
        let alpha = head.blend_alpha().unwrap_or(1.0);
        let (from, to) = advance_synced(
            (head.eval_time, head.duration()),
            (incoming.eval_time, incoming.duration()),
            alpha,
            dt,
        );
        self.pool.get_mut(succ).eval_time = to.time;
        if from.looped {
            self.push_looped(head.user_data, 0);
        }
        if to.looped {
            self.push_looped(incoming.user_data, 1);
        }

        let mut cursor = incoming.next;
        let mut depth = 2;
        while let Some(idx) = cursor {
            assert!(depth < self.pool.capacity(), "cycle in playback chain");
            let node = self.pool.get_mut(idx);
            let step = advance(node.eval_time, node.duration(), dt);
            node.eval_time = step.time;
            let (user_data, next) = (node.user_data, node.next);
            if step.looped {
                self.push_looped(user_data, depth);
            }
            cursor = next;
            depth += 1;
        }

        let head = self.pool.get_mut(root);
        head.eval_time = from.time;
        head.blend_time += dt;
        log::trace!(
            "cascade tick: blend {}/{}s",
            head.blend_time,
            head.blend_duration
        );
        if head.blend_time > head.blend_duration {
            if let Some(outgoing) = self.pool.collapse_head() {
                log::debug!(
                    "transition {} -> {} complete",
                    outgoing.user_data,
                    incoming.user_data
                );
                self.events.push(PlaybackEvent::TransitionCompleted {
                    from: outgoing.user_data,
                    to: incoming.user_data,
                });
            }
        }
    }

    #[inline]
    fn push_looped(&mut self, user_data: UserData, depth: usize) {
        self.events.push(PlaybackEvent::Looped { user_data, depth });
    }

    fn node(&self, depth: usize) -> Result<&PlaybackNode<'a, C>, PlaybackError> {
        self.pool.at_depth(depth).ok_or(PlaybackError::NotFound {
            depth,
            active: self.pool.len(),
        })
    }

    /// Crossfade weight of the node at `depth` toward its successor.
    /// Deeper transitions report `0` until they reach the head.
    pub fn blend_alpha_at(&self, depth: usize) -> Result<f32, PlaybackError> {
        let node = self.node(depth)?;
        node.blend_alpha().ok_or(PlaybackError::NotFound {
            depth: depth + 1,
            active: self.pool.len(),
        })
    }
}

impl<'a, C: AnimationClip + ?Sized> PlaybackQuery for CascadePlayer<'a, C> {
    #[inline]
    fn active_count(&self) -> usize {
        self.pool.len()
    }

    fn user_data(&self, depth: usize) -> Result<UserData, PlaybackError> {
        self.node(depth).map(|n| n.user_data)
    }

    fn eval_time(&self, depth: usize) -> Result<f32, PlaybackError> {
        self.node(depth).map(|n| n.eval_time)
    }

    fn duration(&self, depth: usize) -> Result<f32, PlaybackError> {
        self.node(depth).map(PlaybackNode::duration)
    }

    fn blend_alpha(&self) -> Result<f32, PlaybackError> {
        if self.pool.len() != 2 {
            return Err(PlaybackError::NoBlend {
                active: self.pool.len(),
            });
        }
        self.blend_alpha_at(0)
    }

    fn local_joints(&self) -> Option<&[JointTransform]> {
        self.context.as_ref().map(PlaybackContext::joints)
    }
}
