//! SimplePlayer: two named slots, a current clip and an incoming one.
//!
//! Unlike [`CascadePlayer`](crate::CascadePlayer) there is no eviction: a
//! `play` while both slots are busy is dropped and reported as
//! [`PlayOutcome::Ignored`]. The context keeps the previous frame's pose so
//! callers can take finite-difference velocities.

use crate::cascade::{validate_dt, validate_play};
use crate::clip::AnimationClip;
use crate::config::PlayerConfig;
use crate::context::PlaybackContext;
use crate::error::PlaybackError;
use crate::evaluator::PoseEvaluator;
use crate::events::{EventBuffer, PlayOutcome, PlaybackEvent};
use crate::ids::UserData;
use crate::pose::{translation_velocity, JointTransform};
use crate::query::PlaybackQuery;
use crate::skeleton::Skeleton;
use crate::time::{advance, advance_synced, blend_alpha, wrap_time};
use crate::topology::{BlendTopology, Leaf};

#[derive(Debug)]
struct Slot<'a, C: ?Sized> {
    clip: &'a C,
    eval_time: f32,
    user_data: UserData,
}

impl<C: ?Sized> Clone for Slot<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Slot<'_, C> {}

impl<'a, C: AnimationClip + ?Sized> Slot<'a, C> {
    #[inline]
    fn leaf(&self) -> Leaf<'a, C> {
        Leaf {
            clip: self.clip,
            time: self.eval_time,
            user_data: self.user_data,
        }
    }
}

#[derive(Debug)]
pub struct SimplePlayer<'a, C: ?Sized> {
    clips: [Option<Slot<'a, C>>; 2],
    active: usize,
    /// Crossfade from `clips[0]` into `clips[1]`.
    blend_time: f32,
    blend_duration: f32,
    topology: BlendTopology<'a, C>,
    context: Option<PlaybackContext>,
    events: EventBuffer,
}

impl<'a, C: AnimationClip + ?Sized> Default for SimplePlayer<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: AnimationClip + ?Sized> SimplePlayer<'a, C> {
    pub fn new() -> Self {
        Self::with_config(&PlayerConfig::default())
    }

    /// Only `event_capacity` is taken from `cfg`; the slot count is fixed.
    pub fn with_config(cfg: &PlayerConfig) -> Self {
        Self {
            clips: [None, None],
            active: 0,
            blend_time: 0.0,
            blend_duration: 0.0,
            topology: BlendTopology::with_capacity(2),
            context: None,
            events: EventBuffer::new(cfg.event_capacity),
        }
    }

    /// Create the playback context (current and previous pose buffers).
    pub fn prepare<S: Skeleton + ?Sized>(&mut self, skeleton: &S) {
        self.context = Some(PlaybackContext::new(skeleton, true));
        log::debug!(
            "simple player prepared for {} joints",
            skeleton.num_joints()
        );
    }

    pub fn unprepare(&mut self) {
        self.context = None;
    }

    #[inline]
    pub fn is_prepared(&self) -> bool {
        self.context.is_some()
    }

    #[inline]
    pub fn context(&self) -> Option<&PlaybackContext> {
        self.context.as_ref()
    }

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

    /// Start `clip`, or crossfade into it over `blend_duration` if one clip
    /// is already playing. Dropped while a crossfade is in progress.
    pub fn play(
        &mut self,
        clip: &'a C,
        start_time: f32,
        blend_duration: f32,
        user_data: UserData,
    ) -> Result<PlayOutcome, PlaybackError> {
        validate_play(clip, start_time, blend_duration)?;
        let slot = Slot {
            clip,
            eval_time: wrap_time(start_time, clip.duration()),
            user_data,
        };
        match self.active {
            0 => {
                self.clips[0] = Some(slot);
                self.active = 1;
                log::debug!("play {user_data}: started");
                self.events.push(PlaybackEvent::Started { user_data });
                Ok(PlayOutcome::Started)
            }
            1 => {
                self.clips[1] = Some(slot);
                self.active = 2;
                self.blend_time = 0.0;
                self.blend_duration = blend_duration;
                log::debug!("play {user_data}: blending in over {blend_duration}s");
                self.events.push(PlaybackEvent::Queued {
                    user_data,
                    depth: 1,
                });
                Ok(PlayOutcome::Queued)
            }
            _ => {
                log::debug!("play {user_data}: ignored, both slots busy");
                Ok(PlayOutcome::Ignored)
            }
        }
    }

    /// Vacate both slots and drop undrained events. The context is kept.
    pub fn clear(&mut self) {
        self.clips = [None, None];
        self.active = 0;
        self.blend_time = 0.0;
        self.blend_duration = 0.0;
        self.topology.clear();
        self.events.clear();
    }

    /// Snapshot the previous pose, evaluate the current one, then advance.
    pub fn tick<E>(&mut self, dt: f32, evaluator: &mut E) -> Result<(), PlaybackError>
    where
        E: PoseEvaluator<C> + ?Sized,
    {
        validate_dt(dt)?;
        if self.active == 0 {
            return Ok(());
        }
        let Some(ctx) = self.context.as_mut() else {
            return Err(PlaybackError::NotPrepared);
        };
        ctx.snapshot_previous();

        let alpha = blend_alpha(self.blend_time, self.blend_duration);
        let [current, incoming] = self.clips;
        self.topology.build(
            [
                current.map(|s| (s.leaf(), incoming.map(|_| alpha))),
                incoming.map(|s| (s.leaf(), None)),
            ]
            .into_iter()
            .flatten(),
        );
        if let Err(err) = evaluator.evaluate(&self.topology, ctx.joints_mut()) {
            log::warn!("simple tick: {err}");
        }

        self.advance(dt, alpha);
        Ok(())
    }

    fn advance(&mut self, dt: f32, alpha: f32) {
        debug_assert_eq!(
            self.active,
            self.clips.iter().filter(|s| s.is_some()).count()
        );
        match &mut self.clips {
            [Some(current), None] => {
                let step = advance(current.eval_time, current.clip.duration(), dt);
                current.eval_time = step.time;
                if step.looped {
                    let user_data = current.user_data;
                    self.events.push(PlaybackEvent::Looped {
                        user_data,
                        depth: 0,
                    });
                }
            }
            [Some(current), Some(incoming)] => {
                let (from, to) = advance_synced(
                    (current.eval_time, current.clip.duration()),
                    (incoming.eval_time, incoming.clip.duration()),
                    alpha,
                    dt,
                );
                current.eval_time = from.time;
                incoming.eval_time = to.time;
                let (from_tag, to_tag) = (current.user_data, incoming.user_data);
                if from.looped {
                    self.events.push(PlaybackEvent::Looped {
                        user_data: from_tag,
                        depth: 0,
                    });
                }
                if to.looped {
                    self.events.push(PlaybackEvent::Looped {
                        user_data: to_tag,
                        depth: 1,
                    });
                }

                self.blend_time += dt;
                if self.blend_time > self.blend_duration {
                    self.clips[0] = self.clips[1].take();
                    self.active = 1;
                    log::debug!("transition {from_tag} -> {to_tag} complete");
                    self.events.push(PlaybackEvent::TransitionCompleted {
                        from: from_tag,
                        to: to_tag,
                    });
                }
            }
            _ => unreachable!("simple player slots out of order"),
        }
    }

    fn slot(&self, depth: usize) -> Result<&Slot<'a, C>, PlaybackError> {
        self.clips
            .get(depth)
            .and_then(Option::as_ref)
            .ok_or(PlaybackError::NotFound {
                depth,
                active: self.active,
            })
    }

    /// Previous frame's joint buffer, as snapshotted at the start of the last
    /// non-empty tick.
    pub fn prev_local_joints(&self) -> Option<&[JointTransform]> {
        self.context.as_ref().and_then(PlaybackContext::previous_joints)
    }

    /// Root joint translation velocity over the last tick of length `dt`.
    pub fn root_velocity(&self, dt: f32) -> Option<[f32; 3]> {
        let ctx = self.context.as_ref()?;
        let current = ctx.joints().first()?;
        let previous = ctx.previous_joints()?.first()?;
        translation_velocity(current, previous, dt)
    }
}

impl<'a, C: AnimationClip + ?Sized> PlaybackQuery for SimplePlayer<'a, C> {
    #[inline]
    fn active_count(&self) -> usize {
        self.active
    }

    fn user_data(&self, depth: usize) -> Result<UserData, PlaybackError> {
        self.slot(depth).map(|s| s.user_data)
    }

    fn eval_time(&self, depth: usize) -> Result<f32, PlaybackError> {
        self.slot(depth).map(|s| s.eval_time)
    }

    fn duration(&self, depth: usize) -> Result<f32, PlaybackError> {
        self.slot(depth).map(|s| s.clip.duration())
    }

    fn blend_alpha(&self) -> Result<f32, PlaybackError> {
        if self.active != 2 {
            return Err(PlaybackError::NoBlend {
                active: self.active,
            });
        }
        Ok(blend_alpha(self.blend_time, self.blend_duration))
    }

    fn local_joints(&self) -> Option<&[JointTransform]> {
        self.context.as_ref().map(PlaybackContext::joints)
    }
}
