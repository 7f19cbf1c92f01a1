//! Play outcomes and the semantic events players record while playing.

use serde::{Deserialize, Serialize};

use crate::ids::UserData;

/// What a successful `play` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// The player was empty; the clip is now the root.
    Started,
    /// Linked as the new tail, crossfading in from its predecessor.
    Queued,
    /// The pool was full and the tail was overwritten in place.
    Replaced,
    /// The player was full and the request was dropped.
    Ignored,
}

/// Discrete signals recorded by `play` and `tick`, drained by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackEvent {
    Started {
        user_data: UserData,
    },
    Queued {
        user_data: UserData,
        depth: usize,
    },
    Replaced {
        evicted: UserData,
        user_data: UserData,
    },
    /// The head crossfade finished; `to` is the new root.
    TransitionCompleted {
        from: UserData,
        to: UserData,
    },
    /// A node crossed its clip's loop point during a tick.
    Looped {
        user_data: UserData,
        depth: usize,
    },
}

/// Bounded event list. Events past capacity are dropped until drained.
#[derive(Clone, Debug, Default)]
pub struct EventBuffer {
    events: Vec<PlaybackEvent>,
    capacity: usize,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn push(&mut self, event: PlaybackEvent) {
        if self.events.len() >= self.capacity {
            log::trace!("event buffer full ({}), dropping {event:?}", self.capacity);
            return;
        }
        self.events.push(event);
    }

    #[inline]
    pub fn as_slice(&self) -> &[PlaybackEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, PlaybackEvent> {
        self.events.drain(..)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
