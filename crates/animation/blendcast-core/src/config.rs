//! Player configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Reference sizing: one clip playing and one blending in.
pub const DEFAULT_CAPACITY: usize = 2;

/// Sizing for a player instance.
/// Everything here is fixed at construction; nothing grows per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Number of node slots in the cascade pool. The simple player ignores
    /// this and always uses two slots.
    pub capacity: usize,
    /// Maximum number of undrained playback events retained.
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            event_capacity: 16,
        }
    }
}

impl PlayerConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.capacity == 0 {
            return Err(PlaybackError::InvalidConfig {
                reason: "capacity must be at least 1".into(),
            });
        }
        if self.capacity > u16::MAX as usize {
            return Err(PlaybackError::InvalidConfig {
                reason: format!("capacity {} exceeds {}", self.capacity, u16::MAX),
            });
        }
        Ok(())
    }
}
