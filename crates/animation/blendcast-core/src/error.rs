//! Error types for playback operations

use serde::{Deserialize, Serialize};

/// Recoverable playback errors. None of these leave a player half-updated:
/// the failing call mutates nothing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackError {
    /// Node pool is full and eviction was not requested
    #[error("node pool is full (capacity {capacity})")]
    Capacity { capacity: usize },

    /// Depth query beyond the active chain
    #[error("no node at depth {depth} ({active} active)")]
    NotFound { depth: usize, active: usize },

    /// Blend alpha requested while not exactly two nodes are active
    #[error("blend alpha needs exactly two active nodes, found {active}")]
    NoBlend { active: usize },

    /// Clip duration must be finite and positive
    #[error("invalid clip duration: {duration}")]
    InvalidClip { duration: f32 },

    /// Start time must be finite
    #[error("invalid start time: {time}")]
    InvalidStartTime { time: f32 },

    /// Blend duration must be finite and non-negative
    #[error("invalid blend duration: {duration}")]
    InvalidBlendDuration { duration: f32 },

    /// Tick delta must be finite and non-negative
    #[error("invalid delta time: {dt}")]
    InvalidDeltaTime { dt: f32 },

    /// Tick on a non-empty player with no playback context
    #[error("player has no playback context; call prepare first")]
    NotPrepared,

    /// Rejected player configuration
    #[error("invalid player config: {reason}")]
    InvalidConfig { reason: String },
}

impl PlaybackError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Capacity { .. } => "capacity",
            Self::NotFound { .. } | Self::NoBlend { .. } => "query",
            Self::InvalidClip { .. }
            | Self::InvalidStartTime { .. }
            | Self::InvalidBlendDuration { .. }
            | Self::InvalidDeltaTime { .. } => "validation",
            Self::NotPrepared | Self::InvalidConfig { .. } => "setup",
        }
    }
}

/// Failure reported by a [`PoseEvaluator`](crate::PoseEvaluator).
///
/// Players log these and keep advancing time; they never propagate them.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("pose evaluation failed: {reason}")]
pub struct EvaluateError {
    pub reason: String,
}

impl EvaluateError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(PlaybackError::Capacity { capacity: 2 }.category(), "capacity");
        assert_eq!(
            PlaybackError::NotFound {
                depth: 3,
                active: 1
            }
            .category(),
            "query"
        );
        assert_eq!(PlaybackError::InvalidDeltaTime { dt: -1.0 }.category(), "validation");
        assert_eq!(PlaybackError::NotPrepared.category(), "setup");
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = PlaybackError::NotFound {
            depth: 2,
            active: 1,
        };
        assert_eq!(err.to_string(), "no node at depth 2 (1 active)");
        let err = EvaluateError::new("missing track");
        assert_eq!(err.to_string(), "pose evaluation failed: missing track");
    }
}
