//! Blendcast Core (engine-agnostic)
//!
//! Crossfading clip playback for skeletal animation. A player keeps a short
//! chain of in-flight clip instances, advances their times every tick with
//! phase synchronization across the blending pair, and hands a leaf/branch
//! blend topology to an external [`PoseEvaluator`] that writes joint
//! transforms into the player's [`PlaybackContext`].
//!
//! Two variants are provided:
//! - [`CascadePlayer`]: fixed-capacity node chain with an explicit
//!   `evict_if_full` policy on `play`.
//! - [`SimplePlayer`]: two named slots, silently ignores `play` while full and
//!   keeps the previous frame's pose for velocity queries.
//!
//! Clips and skeletons are borrowed; the players never own or load them.

pub mod cascade;
pub mod clip;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod ids;
pub mod node;
pub mod pose;
pub mod query;
pub mod simple;
pub mod skeleton;
pub mod time;
pub mod topology;

// Re-exports for consumers (game logic, motion-matching drivers)
pub use cascade::CascadePlayer;
pub use clip::{AnimationClip, ClipInfo};
pub use config::PlayerConfig;
pub use context::PlaybackContext;
pub use error::{EvaluateError, PlaybackError};
pub use evaluator::{BlendEvaluator, NullEvaluator, PoseEvaluator};
pub use events::{PlayOutcome, PlaybackEvent};
pub use ids::{NodeIndex, UserData};
pub use pose::JointTransform;
pub use query::PlaybackQuery;
pub use simple::SimplePlayer;
pub use skeleton::{Skeleton, SkeletonInfo};
pub use topology::{BlendChild, BlendTopology, Branch, Leaf};
