//! Clip provider boundary.
//!
//! Players borrow clips for the lifetime of the player and read nothing but
//! the duration; sampling is only used by the reference evaluator.

use serde::{Deserialize, Serialize};

use crate::error::EvaluateError;
use crate::pose::JointTransform;

/// An immutable, externally owned animation clip.
pub trait AnimationClip {
    /// Length in seconds. Must be finite and > 0 for the clip to be playable.
    fn duration(&self) -> f32;

    /// Sample local joint transforms at `time` (seconds, in `[0, duration)`)
    /// into `out`.
    fn sample(&self, time: f32, out: &mut [JointTransform]) -> Result<(), EvaluateError> {
        let _ = (time, out);
        Err(EvaluateError::new("clip does not support sampling"))
    }
}

impl<C: AnimationClip + ?Sized> AnimationClip for &C {
    fn duration(&self) -> f32 {
        (**self).duration()
    }

    fn sample(&self, time: f32, out: &mut [JointTransform]) -> Result<(), EvaluateError> {
        (**self).sample(time, out)
    }
}

/// One pose key of a [`ClipInfo`], at a time in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipKey {
    pub time: f32,
    pub joints: Vec<JointTransform>,
}

/// Concrete clip: a name, a duration, and optional pose keys sampled with
/// linear interpolation that loops from the last key back to the first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    pub duration: f32,
    #[serde(default)]
    pub keys: Vec<ClipKey>,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            keys: Vec::new(),
        }
    }

    pub fn with_key(mut self, time: f32, joints: Vec<JointTransform>) -> Self {
        self.keys.push(ClipKey { time, joints });
        self.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        self
    }

    /// Surrounding keys and the interpolation factor at `time`.
    fn segment(&self, time: f32) -> Option<(&ClipKey, &ClipKey, f32)> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if self.keys.len() == 1 {
            return Some((first, first, 0.0));
        }
        if time < first.time || time >= last.time {
            // Loop segment: last key -> first key shifted by one duration.
            let span = self.duration - last.time + first.time;
            let elapsed = if time >= last.time {
                time - last.time
            } else {
                time + self.duration - last.time
            };
            let t = if span > 0.0 { elapsed / span } else { 0.0 };
            return Some((last, first, t.clamp(0.0, 1.0)));
        }
        let next = self.keys.partition_point(|k| k.time <= time);
        let (a, b) = (&self.keys[next - 1], &self.keys[next]);
        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
        Some((a, b, t))
    }
}

impl AnimationClip for ClipInfo {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn sample(&self, time: f32, out: &mut [JointTransform]) -> Result<(), EvaluateError> {
        let (a, b, t) = self
            .segment(time)
            .ok_or_else(|| EvaluateError::new(format!("clip '{}' has no keys", self.name)))?;
        for (i, joint) in out.iter_mut().enumerate() {
            *joint = match (a.joints.get(i), b.joints.get(i)) {
                (Some(ja), Some(jb)) => ja.blend(jb, t),
                (Some(j), None) | (None, Some(j)) => *j,
                (None, None) => JointTransform::IDENTITY,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(x: f32) -> Vec<JointTransform> {
        vec![JointTransform::from_translation([x, 0.0, 0.0])]
    }

    #[test]
    fn samples_between_keys() {
        let clip = ClipInfo::new("walk", 2.0)
            .with_key(0.0, tx(0.0))
            .with_key(1.0, tx(4.0));
        let mut out = [JointTransform::IDENTITY];
        clip.sample(0.5, &mut out).unwrap();
        assert!((out[0].translation[0] - 2.0).abs() < 1e-6);
        // loop segment: 1.0 -> 2.0(=0.0) goes back from 4 to 0
        clip.sample(1.5, &mut out).unwrap();
        assert!((out[0].translation[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn keyless_clip_cannot_sample() {
        let clip = ClipInfo::new("empty", 1.0);
        let mut out = [JointTransform::IDENTITY];
        assert!(clip.sample(0.0, &mut out).is_err());
    }
}
