//! Joint transforms and the blend/velocity helpers that operate on them.

use serde::{Deserialize, Serialize};

use crate::time::lerp;

/// Local transform of one joint: translation, rotation quaternion (x,y,z,w), scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointTransform {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl JointTransform {
    pub const IDENTITY: Self = Self {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
    };

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Interpolate toward `other` by `t`: component-wise for translation and
    /// scale, shortest-arc NLERP for rotation.
    pub fn blend(&self, other: &Self, t: f32) -> Self {
        Self {
            translation: lerp_vec3(self.translation, other.translation, t),
            rotation: nlerp_quat(self.rotation, other.rotation, t),
            scale: lerp_vec3(self.scale, other.scale, t),
        }
    }
}

impl Default for JointTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        for c in &mut q {
            *c *= inv_len;
        }
    }
    q
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        for c in &mut b {
            *c = -*c;
        }
    }
    normalize4([
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ])
}

/// Finite-difference translation velocity `(current - previous) / dt`.
///
/// Returns `None` when `dt <= 0`.
pub fn translation_velocity(
    current: &JointTransform,
    previous: &JointTransform,
    dt: f32,
) -> Option<[f32; 3]> {
    if dt <= 0.0 {
        return None;
    }
    let inv_dt = dt.recip();
    let mut out = [0.0; 3];
    for (o, (c, p)) in out
        .iter_mut()
        .zip(current.translation.iter().zip(previous.translation.iter()))
    {
        *o = (c - p) * inv_dt;
    }
    Some(out)
}

/// Per-joint translation velocities written into `out`.
///
/// Writes `min(current.len(), previous.len(), out.len())` entries and returns
/// that count, or `None` when `dt <= 0`.
pub fn translation_velocities(
    current: &[JointTransform],
    previous: &[JointTransform],
    dt: f32,
    out: &mut [[f32; 3]],
) -> Option<usize> {
    if dt <= 0.0 {
        return None;
    }
    let mut written = 0;
    for (o, (c, p)) in out.iter_mut().zip(current.iter().zip(previous.iter())) {
        *o = translation_velocity(c, p, dt)?;
        written += 1;
    }
    Some(written)
}
