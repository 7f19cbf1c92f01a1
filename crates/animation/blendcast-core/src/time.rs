//! Playback time math: wrap-around, blend alpha, and the phase-synchronized
//! advance used while two clips crossfade.
//!
//! Every time returned from this module lies in `[0, duration)`; a value that
//! lands exactly on `duration` wraps to `0`.

/// Floating-point modulo with a non-negative result for positive `b`.
#[inline]
pub fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Wrap `t` into `[0, duration)`.
#[inline]
pub fn wrap_time(t: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let m = fmod(t, duration);
    // `m + b` in fmod can round up to exactly `duration` for tiny negative `m`.
    if m >= duration || m < 0.0 {
        0.0
    } else {
        m
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Crossfade progress clamped to `[0, 1]`. A zero-length blend is complete.
#[inline]
pub fn blend_alpha(blend_time: f32, blend_duration: f32) -> f32 {
    if blend_duration <= 0.0 {
        return 1.0;
    }
    (blend_time / blend_duration).clamp(0.0, 1.0)
}

/// Result of advancing one clip's playback time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advance {
    pub time: f32,
    /// The clip crossed its loop point during this advance.
    pub looped: bool,
}

/// Plain advance: `time + dt`, wrapped into the clip.
#[inline]
pub fn advance(time: f32, duration: f32, dt: f32) -> Advance {
    let raw = time + dt;
    Advance {
        time: wrap_time(raw, duration),
        looped: raw >= duration,
    }
}

/// Advance a clip by a normalized phase step and map back to its own time.
#[inline]
pub fn advance_phase(time: f32, duration: f32, delta_phase: f32) -> Advance {
    let raw = time / duration + delta_phase;
    let phase = wrap_time(raw, 1.0);
    Advance {
        time: wrap_time(phase * duration, duration),
        looped: raw >= 1.0,
    }
}

/// Shared phase step for a crossfading pair: `dt` over the alpha-weighted
/// blend of both durations.
#[inline]
pub fn synced_delta_phase(from_duration: f32, to_duration: f32, alpha: f32, dt: f32) -> f32 {
    let blended = lerp(from_duration, to_duration, alpha);
    if blended <= 0.0 {
        return 0.0;
    }
    dt / blended
}

/// Advance the blending pair `(from, to)` in lockstep.
///
/// Both clips move by the same phase step so they cross their loop points in
/// a rhythm set by the current blend weight instead of drifting apart.
pub fn advance_synced(
    from: (f32, f32),
    to: (f32, f32),
    alpha: f32,
    dt: f32,
) -> (Advance, Advance) {
    let (from_time, from_duration) = from;
    let (to_time, to_duration) = to;
    let delta_phase = synced_delta_phase(from_duration, to_duration, alpha, dt);
    (
        advance_phase(from_time, from_duration, delta_phase),
        advance_phase(to_time, to_duration, delta_phase),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn fmod_is_non_negative() {
        approx(fmod(5.5, 2.0), 1.5);
        approx(fmod(-0.5, 2.0), 1.5);
        assert_eq!(fmod(1.0, 0.0), 0.0);
    }

    #[test]
    fn exact_boundary_wraps_to_zero() {
        assert_eq!(wrap_time(2.0, 2.0), 0.0);
        let a = advance(1.5, 2.0, 0.5);
        assert_eq!(a.time, 0.0);
        assert!(a.looped);
    }

    #[test]
    fn tiny_negative_never_lands_on_duration() {
        let t = wrap_time(-1e-9, 1.0);
        assert!((0.0..1.0).contains(&t));
    }

    #[test]
    fn alpha_clamps() {
        assert_eq!(blend_alpha(0.0, 1.0), 0.0);
        assert_eq!(blend_alpha(0.5, 1.0), 0.5);
        assert_eq!(blend_alpha(3.0, 1.0), 1.0);
        assert_eq!(blend_alpha(0.0, 0.0), 1.0);
    }

    #[test]
    fn synced_pair_shares_phase_step() {
        // alpha 0: effective duration is the outgoing clip's.
        let (a, b) = advance_synced((0.0, 1.0), (0.0, 3.0), 0.0, 0.25);
        approx(a.time, 0.25);
        approx(b.time, 0.75);

        // alpha 1: effective duration is the incoming clip's.
        let (a, b) = advance_synced((0.0, 1.0), (0.0, 3.0), 1.0, 0.75);
        approx(a.time, 0.25);
        approx(b.time, 0.75);
    }

    #[test]
    fn synced_pair_loops_together() {
        let (a, b) = advance_synced((0.9, 1.0), (1.8, 2.0), 0.5, 0.3);
        assert!(a.looped && b.looped);
        approx(a.time / 1.0, b.time / 2.0);
    }
}
