use blendcast_core::{
    time::lerp, BlendChild, BlendTopology, ClipInfo, EvaluateError, JointTransform,
    NullEvaluator, PlayOutcome, PlaybackError, PlaybackEvent, PlaybackQuery, PoseEvaluator,
    SimplePlayer, SkeletonInfo,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Writes the blended playback time into the root joint's x translation.
struct TimeProbe;

impl PoseEvaluator<ClipInfo> for TimeProbe {
    fn evaluate(
        &mut self,
        topology: &BlendTopology<'_, ClipInfo>,
        joints: &mut [JointTransform],
    ) -> Result<(), EvaluateError> {
        let leaves = topology.leaves();
        let x = match topology.root() {
            Some(BlendChild::Leaf(i)) => leaves[i].time,
            Some(BlendChild::Branch(i)) => {
                let b = topology.branches()[i];
                lerp(leaves[0].time, leaves[1].time, b.weight)
            }
            None => return Err(EvaluateError::new("empty topology")),
        };
        joints[0] = JointTransform::from_translation([x, 0.0, 0.0]);
        Ok(())
    }
}

fn prepared<'a>() -> SimplePlayer<'a, ClipInfo> {
    let mut p = SimplePlayer::new();
    p.prepare(&SkeletonInfo::new("biped", 2));
    p
}

#[test]
fn third_play_is_ignored_while_blending() {
    let a = ClipInfo::new("a", 1.0);
    let b = ClipInfo::new("b", 2.0);
    let c = ClipInfo::new("c", 3.0);
    let mut p = prepared();
    assert_eq!(p.play(&a, 0.0, 0.0, 1).unwrap(), PlayOutcome::Started);
    assert_eq!(p.play(&b, 0.5, 0.5, 2).unwrap(), PlayOutcome::Queued);
    p.tick(0.1, &mut NullEvaluator).unwrap();

    let before: Vec<_> = (0..2)
        .map(|d| (p.user_data(d).unwrap(), p.eval_time(d).unwrap()))
        .collect();
    let alpha = p.blend_alpha().unwrap();
    assert_eq!(p.play(&c, 0.0, 0.5, 3).unwrap(), PlayOutcome::Ignored);
    let after: Vec<_> = (0..2)
        .map(|d| (p.user_data(d).unwrap(), p.eval_time(d).unwrap()))
        .collect();
    assert_eq!(before, after);
    assert_eq!(p.blend_alpha().unwrap(), alpha);
    assert!(!p
        .events()
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Queued { user_data: 3, .. })));
}

#[test]
fn previous_pose_is_snapshotted_before_each_tick() {
    let a = ClipInfo::new("a", 2.0);
    let mut p = prepared();
    assert!(p.prev_local_joints().unwrap()[0] == JointTransform::IDENTITY);
    p.play(&a, 0.0, 0.0, 1).unwrap();

    p.tick(0.25, &mut TimeProbe).unwrap();
    assert_eq!(p.local_joints().unwrap()[0].translation[0], 0.0);
    p.tick(0.25, &mut TimeProbe).unwrap();
    assert_eq!(p.prev_local_joints().unwrap()[0].translation[0], 0.0);
    assert_eq!(p.local_joints().unwrap()[0].translation[0], 0.25);

    let v = p.root_velocity(0.25).unwrap();
    approx(v[0], 1.0, 1e-6);
    assert_eq!(p.root_velocity(0.0), None);
}

#[test]
fn empty_tick_does_not_snapshot() {
    let mut p = prepared();
    p.tick(0.25, &mut TimeProbe).unwrap();
    assert!(p.prev_local_joints().unwrap().iter().all(|j| *j == JointTransform::IDENTITY));
}

#[test]
fn unprepared_player_has_no_buffers() {
    let a = ClipInfo::new("a", 1.0);
    let mut p = SimplePlayer::new();
    assert!(p.local_joints().is_none());
    assert!(p.prev_local_joints().is_none());
    assert!(p.root_velocity(0.1).is_none());
    p.play(&a, 0.0, 0.0, 1).unwrap();
    assert_eq!(p.tick(0.1, &mut TimeProbe), Err(PlaybackError::NotPrepared));
    assert_eq!(p.eval_time(0).unwrap(), 0.0);
}

#[test]
fn incoming_slot_takes_over_after_blend() {
    let a = ClipInfo::new("a", 1.0);
    let b = ClipInfo::new("b", 2.0);
    let mut p = prepared();
    p.play(&a, 0.0, 0.0, 1).unwrap();
    p.play(&b, 0.0, 0.5, 2).unwrap();

    let mut alphas = Vec::new();
    while p.active_count() == 2 {
        p.tick(0.2, &mut TimeProbe).unwrap();
        if let Ok(alpha) = p.blend_alpha() {
            alphas.push(alpha);
        }
    }
    assert_eq!(alphas.len(), 2);
    approx(alphas[0], 0.4, 1e-6);
    approx(alphas[1], 0.8, 1e-6);
    assert_eq!(p.user_data(0).unwrap(), 2);
    assert_eq!(p.duration(0).unwrap(), 2.0);
    assert!(p.user_data(1).is_err());
    assert!(p
        .events()
        .contains(&PlaybackEvent::TransitionCompleted { from: 1, to: 2 }));

    // a new clip can blend in again
    assert_eq!(p.play(&a, 0.0, 0.5, 3).unwrap(), PlayOutcome::Queued);
}

#[test]
fn blended_pose_uses_pre_advance_weight() {
    let a = ClipInfo::new("a", 1.0);
    let b = ClipInfo::new("b", 1.0);
    let mut p = prepared();
    p.play(&a, 0.0, 0.0, 1).unwrap();
    p.play(&b, 0.5, 1.0, 2).unwrap();
    p.tick(0.25, &mut TimeProbe).unwrap();
    // weight 0 on the first tick: pose is clip a at 0.0
    assert_eq!(p.local_joints().unwrap()[0].translation[0], 0.0);
    p.tick(0.25, &mut TimeProbe).unwrap();
    // a at 0.25, b at 0.75, weight 0.25
    approx(p.local_joints().unwrap()[0].translation[0], 0.375, 1e-5);
}

#[test]
fn clear_resets_slots() {
    let a = ClipInfo::new("a", 1.0);
    let mut p = prepared();
    p.play(&a, 0.0, 0.0, 1).unwrap();
    p.play(&a, 0.0, 1.0, 2).unwrap();
    assert_eq!(p.events().len(), 2);
    p.clear();
    assert!(p.is_empty());
    assert!(p.events().is_empty(), "clear drops undrained events");
    assert_eq!(p.blend_alpha(), Err(PlaybackError::NoBlend { active: 0 }));
    assert_eq!(p.play(&a, 0.0, 0.0, 3).unwrap(), PlayOutcome::Started);
    assert_eq!(p.events(), &[PlaybackEvent::Started { user_data: 3 }]);
}
