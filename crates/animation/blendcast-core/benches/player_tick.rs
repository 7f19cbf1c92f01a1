use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use blendcast_core::{
    BlendEvaluator, CascadePlayer, ClipInfo, JointTransform, NullEvaluator, SimplePlayer,
    SkeletonInfo,
};

const JOINTS: usize = 64;

fn keyed_clip(name: &str, duration: f32) -> ClipInfo {
    let pose = |x: f32| {
        (0..JOINTS)
            .map(|j| JointTransform::from_translation([x, j as f32, 0.0]))
            .collect::<Vec<_>>()
    };
    ClipInfo::new(name, duration)
        .with_key(0.0, pose(0.0))
        .with_key(duration * 0.5, pose(1.0))
}

fn bench_cascade(c: &mut Criterion) {
    let clips: Vec<ClipInfo> = (0..4)
        .map(|i| keyed_clip(&format!("clip{i}"), 0.8 + i as f32 * 0.3))
        .collect();
    let skeleton = SkeletonInfo::new("bench", JOINTS);

    let mut group = c.benchmark_group("cascade_tick");
    for depth in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::new("timing_only", depth), &depth, |b, &depth| {
            let mut player = CascadePlayer::with_capacity(depth).expect("capacity");
            player.prepare(&skeleton);
            for (i, clip) in clips.iter().take(depth).enumerate() {
                player.play(clip, 0.0, 1e6, i as u64, false).expect("play");
            }
            b.iter(|| {
                player
                    .tick(black_box(1.0 / 60.0), &mut NullEvaluator)
                    .expect("tick");
                player.drain_events().for_each(drop);
            });
        });
        group.bench_with_input(BenchmarkId::new("blended", depth), &depth, |b, &depth| {
            let mut player = CascadePlayer::with_capacity(depth).expect("capacity");
            player.prepare(&skeleton);
            for (i, clip) in clips.iter().take(depth).enumerate() {
                player.play(clip, 0.0, 1e6, i as u64, false).expect("play");
            }
            let mut eval = BlendEvaluator::new(JOINTS, depth);
            b.iter(|| {
                player.tick(black_box(1.0 / 60.0), &mut eval).expect("tick");
                player.drain_events().for_each(drop);
            });
        });
    }
    group.finish();
}

fn bench_simple(c: &mut Criterion) {
    let a = keyed_clip("a", 1.0);
    let b_clip = keyed_clip("b", 1.7);
    let skeleton = SkeletonInfo::new("bench", JOINTS);

    c.bench_function("simple_tick_blended", |b| {
        let mut player = SimplePlayer::new();
        player.prepare(&skeleton);
        player.play(&a, 0.0, 0.0, 1).expect("play");
        player.play(&b_clip, 0.0, 1e6, 2).expect("play");
        let mut eval = BlendEvaluator::new(JOINTS, 2);
        b.iter(|| {
            player.tick(black_box(1.0 / 60.0), &mut eval).expect("tick");
            black_box(player.root_velocity(1.0 / 60.0));
            player.drain_events().for_each(drop);
        });
    });
}

criterion_group!(benches, bench_cascade, bench_simple);
criterion_main!(benches);
