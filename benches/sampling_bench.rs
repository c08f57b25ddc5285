//! Keyframe sampling and interpolator benchmarks.

use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use vexel::animation::{
    CubicInterpolator, InterpolatorKind, KeyedObject, LinearAnimation, LinearAnimationInstance,
    LoopMode,
};

fn make_animation() -> Arc<LinearAnimation> {
    Arc::new(LinearAnimation {
        name: "bench".to_string(),
        fps: 60,
        duration: 600,
        speed: 1.0,
        loop_mode: LoopMode::Loop,
        work_start: 0,
        work_end: 0,
        enable_work_area: false,
        keyed_objects: Vec::<KeyedObject>::new(),
    })
}

fn bench_interpolator(c: &mut Criterion) {
    let mut interpolator = CubicInterpolator::new(InterpolatorKind::Ease);
    interpolator.x1 = 0.42;
    interpolator.y1 = 0.0;
    interpolator.x2 = 0.58;
    interpolator.y2 = 1.0;
    interpolator.initialize();

    c.bench_function("cubic_ease_transform", |b| {
        let mut factor = 0.0f32;
        b.iter(|| {
            factor = (factor + 0.001) % 1.0;
            std::hint::black_box(interpolator.transform(factor));
        });
    });
}

fn bench_advance(c: &mut Criterion) {
    let animation = make_animation();
    c.bench_function("linear_animation_advance", |b| {
        let mut instance = LinearAnimationInstance::new(Arc::clone(&animation));
        b.iter(|| {
            std::hint::black_box(instance.advance(1.0 / 60.0));
        });
    });
}

criterion_group!(benches, bench_interpolator, bench_advance);
criterion_main!(benches);
