use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cube_spin::math::{clip_from_local, perspective, wrap_turns, FOV_Y};

/// Benchmark: the full per-frame transform build (pose advance + P*V*M).
fn bench_clip_from_local(c: &mut Criterion) {
    c.bench_function("clip_from_local", |b| {
        let mut turns = 0.0f32;
        b.iter(|| {
            turns = wrap_turns(turns + 0.5 * 0.016);
            black_box(clip_from_local(black_box(turns), black_box(800.0 / 600.0)))
        });
    });
}

/// Benchmark: projection construction alone, including the degenerate
/// near >= far branch.
fn bench_perspective(c: &mut Criterion) {
    c.bench_function("perspective", |b| {
        b.iter(|| black_box(perspective(FOV_Y, black_box(1.333), 1.0, 100.0)));
    });

    c.bench_function("perspective_degenerate", |b| {
        b.iter(|| black_box(perspective(FOV_Y, black_box(1.333), 5.0, 5.0)));
    });
}

criterion_group!(benches, bench_clip_from_local, bench_perspective);
criterion_main!(benches);
