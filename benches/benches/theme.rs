// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_mood` resolution and `understory_animator` ticks.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use understory_animator::{AnimatorRegistry, ThemeAnimator, ThemeFrame};
use understory_fastener::{FastenerDescriptor, FastenerTree};
use understory_mood::{MoodMatrix, MoodVector, ThemeMatrix, Timing, feels, looks, moods};

fn bench_resolve(c: &mut Criterion) {
    let theme = ThemeMatrix::light();
    let plain = moods::DEFAULT.vector();
    let busy = MoodVector::of([
        (feels::DEFAULT, 1.0),
        (feels::PRIMARY, 0.6),
        (feels::HOVERING, 0.4),
        (feels::RAISED, 1.0),
        (feels::NESTED, 2.0),
    ]);

    let mut group = c.benchmark_group("theme/get");
    for (name, mood) in [("default", &plain), ("blended", &busy)] {
        group.bench_function(BenchmarkId::new("color", name), |b| {
            b.iter(|| black_box(theme.get(&looks::BACKGROUND_COLOR, black_box(mood))));
        });
        group.bench_function(BenchmarkId::new("length", name), |b| {
            b.iter(|| black_box(theme.get(&looks::SPACING, black_box(mood))));
        });
        group.bench_function(BenchmarkId::new("shadow", name), |b| {
            b.iter(|| black_box(theme.get(&looks::SHADOW, black_box(mood))));
        });
    }
    group.bench_function("composed", |b| {
        let hover = moods::HOVERING.vector();
        b.iter(|| black_box(theme.get_composed(&looks::TEXT_COLOR, &plain, &hover)));
    });
    group.finish();

    let mut group = c.benchmark_group("theme/matrix");
    group.bench_function("dot_all_looks", |b| {
        b.iter(|| black_box(theme.dot(black_box(&busy))));
    });
    let matrix = MoodMatrix::builder()
        .row(feels::SELECTED, MoodVector::of([(feels::PRIMARY, 0.5)]))
        .row(feels::COVERED, MoodVector::of([(feels::DARKER, 1.0)]))
        .build();
    group.bench_function("transform", |b| {
        b.iter(|| black_box(theme.transform(black_box(&matrix))));
    });
    group.finish();
}

fn bench_vectors(c: &mut Criterion) {
    let a = MoodVector::of(feels::ALL.iter().map(|&f| (f, 1.0)));
    let b = MoodVector::of(feels::ALL.iter().step_by(2).map(|&f| (f, 0.5)));

    let mut group = c.benchmark_group("mood_vector");
    group.bench_function("plus", |bench| bench.iter(|| black_box(a.plus(black_box(&b)))));
    group.bench_function("dot", |bench| bench.iter(|| black_box(a.dot(black_box(&b)))));
    group.bench_function("updated_replace", |bench| {
        bench.iter(|| black_box(a.updated(feels::HOVERING, Some(0.25))));
    });
    group.bench_function("updated_remove", |bench| {
        bench.iter(|| black_box(a.updated(feels::HOVERING, None)));
    });
    group.finish();
}

fn bench_animators(c: &mut Criterion) {
    let mut group = c.benchmark_group("animator/tick");
    for count in [16_usize, 128] {
        group.bench_function(BenchmarkId::new("tweening", count), |b| {
            b.iter_batched(
                || {
                    let mut tree = FastenerTree::new();
                    let root = tree.insert_root();
                    let mut registry = AnimatorRegistry::new();
                    for _ in 0..count {
                        let view = tree.insert_child(root);
                        let opacity = tree.insert_fastener(
                            view,
                            FastenerDescriptor::animator("opacity").default(0.0_f64),
                        );
                        let mut animator = ThemeAnimator::new(opacity);
                        animator.set_look(Some(looks::OPACITY), Some(Timing::linear(300.0)));
                        registry.insert(animator);
                    }
                    tree.mount(root);
                    let frame =
                        ThemeFrame::new(Some(ThemeMatrix::light()), moods::DEFAULT.vector(), 0.0);
                    registry.tick(&mut tree, &frame);
                    (tree, registry, frame)
                },
                |(mut tree, mut registry, frame)| {
                    black_box(registry.tick(&mut tree, &frame.at(150.0)));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_vectors, bench_animators);
criterion_main!(benches);
