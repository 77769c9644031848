// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_fastener`: binding, cascade and resolution.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use understory_fastener::{Fastener, FastenerDescriptor, FastenerTree, OwnerClass, OwnerId};

/// A chain of `len` owners, each with an inheriting `fontSize` fastener.
fn chain(len: usize) -> (FastenerTree, Vec<OwnerId>, Vec<Fastener<f64>>) {
    let mut tree = FastenerTree::new();
    let mut owners = Vec::with_capacity(len);
    let mut fasteners = Vec::with_capacity(len);
    let root = tree.insert_root();
    owners.push(root);
    fasteners.push(tree.insert_fastener(
        root,
        FastenerDescriptor::property("fontSize").default(12.0_f64),
    ));
    for i in 1..len {
        let owner = tree.insert_child(owners[i - 1]);
        owners.push(owner);
        fasteners.push(tree.insert_fastener(
            owner,
            FastenerDescriptor::property("fontSize")
                .default(12.0_f64)
                .inherit(true),
        ));
    }
    tree.mount(root);
    (tree, owners, fasteners)
}

/// A root with `width` children, each with `depth` levels of descendants.
fn fan(width: usize, depth: usize) -> (FastenerTree, Fastener<f64>) {
    let class = OwnerClass::new("View").declare(
        FastenerDescriptor::property("opacity")
            .default(1.0_f64)
            .inherit(true),
    );
    let mut tree = FastenerTree::new();
    let root = tree.insert_root();
    let top = tree.insert_fastener(
        root,
        FastenerDescriptor::property("opacity").default(1.0_f64),
    );
    let mut leaves = Vec::with_capacity(width);
    for _ in 0..width {
        let mut parent = root;
        for _ in 0..depth {
            parent = tree.insert_child_with(parent, &class);
        }
        leaves.push(parent);
    }
    tree.mount(root);
    // Looking up a leaf instantiates the declared fasteners along its chain.
    for leaf in leaves {
        black_box(tree.fastener::<f64>(leaf, "opacity"));
    }
    (tree, top)
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("fastener/resolve");
    for len in [4_usize, 16, 64] {
        let (tree, _, fasteners) = chain(len);
        let leaf = fasteners[len - 1];
        group.bench_function(BenchmarkId::new("inherited_leaf", len), |b| {
            b.iter(|| black_box(tree.state(black_box(leaf))));
        });
    }
    let (tree, _, fasteners) = chain(1);
    group.bench_function("local", |b| {
        b.iter(|| black_box(tree.get_state(black_box(fasteners[0]))));
    });
    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("fastener/cascade");
    for len in [16_usize, 64] {
        group.bench_function(BenchmarkId::new("chain", len), |b| {
            b.iter_batched(
                || chain(len),
                |(mut tree, _, fasteners)| {
                    tree.set_state(fasteners[0], 18.0);
                    black_box(tree.take_pending_updates());
                },
                BatchSize::SmallInput,
            );
        });
    }
    for (width, depth) in [(8_usize, 4_usize), (32, 4)] {
        group.bench_function(
            BenchmarkId::new("fan", format!("{width}x{depth}")),
            |b| {
                b.iter_batched(
                    || fan(width, depth),
                    |(mut tree, top)| {
                        tree.set_state(top, 0.5);
                        black_box(tree);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("fastener/mount");
    group.bench_function(BenchmarkId::new("remount_chain", 64), |b| {
        b.iter_batched(
            || chain(64),
            |(mut tree, owners, _)| {
                tree.unmount(owners[1]);
                tree.mount(owners[1]);
                black_box(tree);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_resolution, bench_cascade, bench_mount);
criterion_main!(benches);
