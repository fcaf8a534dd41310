// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bramble_quadtree::{Boundary, Entity, EntityId, QuadTree, QuadTreeConfig};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

const WORLD: f64 = 2048.0;
const ENTITY_SIZE: f64 = 8.0;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    /// Uniform in the open interval (1, WORLD - ENTITY_SIZE - 1): entities
    /// stay strictly inside the root, so every add is accepted.
    fn next_coord(&mut self) -> f64 {
        1.0 + self.next_f64() * (WORLD - ENTITY_SIZE - 2.0)
    }
}

fn gen_entities(count: usize, seed: u64) -> Vec<Entity> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let x = rng.next_coord();
        let y = rng.next_coord();
        out.push(Entity::new(x, y, ENTITY_SIZE, ENTITY_SIZE));
    }
    out
}

fn build_tree(count: usize, seed: u64) -> (QuadTree, Vec<EntityId>) {
    let mut tree = QuadTree::with_config(0.0, 0.0, WORLD, WORLD, QuadTreeConfig::default());
    let ids = tree
        .load(gen_entities(count, seed))
        .into_iter()
        .map(|r| r.expect("generated entities are in bounds"))
        .collect();
    (tree, ids)
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_load");
    for &count in &[256_usize, 1024, 4096] {
        let entities = gen_entities(count, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("bulk_{count}"), |b| {
            b.iter_batched(
                || entities.clone(),
                |entities| {
                    let mut tree =
                        QuadTree::with_config(0.0, 0.0, WORLD, WORLD, QuadTreeConfig::default());
                    black_box(tree.load(entities));
                    tree
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_update");
    for &count in &[256_usize, 1024, 4096] {
        group.throughput(Throughput::Elements(count as u64));

        // All entities drift a little every tick.
        group.bench_function(format!("drift_all_{count}"), |b| {
            let (mut tree, ids) = build_tree(count, 0xBADC_F00D_1234_5678);
            let mut rng = Rng::new(0x5EED_5EED_5EED_5EED);
            b.iter(|| {
                for &id in &ids {
                    let x = rng.next_coord();
                    let y = rng.next_coord();
                    tree.reposition(id, x, y).expect("entities are not static");
                }
                tree.update();
                black_box(tree.len());
            });
        });

        // Steady state: nothing moved, update only walks structure.
        group.bench_function(format!("quiescent_{count}"), |b| {
            let (mut tree, _ids) = build_tree(count, 0xC1A5_7E55_9999_ABCD);
            tree.update();
            b.iter(|| {
                tree.update();
                black_box(tree.len());
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");
    for &count in &[1024_usize, 4096] {
        let (tree, _ids) = build_tree(count, 0xCAFE_F00D_DEAD_BEEF);
        let mut rng = Rng::new(0x0123_4567_89AB_CDEF);
        let probes: Vec<Boundary> = (0..256)
            .map(|_| {
                let x = rng.next_f64() * (WORLD - 128.0);
                let y = rng.next_f64() * (WORLD - 128.0);
                Boundary::from_origin_size(x, y, 128.0, 128.0)
            })
            .collect();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("probe_128_{count}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for probe in &probes {
                    hits += tree.query(probe).len();
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load, bench_update, bench_query);
criterion_main!(benches);
