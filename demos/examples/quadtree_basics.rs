// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build a small tree, move an entity, reconcile with one `update`, and run
//! a broad-phase query.
//!
//! Run:
//! - `cargo run -p bramble_demos --example quadtree_basics`

use bramble_quadtree::{Entity, QuadTree, QuadTreeConfig};
use kurbo::Rect;

fn main() {
    // A 200x200 world where a leaf divides past 2 entities.
    let mut tree = QuadTree::with_config(
        0.0,
        0.0,
        200.0,
        200.0,
        QuadTreeConfig {
            capacity: 2,
            max_depth: 5,
        },
    );

    let player = tree
        .add(Entity::new(20.0, 20.0, 10.0, 10.0))
        .expect("in bounds");
    let crate_a = tree
        .add(Entity::new(140.0, 30.0, 16.0, 16.0))
        .expect("in bounds");
    let crate_b = tree
        .add(Entity::new(150.0, 140.0, 16.0, 16.0))
        .expect("in bounds");

    // A wall never moves; the per-tick reconcile pass skips it entirely.
    let mut wall = Entity::new(90.0, 90.0, 30.0, 8.0);
    wall.make_static();
    let wall = tree.add(wall).expect("in bounds");

    println!("after setup: {tree:?}");

    // Move the player towards the crates, then reconcile once for the tick.
    tree.reposition(player, 130.0, 40.0).expect("player moves");
    tree.update();

    // Broad phase: candidates whose leaves touch the probe region. Filter
    // with a precise overlap test if you need exactness.
    let probe = Rect::new(120.0, 20.0, 180.0, 80.0);
    let nearby = tree.query_rect(probe);
    println!("candidates near {probe:?}:");
    for id in &nearby {
        let entity = tree.entity(*id).expect("query returns live ids");
        println!("  {id:?} at {:?}", entity.bound());
    }
    assert!(nearby.contains(&player));
    assert!(nearby.contains(&crate_a));

    // The wall is still exactly where it was put.
    assert_eq!(tree.entity(wall).expect("wall is live").bound().min_x, 90.0);

    // Entities report which leaves hold them; straddlers list several.
    for id in [player, crate_a, crate_b, wall] {
        let entity = tree.entity(id).expect("live");
        println!("{id:?} owned by {} leaf/leaves", entity.nodes().len());
    }
}
