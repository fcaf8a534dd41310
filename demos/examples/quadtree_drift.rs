// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A drifting swarm over many ticks.
//!
//! Entities wander, some leave the world and come back, and the tree keeps
//! reshaping itself: leaves divide where the swarm bunches up and collapse
//! behind it. One `update` call per tick does all the maintenance.
//!
//! Run:
//! - `cargo run -p bramble_demos --example quadtree_drift`

use bramble_quadtree::{Entity, QuadTree, QuadTreeConfig};

const WORLD: f64 = 512.0;
const TICKS: usize = 120;

fn main() {
    let mut tree = QuadTree::with_config(
        0.0,
        0.0,
        WORLD,
        WORLD,
        QuadTreeConfig {
            capacity: 4,
            max_depth: 6,
        },
    );

    // Start bunched in the top-left corner; everything fits one subtree.
    let mut ids = Vec::new();
    let mut headings = Vec::new();
    for i in 0..32 {
        let x = 10.0 + (i % 8) as f64 * 6.0;
        let y = 10.0 + (i / 8) as f64 * 6.0;
        ids.push(tree.add(Entity::new(x, y, 4.0, 4.0)).expect("in bounds"));
        // Fan the headings out so the swarm disperses.
        headings.push(((i % 8) as f64 - 3.5, (i / 8) as f64 - 1.5));
    }

    for tick in 0..TICKS {
        for (&id, &(dx, dy)) in ids.iter().zip(&headings) {
            let entity = tree.entity(id).expect("swarm ids stay live");
            let bound = entity.bound();
            let (x, y) = (bound.min_x + dx, bound.min_y + dy);
            // reposition accepts coordinates outside the world; the entity
            // just goes out of bounds on the next update.
            tree.reposition(id, x, y).expect("swarm is not static");
        }
        tree.update();

        if tick % 20 == 0 {
            println!(
                "tick {tick:3}: {} in tree, {} out of bounds, {tree:?}",
                tree.len(),
                tree.out_of_bounds().len()
            );
        }
    }

    // Every entity is still registered: in the tree or on the overflow list.
    assert_eq!(tree.len() + tree.out_of_bounds().len(), ids.len());

    // Pull the wanderers back to the center and watch them re-admit.
    for (i, &id) in ids.iter().enumerate() {
        tree.reposition(id, 200.0 + (i as f64) * 2.0, 250.0)
            .expect("swarm is not static");
    }
    tree.update();
    assert!(tree.out_of_bounds().is_empty());
    assert_eq!(tree.len(), ids.len());
    println!("after regroup: {tree:?}");
}
