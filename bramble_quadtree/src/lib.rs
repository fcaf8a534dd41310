// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Quadtree: an adaptive quadtree spatial index for mobile 2D entities.
//!
//! The tree partitions a fixed rectangular region into quadrants on demand:
//! a leaf divides when its occupancy exceeds the configured capacity, and an
//! interior node whose children hold few enough entities merges back during
//! [`QuadTree::update`]. Entities are axis-aligned boxes that move between
//! ticks; membership is reconciled lazily, once per tick, rather than on
//! every motion.
//!
//! Two properties distinguish this from textbook quadtrees:
//!
//! - **Multi-leaf membership.** Containment is strict, so an entity sitting on
//!   a quadrant split line belongs to *every* leaf it touches instead of being
//!   pushed up to an interior node. Interior nodes never hold entities, which
//!   keeps queries leaf-granular.
//! - **Out-of-bounds tolerance.** An entity that drifts outside the root is
//!   parked on an overflow list, not dropped, and re-admitted automatically
//!   once it returns.
//!
//! ## API overview
//!
//! - [`QuadTree`]: the container; owns the node arena and the entity registry.
//! - [`Entity`]: an AABB payload with its current leaf memberships.
//! - [`EntityId`] / [`NodeId`]: generational handles; stale ids never alias.
//! - [`QuadTreeConfig`]: leaf capacity and the subdivision depth ceiling.
//! - [`Boundary`]: the underlying AABB type, re-exported from [`bramble_geom`].
//!
//! Key operations: [`QuadTree::add`], [`QuadTree::reposition`],
//! [`QuadTree::update`] (once per tick), [`QuadTree::query`], and
//! [`QuadTree::remove`].
//!
//! ### Minimal usage
//!
//! ```
//! use bramble_quadtree::{Entity, QuadTree};
//!
//! let mut tree = QuadTree::new(0.0, 0.0, 100.0, 100.0);
//! let player = tree.add(Entity::new(10.0, 10.0, 5.0, 5.0)).unwrap();
//! let wall = tree.add(Entity::new(60.0, 60.0, 5.0, 5.0)).unwrap();
//!
//! // Move freely between ticks, then reconcile once.
//! tree.reposition(player, 70.0, 60.0)?;
//! tree.update();
//!
//! // Leaf-granular broad phase: candidates near a probe region.
//! let nearby = tree.query_rect(kurbo::Rect::new(50.0, 50.0, 100.0, 100.0));
//! assert!(nearby.contains(&player));
//! assert!(nearby.contains(&wall));
//! # Ok::<(), bramble_quadtree::BoundaryError>(())
//! ```
//!
//! Query results are candidates, not exact overlaps: an entity is reported
//! when one of its leaves intersects the probe. Run a precise pairwise test
//! on the (small) result set if you need exactness.
//!
//! The tree is single-threaded and `no_std` (with `alloc`). Enable the `std`
//! feature (default) or `libm` for [`kurbo`]'s float math.

#![no_std]

extern crate alloc;

mod entity;
mod node;
mod tree;
mod types;
mod util;

pub use bramble_geom::{Boundary, BoundaryError, BoundaryFlags};
pub use entity::Entity;
pub use tree::QuadTree;
pub use types::{EntityId, NodeId, QuadTreeConfig};
