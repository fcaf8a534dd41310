// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracked entity: one boundary plus its tree-maintained membership set.

use alloc::vec::Vec;
use bramble_geom::{Boundary, BoundaryError};
use kurbo::Rect;

use crate::types::NodeId;
use crate::util::rect_to_boundary;

/// A mobile AABB tracked by the tree.
///
/// An entity owns exactly one [`Boundary`] and a membership set: the leaf nodes
/// currently holding it. Membership is mutated exclusively by the tree; treat
/// [`Entity::nodes`] as read-only debug output.
///
/// Repositioning an entity touches only its boundary. The tree reconciles
/// membership lazily, once per [`QuadTree::update`](crate::QuadTree::update)
/// tick, so an entity may move many times between ticks without incurring
/// per-move maintenance cost.
#[derive(Clone, Debug)]
pub struct Entity {
    pub(crate) bound: Boundary,
    pub(crate) nodes: Vec<NodeId>,
}

impl Entity {
    /// Create an entity from origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_bound(Boundary::from_origin_size(x, y, width, height))
    }

    /// Create an entity from an existing boundary.
    pub fn from_bound(bound: Boundary) -> Self {
        Self {
            bound,
            nodes: Vec::new(),
        }
    }

    /// Create an entity from a [`kurbo::Rect`].
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_bound(rect_to_boundary(rect))
    }

    /// The entity's boundary.
    pub fn bound(&self) -> &Boundary {
        &self.bound
    }

    /// The leaves currently holding this entity, in no particular order.
    ///
    /// Tree-maintained; for debug display only.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Move the entity, keeping its size.
    ///
    /// Fails fast if the boundary is static. Membership is untouched until the
    /// next tree tick.
    pub fn reposition(&mut self, x: f64, y: f64) -> Result<(), BoundaryError> {
        self.bound.reposition(x, y)
    }

    /// Move and resize the entity. Same rules as [`Self::reposition`].
    pub fn reposition_sized(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), BoundaryError> {
        self.bound.reposition_sized(x, y, width, height)
    }

    /// Mark the entity's boundary static: it is skipped by the tree's
    /// per-tick reconcile pass and can no longer be repositioned.
    pub fn make_static(&mut self) {
        self.bound.make_static();
    }

    /// Whether the entity's boundary is static.
    pub fn is_static(&self) -> bool {
        self.bound.is_static()
    }
}
