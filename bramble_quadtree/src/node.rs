// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell nodes and the structural maintenance algorithms: subdivision, fan-out
//! insertion, redistribution, intersection search, and collapse.

use alloc::vec::Vec;
use bramble_geom::Boundary;

use crate::tree::QuadTree;
use crate::types::{EntityId, NodeId, NodeLink};

/// One cell of the tree.
///
/// A node is either a leaf (no children, may hold entities) or an interior
/// node with exactly 4 children forming an exact quadrant partition of its
/// bound. Interior nodes never hold entities directly.
#[derive(Clone, Debug)]
pub(crate) struct QuadNode {
    /// The cell bound. Marked static at allocation; never repositioned.
    pub(crate) bound: Boundary,
    pub(crate) link: NodeLink,
    pub(crate) depth: usize,
    /// TL, TR, BL, BR quadrants, or `None` for a leaf.
    pub(crate) children: Option<[NodeId; 4]>,
    /// Entities held by this leaf. References into the tree's registry.
    pub(crate) entities: Vec<EntityId>,
}

impl QuadTree {
    /// Allocate a node slot, reusing freed slots under a bumped generation.
    pub(crate) fn alloc_node(&mut self, mut bound: Boundary, link: NodeLink, depth: usize) -> NodeId {
        bound.make_static();
        let node = QuadNode {
            bound,
            link,
            depth,
            children: None,
            entities: Vec::new(),
        };
        if let Some(idx) = self.node_free.pop() {
            let generation = self.node_generations[idx].saturating_add(1);
            self.node_generations[idx] = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new(idx as u32, generation)
        } else {
            self.nodes.push(Some(node));
            self.node_generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new((self.nodes.len() - 1) as u32, 1)
        }
    }

    pub(crate) fn free_node(&mut self, id: NodeId) {
        self.nodes[id.idx()] = None;
        self.node_free.push(id.idx());
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &QuadNode {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut QuadNode {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    /// Replace a leaf's state with 4 fresh children of equal half extent.
    pub(crate) fn divide(&mut self, id: NodeId) {
        let (bound, depth) = {
            let n = self.node(id);
            (n.bound, n.depth)
        };
        let half_w = bound.width() / 2.0;
        let half_h = bound.height() / 2.0;
        let link = NodeLink::Child(id);
        let depth = depth + 1;

        let tl = Boundary::from_origin_size(bound.min_x, bound.min_y, half_w, half_h);
        let tr = Boundary::from_origin_size(bound.min_x + half_w, bound.min_y, half_w, half_h);
        let bl = Boundary::from_origin_size(bound.min_x, bound.min_y + half_h, half_w, half_h);
        let br = Boundary::from_origin_size(
            bound.min_x + half_w,
            bound.min_y + half_h,
            half_w,
            half_h,
        );

        let children = [
            self.alloc_node(tl, link, depth),
            self.alloc_node(tr, link, depth),
            self.alloc_node(bl, link, depth),
            self.alloc_node(br, link, depth),
        ];
        self.node_mut(id).children = Some(children);
    }

    /// Insert an entity at or below `id`.
    ///
    /// Without `force`, the node must strictly contain the entity's bound;
    /// otherwise the insertion is rejected and `false` is returned. A leaf
    /// takes sole ownership; an interior node first tries each quadrant, then
    /// fans the entity out across every intersecting leaf descendant when no
    /// single quadrant strictly contains it.
    pub(crate) fn node_add(&mut self, id: NodeId, entity: EntityId, force: bool) -> bool {
        let bound = *self.entity_bound(entity);
        if !force && !self.node(id).bound.contains(&bound) {
            return false;
        }

        match self.node(id).children {
            None => {
                self.node_mut(id).entities.push(entity);
                let owners = self.membership_mut(entity);
                owners.clear();
                owners.push(id);
                self.maybe_divide(id);
                true
            }
            Some(children) => {
                for child in children {
                    if self.node_add(child, entity, false) {
                        return true;
                    }
                }
                // Straddles a quadrant split: register in every leaf it touches.
                let mut leaves = Vec::new();
                self.collect_intersections(id, &bound, &mut leaves);
                let owners = self.membership_mut(entity);
                owners.clear();
                owners.extend_from_slice(&leaves);
                for leaf in leaves {
                    self.add_intersecting(leaf, entity);
                }
                true
            }
        }
    }

    /// Append an entity to a leaf already known to intersect it.
    ///
    /// The containment and membership bookkeeping of [`Self::node_add`] is
    /// already done by the caller; only occupancy pressure is handled here.
    pub(crate) fn add_intersecting(&mut self, id: NodeId, entity: EntityId) {
        self.node_mut(id).entities.push(entity);
        self.maybe_divide(id);
    }

    /// Divide when occupancy exceeds capacity and the depth ceiling allows.
    fn maybe_divide(&mut self, id: NodeId) {
        let n = self.node(id);
        if n.depth < self.config.max_depth && n.entities.len() > self.config.capacity {
            self.divide(id);
            self.move_entities_down(id);
        }
    }

    /// Redistribute a just-divided node's entities into its subtree.
    ///
    /// Each entity is force-placed into the single quadrant that strictly
    /// contains it, or fanned out across every intersecting leaf descendant
    /// when none does. The node's own list ends empty; interior nodes never
    /// hold entities directly.
    ///
    /// A divide can run mid-pass, before a moved entity's own reconcile turn,
    /// so an entity here may still own leaves outside this subtree that its
    /// current bound no longer touches. Redistribution reconciles against the
    /// full prior membership: owners the entity left are detached, and an
    /// entity with nothing left to hold it is re-anchored from this node's
    /// ancestry.
    pub(crate) fn move_entities_down(&mut self, id: NodeId) {
        let moved = core::mem::take(&mut self.node_mut(id).entities);
        let children = self
            .node(id)
            .children
            .expect("move_entities_down on an undivided node");

        'entities: for entity in moved {
            let bound = *self.entity_bound(entity);
            for child in children {
                if self.node(child).bound.contains(&bound) {
                    // Strict containment by one quadrant means no other leaf
                    // can intersect: detach every prior owner.
                    let stale = core::mem::take(self.membership_mut(entity));
                    for owner in stale {
                        if owner != id {
                            self.node_remove(owner, entity);
                        }
                    }
                    self.node_add(child, entity, true);
                    continue 'entities;
                }
            }

            // No quadrant holds it alone: swap this node's membership for
            // every intersecting leaf below, keeping prior owners elsewhere
            // that still intersect and detaching the rest.
            let mut leaves = Vec::new();
            self.collect_intersections(id, &bound, &mut leaves);
            let prior = core::mem::take(self.membership_mut(entity));
            let mut owners = leaves.clone();
            for node in prior {
                if node == id {
                    continue;
                }
                if self.node(node).bound.intersects(&bound) {
                    owners.push(node);
                } else {
                    self.node_remove(node, entity);
                }
            }
            *self.membership_mut(entity) = owners;
            for leaf in leaves {
                self.add_intersecting(leaf, entity);
            }

            if self.entity_slot(entity).nodes.is_empty() {
                // The entity left this whole subtree. Re-anchor from here so
                // it lands wherever it now belongs, or on the overflow list;
                // it must not stay tracked with zero owners.
                self.membership_mut(entity).push(id);
                if !self.reresolve(entity) {
                    self.park_out_of_bounds(entity);
                }
            }
        }
    }

    /// Detach an entity from this node's local list only.
    pub(crate) fn node_remove(&mut self, id: NodeId, entity: EntityId) {
        self.node_mut(id).entities.retain(|&e| e != entity);
    }

    /// Every leaf reachable from `start` whose bound intersects `bound`.
    pub(crate) fn all_intersections(&self, start: NodeId, bound: &Boundary) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(start).bound.intersects(bound) {
            self.collect_intersections(start, bound, &mut out);
        }
        out
    }

    /// Recursive worker for [`Self::all_intersections`]. The caller has
    /// already established that `id` intersects `bound`.
    pub(crate) fn collect_intersections(&self, id: NodeId, bound: &Boundary, out: &mut Vec<NodeId>) {
        match self.node(id).children {
            None => out.push(id),
            Some(children) => {
                for child in children {
                    if self.node(child).bound.intersects(bound) {
                        self.collect_intersections(child, bound, out);
                    }
                }
            }
        }
    }

    /// Whether all of a node's children exist and are leaves.
    fn is_penultimate(&self, id: NodeId) -> bool {
        match self.node(id).children {
            None => false,
            Some(children) => children
                .iter()
                .all(|&child| self.node(child).children.is_none()),
        }
    }

    /// Bottom-up structural pass: recurse into children first, then attempt a
    /// collapse, so a node never merges while descendants hold stale state.
    pub(crate) fn structural_update(&mut self, id: NodeId, recalc: &mut Vec<EntityId>) {
        if let Some(children) = self.node(id).children {
            for child in children {
                self.structural_update(child, recalc);
            }
            self.try_collapse(id, recalc);
        }
    }

    /// Merge a penultimate node's children back into it when the deduplicated
    /// union of their entities fits within capacity.
    ///
    /// Single-owner entities are re-adopted directly: sole ownership means the
    /// child strictly contained them, so this node does too. Multi-owner
    /// entities may own leaves outside this subtree; they stand in the
    /// collapsed node for now and are queued for re-resolution after the
    /// structural sweep completes.
    pub(crate) fn try_collapse(&mut self, id: NodeId, recalc: &mut Vec<EntityId>) {
        if !self.is_penultimate(id) {
            return;
        }
        let children = self.node(id).children.expect("penultimate node has children");

        let mut union: Vec<EntityId> = Vec::new();
        for child in children {
            for &entity in &self.node(child).entities {
                if !union.contains(&entity) {
                    union.push(entity);
                }
            }
        }
        if union.len() > self.config.capacity {
            return;
        }

        self.node_mut(id).children = None;
        for child in children {
            self.free_node(child);
        }

        for entity in union {
            let single = {
                let owners = self.membership_mut(entity);
                if owners.len() == 1 {
                    owners.clear();
                    owners.push(id);
                    true
                } else {
                    owners.retain(|n| !children.contains(n));
                    if !owners.contains(&id) {
                        owners.push(id);
                    }
                    false
                }
            };
            self.node_mut(id).entities.push(entity);
            if !single && !recalc.contains(&entity) {
                recalc.push(entity);
            }
        }
    }
}
