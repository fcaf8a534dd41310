// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree orchestrator: entity registry, overflow list, per-tick update, and
//! the public add/remove/query surface.

use alloc::vec::Vec;
use bramble_geom::{Boundary, BoundaryError};
use kurbo::Rect;

use crate::entity::Entity;
use crate::node::QuadNode;
use crate::types::{EntityId, NodeId, NodeLink, QuadTreeConfig};
use crate::util::{boundary_to_rect, rect_to_boundary};

/// Adaptive quadtree over mobile AABB entities.
///
/// The tree owns a node arena and the canonical entity registry; nodes hold
/// only [`EntityId`]s into the registry, entities hold only [`NodeId`]s into
/// the arena. Entities that no node (root included) can hold sit on an
/// overflow list and are retried on every [`QuadTree::update`] tick.
///
/// Single-threaded by design: every mutation assumes exclusive access for the
/// duration of one call, and one `update()` is one atomic logical pass.
pub struct QuadTree {
    pub(crate) nodes: Vec<Option<QuadNode>>,
    /// Last generation per node slot; persists across frees.
    pub(crate) node_generations: Vec<u32>,
    pub(crate) node_free: Vec<usize>,
    root: NodeId,
    entries: Vec<Option<Entity>>,
    /// Last generation per registry slot; persists across frees.
    entry_generations: Vec<u32>,
    entry_free: Vec<usize>,
    /// Entities with live membership, in insertion order.
    tracked: Vec<EntityId>,
    /// Entities currently outside every node, retried each tick.
    out_of_bounds: Vec<EntityId>,
    pub(crate) config: QuadTreeConfig,
}

impl core::fmt::Debug for QuadTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let nodes_total = self.nodes.len();
        let nodes_alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("QuadTree")
            .field("bound", &self.node(self.root).bound)
            .field("capacity", &self.config.capacity)
            .field("max_depth", &self.config.max_depth)
            .field("nodes_alive", &nodes_alive)
            .field("nodes_total", &nodes_total)
            .field("tracked", &self.tracked.len())
            .field("out_of_bounds", &self.out_of_bounds.len())
            .finish_non_exhaustive()
    }
}

impl QuadTree {
    /// Create a tree over the given region with the default configuration.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::with_config(x, y, width, height, QuadTreeConfig::default())
    }

    /// Create a tree over the given region with an explicit configuration.
    pub fn with_config(x: f64, y: f64, width: f64, height: f64, config: QuadTreeConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            node_generations: Vec::new(),
            node_free: Vec::new(),
            root: NodeId::new(0, 0),
            entries: Vec::new(),
            entry_generations: Vec::new(),
            entry_free: Vec::new(),
            tracked: Vec::new(),
            out_of_bounds: Vec::new(),
            config,
        };
        tree.root = tree.alloc_node(
            Boundary::from_origin_size(x, y, width, height),
            NodeLink::Root,
            0,
        );
        tree
    }

    /// Create a tree over a [`kurbo::Rect`].
    pub fn from_rect(rect: Rect, config: QuadTreeConfig) -> Self {
        Self::with_config(rect.x0, rect.y0, rect.width(), rect.height(), config)
    }

    /// Register an entity.
    ///
    /// The root must strictly contain the entity's bound; otherwise the entity
    /// is handed back unchanged. Rejection is the defined out-of-bounds
    /// outcome, not an error.
    pub fn add(&mut self, entity: Entity) -> Result<EntityId, Entity> {
        if !self.node(self.root).bound.contains(entity.bound()) {
            return Err(entity);
        }
        let id = self.alloc_entity(entity);
        let placed = self.node_add(self.root, id, false);
        debug_assert!(placed, "root containment was checked before allocation");
        self.tracked.push(id);
        Ok(id)
    }

    /// Bulk insert. Equivalent to calling [`Self::add`] once per entity, in
    /// order; the result vector mirrors the input order.
    pub fn load<I>(&mut self, entities: I) -> Vec<Result<EntityId, Entity>>
    where
        I: IntoIterator<Item = Entity>,
    {
        entities.into_iter().map(|e| self.add(e)).collect()
    }

    /// Deregister an entity and hand it back to the caller.
    ///
    /// Detaches it from every owning node and from whichever of the active and
    /// overflow lists holds it. Returns `None` for a stale id.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        if !self.entity_is_alive(id) {
            return None;
        }
        let owners = core::mem::take(self.membership_mut(id));
        for node in owners {
            self.node_remove(node, id);
        }
        self.tracked.retain(|&e| e != id);
        self.out_of_bounds.retain(|&e| e != id);
        let entity = self.entries[id.idx()].take();
        self.entry_free.push(id.idx());
        entity
    }

    /// Move an entity, keeping its size. No-op for a stale id.
    ///
    /// Only the boundary changes here; membership is reconciled by the next
    /// [`Self::update`] call.
    pub fn reposition(&mut self, id: EntityId, x: f64, y: f64) -> Result<(), BoundaryError> {
        match self.entity_opt_mut(id) {
            Some(entity) => entity.bound.reposition(x, y),
            None => Ok(()),
        }
    }

    /// Move and resize an entity. Same rules as [`Self::reposition`].
    pub fn reposition_sized(
        &mut self,
        id: EntityId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), BoundaryError> {
        match self.entity_opt_mut(id) {
            Some(entity) => entity.bound.reposition_sized(x, y, width, height),
            None => Ok(()),
        }
    }

    /// Reconcile moved entities and re-balance structure. Call once per tick.
    ///
    /// In order: re-admit overflow entities, reconcile the membership of every
    /// tracked non-static entity, then run the bottom-up structural pass.
    /// Entities displaced by a collapse are re-resolved only after the sweep
    /// completes, never mid-traversal.
    pub fn update(&mut self) {
        // 1. Retry everything that fell off the map on an earlier tick.
        let overflow = core::mem::take(&mut self.out_of_bounds);
        for entity in overflow {
            if self.node_add(self.root, entity, false) {
                self.tracked.push(entity);
            } else {
                self.out_of_bounds.push(entity);
            }
        }

        // 2. Reconcile moved entities.
        let snapshot = self.tracked.clone();
        for entity in snapshot {
            // A divide earlier in this pass may already have parked it.
            if !self.tracked.contains(&entity) {
                continue;
            }
            let bound = *self.entity_bound(entity);
            if bound.is_static() {
                continue;
            }
            let owners = self.entity_slot(entity).nodes.clone();

            if owners.len() == 1 {
                // Sole ownership means full containment; if that still holds,
                // nothing to do.
                if self.node(owners[0]).bound.contains(&bound) {
                    continue;
                }
                self.node_remove(owners[0], entity);
            } else {
                // Drop the leaves the entity left. If one remaining owner now
                // strictly contains it, no other leaf can intersect it.
                let mut container = None;
                for &node in &owners {
                    if container.is_none() && self.node(node).bound.intersects(&bound) {
                        if self.node(node).bound.contains(&bound) {
                            container = Some(node);
                        }
                    } else {
                        self.node_remove(node, entity);
                    }
                }
                if let Some(container) = container {
                    let membership = self.membership_mut(entity);
                    membership.clear();
                    membership.push(container);
                    continue;
                }
            }

            // The old owners, even ones the entity left, anchor the upward
            // walk towards an ancestor that can hold it.
            if self.reresolve(entity) {
                continue;
            }

            // Nothing, root included, can hold it: over to the overflow list.
            self.park_out_of_bounds(entity);
        }

        // 3. Bottom-up structural pass, then the deferred re-resolutions.
        let mut recalc = Vec::new();
        self.structural_update(self.root, &mut recalc);
        for entity in recalc {
            if !self.reresolve(entity) {
                self.park_out_of_bounds(entity);
            }
        }
    }

    /// Detach an entity from every owner and move it to the overflow list.
    pub(crate) fn park_out_of_bounds(&mut self, entity: EntityId) {
        let stale = core::mem::take(self.membership_mut(entity));
        for node in stale {
            self.node_remove(node, entity);
        }
        self.tracked.retain(|&e| e != entity);
        if !self.out_of_bounds.contains(&entity) {
            self.out_of_bounds.push(entity);
        }
    }

    /// Recompute an entity's membership from the closest ancestor able to
    /// hold it. Returns `false` when no ancestor (root included) can.
    ///
    /// Walks upward from the shallowest current owner until an ancestor
    /// strictly contains the bound; failing that, falls back to the root if it
    /// at least intersects. Membership becomes exactly the intersecting leaves
    /// under that anchor.
    pub(crate) fn reresolve(&mut self, entity: EntityId) -> bool {
        let bound = *self.entity_bound(entity);
        let mut owners = self.entity_slot(entity).nodes.clone();
        if owners.is_empty() {
            return false;
        }
        owners.sort_unstable_by_key(|&n| self.node(n).depth);

        let mut cursor = owners[0];
        let mut anchor = None;
        loop {
            match self.node(cursor).link {
                NodeLink::Child(parent) => {
                    cursor = parent;
                    if self.node(cursor).bound.contains(&bound) {
                        anchor = Some(cursor);
                        break;
                    }
                }
                NodeLink::Root => break,
            }
        }
        let anchor = match anchor {
            Some(anchor) => anchor,
            None if self.node(self.root).bound.intersects(&bound) => self.root,
            None => return false,
        };

        let new_owners = self.all_intersections(anchor, &bound);
        for &node in &owners {
            if !new_owners.contains(&node) {
                self.node_remove(node, entity);
            }
        }
        self.entity_slot_mut(entity).nodes = new_owners.clone();
        for node in new_owners {
            if !self.node(node).entities.contains(&entity) {
                self.add_intersecting(node, entity);
            }
        }
        true
    }

    /// The deduplicated entities of every leaf intersecting `bound`.
    ///
    /// Leaf-level membership: an entity is reported when any of its leaves
    /// intersects the probe, in first-encounter order.
    pub fn query(&self, bound: &Boundary) -> Vec<EntityId> {
        let leaves = self.all_intersections(self.root, bound);
        let mut seen = alloc::vec![false; self.entries.len()];
        let mut out = Vec::new();
        for leaf in leaves {
            for &entity in &self.node(leaf).entities {
                if !seen[entity.idx()] {
                    seen[entity.idx()] = true;
                    out.push(entity);
                }
            }
        }
        out
    }

    /// [`Self::query`] over a [`kurbo::Rect`].
    pub fn query_rect(&self, rect: Rect) -> Vec<EntityId> {
        self.query(&rect_to_boundary(rect))
    }

    /// Discard the entire tree and start over with a fresh root at the
    /// original bound.
    ///
    /// Every previously issued [`NodeId`] and [`EntityId`] goes stale. Slot
    /// generations survive the clear, so stale ids never alias anything
    /// allocated afterwards.
    pub fn clear(&mut self) {
        let bound = self.node(self.root).bound;
        for (idx, slot) in self.nodes.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.node_free.push(idx);
            }
        }
        for (idx, slot) in self.entries.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.entry_free.push(idx);
            }
        }
        self.tracked.clear();
        self.out_of_bounds.clear();
        self.root = self.alloc_node(bound, NodeLink::Root, 0);
    }

    // --- read-only surface (renderers, game logic) ---

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The tree's overall bound.
    pub fn bound(&self) -> &Boundary {
        &self.node(self.root).bound
    }

    /// The tree's configuration.
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Whether `id` refers to a live node (slot occupied, generation matches).
    pub fn node_is_alive(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.idx()), Some(Some(_))) && self.node_generations[id.idx()] == id.1
    }

    /// A node's bound, or `None` for a stale id.
    pub fn node_bound(&self, id: NodeId) -> Option<&Boundary> {
        self.node_opt(id).map(|n| &n.bound)
    }

    /// A node's four children in TL, TR, BL, BR order, or `None` for a leaf
    /// or a stale id.
    pub fn node_children(&self, id: NodeId) -> Option<[NodeId; 4]> {
        self.node_opt(id).and_then(|n| n.children)
    }

    /// A node's depth (root is 0), or `None` for a stale id.
    pub fn node_depth(&self, id: NodeId) -> Option<usize> {
        self.node_opt(id).map(|n| n.depth)
    }

    /// The entities held by a leaf, or `None` for a stale id. Interior nodes
    /// report an empty slice.
    pub fn node_entities(&self, id: NodeId) -> Option<&[EntityId]> {
        self.node_opt(id).map(|n| n.entities.as_slice())
    }

    /// A node's bound as a [`kurbo::Rect`], or `None` for a stale id.
    pub fn node_rect(&self, id: NodeId) -> Option<Rect> {
        self.node_bound(id).map(boundary_to_rect)
    }

    /// Whether `id` refers to a live entity.
    pub fn entity_is_alive(&self, id: EntityId) -> bool {
        matches!(self.entries.get(id.idx()), Some(Some(_)))
            && self.entry_generations[id.idx()] == id.1
    }

    /// Read access to an entity, or `None` for a stale id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        if !self.entity_is_alive(id) {
            return None;
        }
        self.entries[id.idx()].as_ref()
    }

    /// The tracked entities, in insertion order. Excludes the overflow list.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.tracked.iter().copied()
    }

    /// The entities currently outside the tree, retried every tick.
    pub fn out_of_bounds(&self) -> &[EntityId] {
        &self.out_of_bounds
    }

    /// Number of tracked (in-bounds) entities.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Whether no entity is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    // --- internals ---

    fn alloc_entity(&mut self, entity: Entity) -> EntityId {
        if let Some(idx) = self.entry_free.pop() {
            let generation = self.entry_generations[idx].saturating_add(1);
            self.entry_generations[idx] = generation;
            self.entries[idx] = Some(entity);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntityId uses 32-bit indices by design."
            )]
            EntityId::new(idx as u32, generation)
        } else {
            self.entries.push(Some(entity));
            self.entry_generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntityId uses 32-bit indices by design."
            )]
            EntityId::new((self.entries.len() - 1) as u32, 1)
        }
    }

    /// Access an entity; panics if `id` is stale.
    pub(crate) fn entity_slot(&self, id: EntityId) -> &Entity {
        self.entries[id.idx()].as_ref().expect("dangling EntityId")
    }

    /// Access an entity mutably; panics if `id` is stale.
    pub(crate) fn entity_slot_mut(&mut self, id: EntityId) -> &mut Entity {
        self.entries[id.idx()].as_mut().expect("dangling EntityId")
    }

    /// The entity's bound; panics if `id` is stale.
    pub(crate) fn entity_bound(&self, id: EntityId) -> &Boundary {
        &self.entity_slot(id).bound
    }

    /// The entity's membership set; panics if `id` is stale.
    pub(crate) fn membership_mut(&mut self, id: EntityId) -> &mut Vec<NodeId> {
        &mut self.entity_slot_mut(id).nodes
    }

    fn node_opt(&self, id: NodeId) -> Option<&QuadNode> {
        if !self.node_is_alive(id) {
            return None;
        }
        self.nodes[id.idx()].as_ref()
    }

    fn entity_opt_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if !self.entity_is_alive(id) {
            return None;
        }
        self.entries[id.idx()].as_mut()
    }
}
