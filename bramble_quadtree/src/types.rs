// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: node and entity identifiers, tree configuration.

/// Identifier for a cell node in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - Nodes are created by subdivision (and once at tree construction for the root).
/// - When a collapse destroys a node, its slot is freed; any existing `NodeId`
///   that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new,
///   distinct `NodeId`. Stale ids never alias a different live node.
///
/// Use [`QuadTree::node_is_alive`](crate::QuadTree::node_is_alive) to check
/// whether a `NodeId` still refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for an entity in the tree's registry.
///
/// Same generational scheme as [`NodeId`]: slot index plus generation, with slots
/// reused after [`QuadTree::remove`](crate::QuadTree::remove) under a bumped
/// generation. Check liveness with
/// [`QuadTree::entity_is_alive`](crate::QuadTree::entity_is_alive).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntityId(pub(crate) u32, pub(crate) u32);

impl EntityId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A node's place in the hierarchy, decided once at construction.
///
/// There is no runtime "is this the root" inference anywhere: a node either is
/// the root or it carries its parent's id.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeLink {
    /// The tree's root node.
    Root,
    /// A quadrant created by subdivision, with its parent's id.
    Child(NodeId),
}

/// Tuning knobs for the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuadTreeConfig {
    /// Maximum entity count a leaf may hold before it attempts to divide.
    ///
    /// Leaves at `max_depth` may exceed this freely.
    pub capacity: usize,
    /// Hard ceiling on subdivision depth (root is depth 0).
    pub max_depth: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            max_depth: 5,
        }
    }
}
