// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis-aligned boundary value type and its flag bits.

use crate::error::BoundaryError;

bitflags::bitflags! {
    /// Flag bits carried by a [`Boundary`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BoundaryFlags: u8 {
        /// The boundary is immutable. Repositioning it is a caller error.
        ///
        /// The quadtree sets this on every cell bound it creates, and skips
        /// entities carrying it during the per-tick reconcile pass.
        const STATIC = 0b0000_0001;
    }
}

/// Axis-aligned bounding box in 2D with cached extent.
///
/// `width` and `height` are derived from the min/max corners and refreshed on
/// every mutation, so hot paths (subdivision, quadrant math) never recompute
/// them. Assumes finite coordinates with `min <= max`; no NaNs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Boundary {
    /// Minimum x (left).
    pub min_x: f64,
    /// Minimum y (top).
    pub min_y: f64,
    /// Maximum x (right).
    pub max_x: f64,
    /// Maximum y (bottom).
    pub max_y: f64,
    width: f64,
    height: f64,
    flags: BoundaryFlags,
}

impl Boundary {
    /// Create a boundary from min/max corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
            flags: BoundaryFlags::empty(),
        }
    }

    /// Create a boundary from origin and size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
            width,
            height,
            flags: BoundaryFlags::empty(),
        }
    }

    /// Cached width (`max_x - min_x`).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Cached height (`max_y - min_y`).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether `other` fits **strictly** inside this boundary.
    ///
    /// All four edges of `other` must lie strictly inside; a boundary exactly
    /// touching an edge is not contained. This forces edge-straddlers into
    /// multi-leaf membership rather than risking silent edge loss.
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x < other.min_x
            && self.max_x > other.max_x
            && self.min_y < other.min_y
            && self.max_y > other.max_y
    }

    /// Whether `other` overlaps this boundary (open-interval test).
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Move the boundary to a new origin, keeping its size.
    ///
    /// Fails with [`BoundaryError::StaticBoundary`] when the `STATIC` flag is set.
    pub fn reposition(&mut self, x: f64, y: f64) -> Result<(), BoundaryError> {
        let (w, h) = (self.width, self.height);
        self.reposition_sized(x, y, w, h)
    }

    /// Move the boundary to a new origin with a new size.
    ///
    /// Fails with [`BoundaryError::StaticBoundary`] when the `STATIC` flag is set.
    pub fn reposition_sized(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), BoundaryError> {
        if self.is_static() {
            return Err(BoundaryError::StaticBoundary);
        }
        self.min_x = x;
        self.min_y = y;
        self.max_x = x + width;
        self.max_y = y + height;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Overwrite the full rectangle in one call, refreshing the cached extent.
    ///
    /// This is the raw bulk-update escape hatch and does not consult the
    /// `STATIC` flag; prefer [`Self::reposition`] for incremental movement.
    pub fn set_extents(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        self.min_x = min_x;
        self.min_y = min_y;
        self.max_x = max_x;
        self.max_y = max_y;
        self.width = max_x - min_x;
        self.height = max_y - min_y;
    }

    /// Mark the boundary as immutable. Never cleared by this crate.
    pub fn make_static(&mut self) {
        self.flags |= BoundaryFlags::STATIC;
    }

    /// Whether the `STATIC` flag is set.
    pub fn is_static(&self) -> bool {
        self.flags.contains(BoundaryFlags::STATIC)
    }

    /// The boundary's flag bits.
    pub fn flags(&self) -> BoundaryFlags {
        self.flags
    }
}
