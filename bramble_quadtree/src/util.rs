// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between Kurbo geometry and the boundary primitive.

use bramble_geom::Boundary;
use kurbo::Rect;

/// Convert a [`Rect`] into a [`Boundary`]. Assumes a non-inverted rect.
pub(crate) fn rect_to_boundary(rect: Rect) -> Boundary {
    Boundary::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

/// Convert a [`Boundary`] into a [`Rect`].
pub(crate) fn boundary_to_rect(bound: &Boundary) -> Rect {
    Rect::new(bound.min_x, bound.min_y, bound.max_x, bound.max_y)
}
