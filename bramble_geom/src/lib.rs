// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Geom: the axis-aligned boundary primitive used by the bramble quadtree.
//!
//! - [`Boundary`]: an AABB value type with cached width/height and a `STATIC` flag.
//! - [`Boundary::contains`] is deliberately **strict**: a boundary touching an edge
//!   is not contained. The quadtree relies on this to push edge-straddling entities
//!   into multi-leaf membership instead of silently losing them to one cell.
//! - [`Boundary::intersects`] is a standard open-interval overlap test.
//!
//! Repositioning a boundary whose `STATIC` flag is set is a caller error and fails
//! fast with [`BoundaryError::StaticBoundary`]. The predicates themselves are total
//! and never fail.
//!
//! # Example
//!
//! ```rust
//! use bramble_geom::Boundary;
//!
//! let cell = Boundary::from_origin_size(0.0, 0.0, 50.0, 50.0);
//! let inner = Boundary::from_origin_size(10.0, 10.0, 5.0, 5.0);
//! let touching = Boundary::from_origin_size(45.0, 10.0, 5.0, 5.0);
//!
//! assert!(cell.contains(&inner));
//! // Touching the right edge is not strict containment...
//! assert!(!cell.contains(&touching));
//! // ...but it still intersects.
//! assert!(cell.intersects(&touching));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod boundary;
mod error;

pub use boundary::{Boundary, BoundaryFlags};
pub use error::BoundaryError;
