// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for invalid boundary operations.

use thiserror::Error;

/// Errors raised by mutating operations on a [`Boundary`](crate::Boundary).
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum BoundaryError {
    /// The boundary is marked `STATIC` and must never be repositioned.
    #[error("cannot reposition a static boundary")]
    StaticBoundary,
}
