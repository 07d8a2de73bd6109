// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree data model.
//!
//! A *node* is an element of the UI tree. Each node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree; the parent link and child lists are kept mutually consistent by
//!   [`attach`](NodeTree::attach), the only topology mutation.
//! - A [`Transform`](crate::transform::Transform) — the layout inputs:
//!   absolute or parent-relative placement, alignment, offset, padding,
//!   min/max clamps, and an optional fixed aspect ratio.
//! - [`NodeFlags`] — `enabled`, `auto_update`, `auto_draw`; these gate the
//!   per-frame traversal only. A disabled subtree is skipped, not detached.
//! - An optional [`ContentId`] linking to an externally owned widget.
//! - **Computed rectangles** produced by recalculation: `unscaled`
//!   (design-resolution units) and `scaled` (live-resolution pixels).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Every layout-affecting setter that actually changes a value marks the
//! LAYOUT channel with eager propagation to the node's relative descendants
//! (see [`dirty`](crate::dirty)). The next recalculation pass — explicit
//! ([`recalculate`](NodeTree::recalculate)), lazy
//! ([`unscaled_rect`](NodeTree::unscaled_rect) /
//! [`scaled_rect`](NodeTree::scaled_rect)), or the frame hooks — drains the
//! channel in parent-before-child order and recomputes each dirty node
//! exactly once.

mod evaluate;
mod frame;
mod id;
mod store;
mod traverse;

pub use evaluate::{LayoutChanges, LinkChange, ParentChange};
pub use id::{ContentId, INVALID, NodeId};
pub use store::{NodeFlags, NodeTree};
pub use traverse::{Children, Descendants};
