// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Trellis uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! propagate layout invalidation through the node tree. Each channel is an
//! independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`LAYOUT`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges
//!   from relative child to parent. Marking a node dirty automatically marks
//!   its relative descendants, because a relative rectangle is a function of
//!   its parent's rectangle. Absolute nodes hold no edge: a parent
//!   recalculation never invalidates them, only a direct mutation or a
//!   resolution commit does.
//!
//! - **Local-only** — [`CONTENT`] is marked with the default policy. Only
//!   the explicitly marked node appears in the drain output, since the
//!   content handle is a per-node property the layout never reads.
//!
//! - **Structural** — [`TOPOLOGY`] is marked on topology mutations
//!   (attach/detach, create/destroy). It triggers a traversal-order rebuild
//!   during the next recalculation pass but does not propagate.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`NodeTree::recalculate`](crate::node::NodeTree::recalculate) call drains
//! all channels and surfaces the results as
//! [`LayoutChanges`](crate::node::LayoutChanges). The lazy readers
//! [`unscaled_rect`](crate::node::NodeTree::unscaled_rect) and
//! [`scaled_rect`](crate::node::NodeTree::scaled_rect) force the same drain
//! before returning.

use understory_dirty::Channel;

/// Layout input changed — requires unscaled and scaled rectangle
/// recomputation, propagating to relative descendants.
pub const LAYOUT: Channel = Channel::new(0);

/// Content handle changed — no propagation needed.
pub const CONTENT: Channel = Channel::new(1);

/// Tree topology changed — triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(2);
