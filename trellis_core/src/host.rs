// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for external widget code.
//!
//! The engine owns topology and geometry only. Everything a node *displays*
//! or *does* — widgets, text, input reaction — lives outside, linked through
//! an opaque [`ContentId`](crate::node::ContentId) and driven through the
//! [`NodeHost`] trait once per frame. This keeps the node type concrete:
//! polymorphic behavior is composed in by the host rather than subclassed in.
//!
//! # Frame loop pseudocode
//!
//! A typical host loop wires the pieces together like this:
//!
//! ```rust,ignore
//! fn on_frame(dt: f64) {
//!     // React to a window resize committed by the platform layer.
//!     if let Some((w, h)) = pending_resize.take() {
//!         tree.stage_resolution(w, h);
//!         tree.commit_resolution();
//!     }
//!
//!     let tick = Tick { elapsed_seconds: dt };
//!     tree.update(&mut widgets, tick); // mutate layout inputs
//!     let changes = tree.recalculate(); // drain dirty state, observe events
//!     tree.draw(&mut widgets, tick); // paint from scaled rectangles
//! }
//! ```

use crate::node::{NodeId, NodeTree};

/// Elapsed-time payload handed to the per-frame hooks.
///
/// The engine itself is time-agnostic — it only recomputes geometry, never
/// animates it — so this is passed through to the host untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    /// Seconds elapsed since the previous tick.
    pub elapsed_seconds: f64,
}

/// Receives per-frame callbacks for each visited node.
///
/// Both methods have default no-op implementations, so a host that only
/// draws (or only updates) implements just the one it needs. Visit order and
/// flag gating are documented on [`NodeTree::update`] and [`NodeTree::draw`].
pub trait NodeHost {
    /// Called once per update-enabled node. The tree is mutable: hosts may
    /// change layout inputs or topology mid-pass; such changes take effect
    /// on the next recalculation, and nodes destroyed mid-pass are skipped.
    fn update(&mut self, tree: &mut NodeTree, node: NodeId, tick: Tick) {
        _ = (tree, node, tick);
    }

    /// Called once per draw-enabled node with read access to the tree.
    fn draw(&mut self, tree: &NodeTree, node: NodeId, tick: Tick) {
        _ = (tree, node, tick);
    }
}
