// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode UI node tree with lazy, cascaded layout recalculation.
//!
//! `trellis_core` computes, for a tree of UI nodes, where each node sits on
//! screen in two coordinate spaces: a fixed *design resolution* ("unscaled")
//! and the live back-buffer resolution ("scaled"). Rectangles stay correct as
//! the tree mutates and as the render target is resized, without recomputing
//! more than necessary. It is `no_std` compatible (with `alloc`) and uses
//! struct-of-arrays storage with generational index handles.
//!
//! # Architecture
//!
//! A frame turns caller mutations into incremental layout updates:
//!
//! ```text
//!   setters / attach / commit_resolution
//!       │  (mark dirty, eager propagation to relative descendants)
//!       ▼
//!   NodeTree::recalculate() ──► LayoutChanges ──► host reacts
//!       ▲
//!       │  also forced lazily by unscaled_rect() / scaled_rect()
//!       │  and by the update()/draw() frame passes
//! ```
//!
//! **[`node`]** — Struct-of-arrays node tree with generational handles.
//! Topology, flag, and transform inputs are set by the caller; unscaled and
//! scaled rectangles are computed by the recalculation pass.
//!
//! **[`transform`]** — The per-node positioning component: absolute or
//! parent-relative placement with alignment, padding, offset, min/max
//! clamping, and an optional fixed aspect ratio.
//!
//! **[`scale`]** — The screen-scale provider: fixed design resolution, live
//! resolution, and a two-phase (stage/apply) resolution commit.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! LAYOUT propagates from a node to its relative descendants; CONTENT is
//! local-only; TOPOLOGY triggers a traversal rebuild.
//!
//! **[`host`]** — The [`NodeHost`](host::NodeHost) trait that external
//! widget code implements to receive per-frame update/draw callbacks.
//!
//! **[`geometry`]** — Alignment flags, fractional padding, and the pure
//! rectangle helpers the resolver is built from.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! layout instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   recalculation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

// Geometry types in the public API come from kurbo; re-exported so
// downstream crates don't need to pin a matching version themselves.
pub use kurbo;

pub mod dirty;
pub mod geometry;
pub mod host;
pub mod node;
pub mod scale;
pub mod trace;
pub mod transform;
