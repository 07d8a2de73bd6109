// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layout engine.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! recalculation entry points call. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-node recalculation event
//!   and the corresponding `TraceSink` method.

use kurbo::Size;

/// Emitted when a staged resolution is committed and the scale changed.
#[derive(Clone, Copy, Debug)]
pub struct ScaleCommitEvent {
    /// Live resolution before the commit.
    pub live_old: Size,
    /// Live resolution after the commit.
    pub live_new: Size,
    /// The new `(x, y)` scale factor.
    pub scale: (f64, f64),
}

/// Emitted at the end of every recalculation pass, including passes forced
/// by the lazy rectangle readers and the frame hooks.
#[derive(Clone, Copy, Debug)]
pub struct RecalcPassEvent {
    /// How many nodes were recalculated in this pass.
    pub recalculated: u32,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

/// Receives trace events from the layout engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a resolution commit changes the scale.
    fn on_scale_commit(&mut self, e: &ScaleCommitEvent) {
        _ = e;
    }

    /// Called at the end of a recalculation pass.
    fn on_recalc_pass(&mut self, e: &RecalcPassEvent) {
        _ = e;
    }

    /// Called with the slot indices recalculated in a pass, in cascade order
    /// (requires the `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_recalculated_nodes(&mut self, indices: &[u32]) {
        _ = indices;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ScaleCommitEvent`].
    #[inline]
    pub fn scale_commit(&mut self, e: &ScaleCommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scale_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RecalcPassEvent`].
    #[inline]
    pub fn recalc_pass(&mut self, e: &RecalcPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_recalc_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits the recalculated slot indices (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn recalculated_nodes(&mut self, indices: &[u32]) {
        if let Some(s) = &mut self.sink {
            s.on_recalculated_nodes(indices);
        }
    }
}
