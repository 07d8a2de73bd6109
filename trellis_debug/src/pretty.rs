// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use trellis_core::trace::{RecalcPassEvent, ScaleCommitEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_scale_commit(&mut self, e: &ScaleCommitEvent) {
        let _ = writeln!(
            self.writer,
            "[scale] live={}x{} -> {}x{} scale=({:.4}, {:.4})",
            e.live_old.width,
            e.live_old.height,
            e.live_new.width,
            e.live_new.height,
            e.scale.0,
            e.scale.1,
        );
    }

    fn on_recalc_pass(&mut self, e: &RecalcPassEvent) {
        let topology = if e.topology_changed { "changed" } else { "same" };
        let _ = writeln!(
            self.writer,
            "[recalc] nodes={} topology={topology}",
            e.recalculated,
        );
    }

    fn on_recalculated_nodes(&mut self, indices: &[u32]) {
        let _ = write!(self.writer, "[recalc:nodes]");
        for idx in indices {
            let _ = write!(self.writer, " {idx}");
        }
        let _ = writeln!(self.writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::kurbo::Size;

    #[test]
    fn pretty_print_scale_commit() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_scale_commit(&ScaleCommitEvent {
            live_old: Size::new(1920.0, 1080.0),
            live_new: Size::new(960.0, 540.0),
            scale: (0.5, 0.5),
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[scale]"), "got: {output}");
        assert!(output.contains("scale=(0.5000, 0.5000)"), "got: {output}");
    }

    #[test]
    fn pretty_print_recalc_pass() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_recalc_pass(&RecalcPassEvent {
            recalculated: 3,
            topology_changed: true,
        });
        sink.on_recalculated_nodes(&[0, 2, 5]);
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("nodes=3 topology=changed"), "got: {output}");
        assert!(output.contains("[recalc:nodes] 0 2 5"), "got: {output}");
    }
}
