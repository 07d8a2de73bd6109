// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].

use trellis_core::kurbo::Size;
use trellis_core::trace::{RecalcPassEvent, ScaleCommitEvent, TraceSink};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SCALE_COMMIT: u8 = 1;
const TAG_RECALC_PASS: u8 = 2;
const TAG_RECALC_NODES: u8 = 3;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    fn write_size(&mut self, s: Size) {
        self.write_f64(s.width);
        self.write_f64(s.height);
    }
}

impl TraceSink for RecorderSink {
    fn on_scale_commit(&mut self, e: &ScaleCommitEvent) {
        self.write_u8(TAG_SCALE_COMMIT);
        self.write_size(e.live_old);
        self.write_size(e.live_new);
        self.write_f64(e.scale.0);
        self.write_f64(e.scale.1);
    }

    fn on_recalc_pass(&mut self, e: &RecalcPassEvent) {
        self.write_u8(TAG_RECALC_PASS);
        self.write_u32(e.recalculated);
        self.write_u8(u8::from(e.topology_changed));
    }

    fn on_recalculated_nodes(&mut self, indices: &[u32]) {
        self.write_u8(TAG_RECALC_NODES);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "node count capped at u32::MAX for recording"
        )]
        self.write_u32(indices.len().min(u32::MAX as usize) as u32);
        for &idx in indices.iter().take(u32::MAX as usize) {
            self.write_u32(idx);
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`ScaleCommitEvent`].
    ScaleCommit(ScaleCommitEvent),
    /// A [`RecalcPassEvent`].
    RecalcPass(RecalcPassEvent),
    /// The slot indices recalculated in one pass, in cascade order.
    RecalculatedNodes(Vec<u32>),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        if self.remaining() < 8 {
            return None;
        }
        let bits = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(f64::from_bits(bits))
    }

    fn read_size(&mut self) -> Option<Size> {
        Some(Size::new(self.read_f64()?, self.read_f64()?))
    }

    fn decode_scale_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ScaleCommit(ScaleCommitEvent {
            live_old: self.read_size()?,
            live_new: self.read_size()?,
            scale: (self.read_f64()?, self.read_f64()?),
        }))
    }

    fn decode_recalc_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RecalcPass(RecalcPassEvent {
            recalculated: self.read_u32()?,
            topology_changed: self.read_u8()? != 0,
        }))
    }

    fn decode_recalc_nodes(&mut self) -> Option<RecordedEvent> {
        let count = self.read_u32()?;
        let mut nodes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            nodes.push(self.read_u32()?);
        }
        Some(RecordedEvent::RecalculatedNodes(nodes))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SCALE_COMMIT => self.decode_scale_commit(),
            TAG_RECALC_PASS => self.decode_recalc_pass(),
            TAG_RECALC_NODES => self.decode_recalc_nodes(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_commit() -> ScaleCommitEvent {
        ScaleCommitEvent {
            live_old: Size::new(1920.0, 1080.0),
            live_new: Size::new(2560.0, 1440.0),
            scale: (4.0 / 3.0, 4.0 / 3.0),
        }
    }

    #[test]
    fn round_trip_scale_commit() {
        let mut rec = RecorderSink::new();
        let orig = sample_commit();
        rec.on_scale_commit(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::ScaleCommit(e) => {
                assert_eq!(e.live_old, orig.live_old);
                assert_eq!(e.live_new, orig.live_new);
                assert_eq!(e.scale, orig.scale);
            }
            other => panic!("expected ScaleCommit, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_recalc_pass_and_nodes() {
        let mut rec = RecorderSink::new();
        rec.on_recalc_pass(&RecalcPassEvent {
            recalculated: 3,
            topology_changed: true,
        });
        rec.on_recalculated_nodes(&[0, 2, 5]);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::RecalcPass(e) => {
                assert_eq!(e.recalculated, 3);
                assert!(e.topology_changed);
            }
            other => panic!("expected RecalcPass, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::RecalculatedNodes(nodes) => assert_eq!(nodes, &[0, 2, 5]),
            other => panic!("expected RecalculatedNodes, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_scale_commit(&sample_commit());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 4]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn records_a_live_tree() {
        use trellis_core::kurbo::Vec2;
        use trellis_core::node::{LayoutChanges, NodeTree};
        use trellis_core::trace::Tracer;

        let mut tree = NodeTree::new(Size::new(1000.0, 500.0));
        let root = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(root));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));

        let mut rec = RecorderSink::new();
        let mut changes = LayoutChanges::default();
        tree.recalculate_with(&mut changes, &mut Tracer::new(&mut rec));
        tree.stage_resolution(2000.0, 1000.0);
        tree.commit_resolution_with(&mut Tracer::new(&mut rec));
        tree.recalculate_with(&mut changes, &mut Tracer::new(&mut rec));

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        // Two passes (each with a rich node list) around one scale commit.
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], RecordedEvent::RecalcPass(_)));
        assert!(matches!(events[1], RecordedEvent::RecalculatedNodes(_)));
        assert!(matches!(events[2], RecordedEvent::ScaleCommit(_)));
        assert!(matches!(events[3], RecordedEvent::RecalcPass(_)));
        assert!(matches!(events[4], RecordedEvent::RecalculatedNodes(_)));
    }
}
