// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded trace events.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes a JSON array of
//! event objects to the given writer, one object per recorded event.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON event array.
///
/// Each event becomes one object tagged by an `"event"` field, so the output
/// is easy to filter with `jq` or load into a notebook.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::ScaleCommit(e) => {
                events.push(json!({
                    "event": "scale_commit",
                    "live_old": [e.live_old.width, e.live_old.height],
                    "live_new": [e.live_new.width, e.live_new.height],
                    "scale": [e.scale.0, e.scale.1],
                }));
            }
            RecordedEvent::RecalcPass(e) => {
                events.push(json!({
                    "event": "recalc_pass",
                    "recalculated": e.recalculated,
                    "topology_changed": e.topology_changed,
                }));
            }
            RecordedEvent::RecalculatedNodes(nodes) => {
                events.push(json!({
                    "event": "recalculated_nodes",
                    "nodes": nodes,
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use trellis_core::kurbo::Size;
    use trellis_core::trace::{RecalcPassEvent, ScaleCommitEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_scale_commit(&ScaleCommitEvent {
            live_old: Size::new(1000.0, 500.0),
            live_new: Size::new(2000.0, 1000.0),
            scale: (2.0, 2.0),
        });
        rec.on_recalc_pass(&RecalcPassEvent {
            recalculated: 2,
            topology_changed: false,
        });
        rec.on_recalculated_nodes(&[0, 1]);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["event"], "scale_commit");
        assert_eq!(parsed[0]["scale"][0], 2.0);
        assert_eq!(parsed[1]["event"], "recalc_pass");
        assert_eq!(parsed[1]["recalculated"], 2);
        assert_eq!(parsed[2]["nodes"], json!([0, 1]));
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
