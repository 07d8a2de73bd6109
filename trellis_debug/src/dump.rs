// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented tree snapshots.
//!
//! [`dump_tree`] renders a [`NodeTree`]'s topology and cached geometry as an
//! indented, one-line-per-node string. Geometry is read from the caches, so
//! recalculate first if you want fresh values.

use std::fmt::Write as _;

use trellis_core::kurbo::Rect;
use trellis_core::node::{NodeId, NodeTree};
use trellis_core::transform::Mode;

/// Renders the whole tree, one root after another, in slot order.
#[must_use]
pub fn dump_tree(tree: &NodeTree) -> String {
    let mut out = String::new();
    for root in tree.roots() {
        dump_node(tree, root, 0, &mut out);
    }
    out
}

fn dump_node(tree: &NodeTree, id: NodeId, depth: usize, out: &mut String) {
    let mode = match tree.mode(id) {
        Mode::Absolute => "absolute",
        Mode::Relative => "relative",
    };
    let _ = write!(out, "{:indent$}{id:?} {mode}", "", indent = depth * 2);
    if let Some(content) = tree.content(id) {
        let _ = write!(out, " {content:?}");
    }
    let _ = writeln!(
        out,
        " unscaled={} scaled={}",
        fmt_rect(tree.unscaled_rect_at(id.index())),
        fmt_rect(tree.scaled_rect_at(id.index())),
    );
    for child in tree.children(id) {
        dump_node(tree, child, depth + 1, out);
    }
}

fn fmt_rect(r: Rect) -> String {
    format!("({}, {})+({}x{})", r.x0, r.y0, r.width(), r.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::kurbo::{Size, Vec2};
    use trellis_core::node::ContentId;

    #[test]
    fn dump_shows_topology_and_geometry() {
        let mut tree = NodeTree::new(Size::new(1000.0, 500.0));
        let root = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(root));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));
        tree.set_content(child, Some(ContentId(7)));
        let _ = tree.recalculate();

        let dump = dump_tree(&tree);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("absolute"), "got: {dump}");
        assert!(lines[0].contains("unscaled=(0, 0)+(1000x500)"), "got: {dump}");
        assert!(lines[1].starts_with("  "), "got: {dump}");
        assert!(lines[1].contains("relative"), "got: {dump}");
        assert!(lines[1].contains("ContentId(7)"), "got: {dump}");
        assert!(lines[1].contains("(500x250)"), "got: {dump}");
    }

    #[test]
    fn dump_of_empty_tree_is_empty() {
        let tree = NodeTree::new(Size::new(100.0, 100.0));
        assert!(dump_tree(&tree).is_empty());
    }
}
