// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout recalculation: draining dirty state into fresh rectangles and a
//! batch of change notifications.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::dirty;
use crate::geometry::scale_rect;
use crate::trace::{RecalcPassEvent, Tracer};
use crate::transform::Mode;

use super::id::{INVALID, NodeId};
use super::store::NodeTree;

/// A node's parent link changed.
///
/// Indices are raw slots ([`INVALID`] means "no parent"), since the node may
/// have been destroyed by the time the batch is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentChange {
    /// The node that moved.
    pub node: u32,
    /// Its previous parent, or [`INVALID`].
    pub old_parent: u32,
    /// Its new parent, or [`INVALID`].
    pub new_parent: u32,
}

/// A parent gained or lost a direct child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkChange {
    /// The parent side of the link.
    pub parent: u32,
    /// The child side of the link.
    pub child: u32,
}

/// Everything that changed since the previous recalculation pass.
///
/// Notifications are queued at mutation time and delivered as one batch by
/// the next [`NodeTree::recalculate`] call; the lazy rectangle readers flush
/// geometry without consuming the batch. All indices are raw slots — look
/// rectangles up with the `*_at` accessors, and treat indices in `removed`
/// as history only.
#[derive(Debug, Default)]
pub struct LayoutChanges {
    /// Slots whose rectangles were recomputed this pass, in cascade order
    /// (every parent before any of its recalculated children). Each affected
    /// slot appears exactly once per pass, no matter how many of its inputs
    /// changed.
    pub recalculated: Vec<u32>,
    /// Reparent notifications, in mutation order.
    pub parent_changed: Vec<ParentChange>,
    /// Links gained since the last pass.
    pub child_added: Vec<LinkChange>,
    /// Links lost since the last pass.
    pub child_removed: Vec<LinkChange>,
    /// Slots of nodes created since the last pass.
    pub added: Vec<u32>,
    /// Slots of nodes destroyed since the last pass.
    pub removed: Vec<u32>,
    /// Slots whose content handle changed since the last pass.
    pub content: Vec<u32>,
    /// Whether the traversal order was rebuilt this pass.
    pub topology_changed: bool,
}

impl LayoutChanges {
    /// Clears all entries for reuse.
    pub fn clear(&mut self) {
        self.recalculated.clear();
        self.parent_changed.clear();
        self.child_added.clear();
        self.child_removed.clear();
        self.added.clear();
        self.removed.clear();
        self.content.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recalculated.is_empty()
            && self.parent_changed.is_empty()
            && self.child_added.is_empty()
            && self.child_removed.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.content.is_empty()
            && !self.topology_changed
    }
}

impl NodeTree {
    /// Recalculates all dirty rectangles and returns the accumulated change
    /// batch.
    ///
    /// This is the explicit per-frame entry point; the lazy readers and the
    /// frame hooks flush geometry through the same path. Clean trees return
    /// an empty batch at no cost beyond the drain check.
    pub fn recalculate(&mut self) -> LayoutChanges {
        let mut changes = LayoutChanges::default();
        self.recalculate_into(&mut changes);
        changes
    }

    /// Like [`recalculate`](Self::recalculate), reusing an existing batch's
    /// allocations. The batch is cleared first.
    pub fn recalculate_into(&mut self, changes: &mut LayoutChanges) {
        self.recalculate_with(changes, &mut Tracer::none());
    }

    /// Like [`recalculate_into`](Self::recalculate_into), with tracing.
    pub fn recalculate_with(&mut self, changes: &mut LayoutChanges, tracer: &mut Tracer<'_>) {
        changes.clear();
        self.flush_layout();
        // Hand the accumulated batch to the caller and keep the (cleared)
        // buffers for the next round.
        core::mem::swap(&mut self.pending, changes);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "slot indices are u32, so a pass can never exceed u32::MAX nodes"
        )]
        tracer.recalc_pass(&RecalcPassEvent {
            recalculated: changes.recalculated.len() as u32,
            topology_changed: changes.topology_changed,
        });
        #[cfg(feature = "trace-rich")]
        tracer.recalculated_nodes(&changes.recalculated);
    }

    /// Returns the node's rectangle in design-resolution units, recomputing
    /// any stale geometry first.
    ///
    /// Queued change notifications are *not* consumed; they stay pending for
    /// the next [`recalculate`](Self::recalculate).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn unscaled_rect(&mut self, id: NodeId) -> Rect {
        self.validate(id);
        self.flush_layout();
        self.unscaled[id.idx as usize]
    }

    /// Returns the node's rectangle in live-resolution pixels, recomputing
    /// any stale geometry first. Coordinates and extents are truncated
    /// toward zero.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn scaled_rect(&mut self, id: NodeId) -> Rect {
        self.validate(id);
        self.flush_layout();
        self.scaled[id.idx as usize]
    }

    /// Brings every cached rectangle up to date, accumulating into the
    /// pending batch.
    ///
    /// The LAYOUT drain visits affected slots in dependency order, so a
    /// parent's fresh rectangle is always in place before a relative child
    /// reads it.
    pub(crate) fn flush_layout(&mut self) {
        if self.traversal_dirty {
            self.rebuild_traversal_order();
            self.traversal_dirty = false;
            self.pending.topology_changed = true;
        }

        let order: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in order {
            // Slots destroyed after being marked are stale entries.
            if !self.alive[idx as usize] {
                continue;
            }
            self.recompute_rect(idx);
            self.pending.recalculated.push(idx);
        }

        let content: Vec<u32> = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();
        for idx in content {
            if self.alive[idx as usize] {
                self.pending.content.push(idx);
            }
        }

        // TOPOLOGY marks only exist to force the traversal rebuild above;
        // consume them.
        let _ = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .count();
    }

    /// Recomputes both cached rectangles of one slot from its transform and
    /// (for relative nodes) its parent's already-fresh unscaled rectangle.
    fn recompute_rect(&mut self, idx: u32) {
        let t = &self.transform[idx as usize];
        let parent = self.parent[idx as usize];
        let parent_ctx = if t.mode == Mode::Relative && parent != INVALID {
            Some((
                self.unscaled[parent as usize],
                self.transform[parent as usize].padding,
            ))
        } else {
            None
        };
        let rect = t.resolve(parent_ctx);
        self.unscaled[idx as usize] = rect;
        let (sx, sy) = self.screen.scale();
        self.scaled[idx as usize] = scale_rect(rect, sx, sy);
    }

    /// Rebuilds the cached depth-first preorder over all roots.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        let mut stack: Vec<u32> = Vec::new();
        for root in 0..self.len {
            if self.parent[root as usize] != INVALID || !self.alive[root as usize] {
                continue;
            }
            stack.push(root);
            while let Some(idx) = stack.pop() {
                self.traversal_order.push(idx);
                // Push children in reverse so the first child pops first.
                let mark = stack.len();
                let mut child = self.first_child[idx as usize];
                while child != INVALID {
                    stack.push(child);
                    child = self.next_sibling[child as usize];
                }
                stack[mark..].reverse();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Rect, Size, Vec2};

    use crate::geometry::{Alignment, Padding};
    use crate::node::NodeTree;
    use crate::transform::Mode;

    fn tree() -> NodeTree {
        NodeTree::new(Size::new(1000.0, 500.0))
    }

    #[test]
    fn fresh_node_is_reported_and_sized_to_design() {
        let mut tree = tree();
        let id = tree.create_node();

        let changes = tree.recalculate();
        assert_eq!(changes.added, vec![id.idx]);
        assert_eq!(changes.recalculated, vec![id.idx]);
        assert!(changes.topology_changed);
        assert_eq!(
            tree.unscaled_rect(id),
            Rect::new(0.0, 0.0, 1000.0, 500.0)
        );
    }

    #[test]
    fn clean_tree_produces_an_empty_batch() {
        let mut tree = tree();
        let id = tree.create_node();
        let _ = tree.recalculate();
        let _ = id;

        let changes = tree.recalculate();
        assert!(changes.is_empty());
    }

    #[test]
    fn relative_child_follows_parent_content_rect() {
        let mut tree = tree();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(parent));
        tree.set_absolute_location(parent, Point::new(100.0, 100.0));
        tree.set_absolute_size(parent, Size::new(400.0, 200.0));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));

        assert_eq!(
            tree.unscaled_rect(child),
            Rect::new(100.0, 100.0, 300.0, 200.0)
        );
    }

    #[test]
    fn parent_resize_cascades_in_parent_first_order() {
        let mut tree = tree();
        let root = tree.create_node();
        let mid = tree.create_node();
        let leaf = tree.create_node();
        tree.attach(mid, Some(root));
        tree.attach(leaf, Some(mid));
        let _ = tree.recalculate();

        tree.set_absolute_size(root, Size::new(600.0, 300.0));
        let changes = tree.recalculate();

        let pos = |idx: u32| {
            changes
                .recalculated
                .iter()
                .position(|&i| i == idx)
                .unwrap()
        };
        assert_eq!(changes.recalculated.len(), 3);
        assert!(pos(root.idx) < pos(mid.idx));
        assert!(pos(mid.idx) < pos(leaf.idx));
        assert_eq!(
            tree.unscaled_rect(leaf),
            Rect::new(0.0, 0.0, 600.0, 300.0)
        );
    }

    #[test]
    fn each_node_recalculates_once_per_pass() {
        let mut tree = tree();
        let root = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(root));
        let _ = tree.recalculate();

        // Several inputs of the same nodes change before one pass.
        tree.set_absolute_size(root, Size::new(800.0, 400.0));
        tree.set_padding(root, Padding::new(0.1, 0.1, 0.1, 0.1));
        tree.set_relative_size(child, Vec2::new(0.5, 1.0));
        tree.set_alignment(child, Alignment::CENTER);

        let changes = tree.recalculate();
        assert_eq!(changes.recalculated.len(), 2);
    }

    #[test]
    fn sibling_subtrees_stay_clean() {
        let mut tree = tree();
        let root = tree.create_node();
        let a = tree.create_node();
        let b = tree.create_node();
        tree.attach(a, Some(root));
        tree.attach(b, Some(root));
        let _ = tree.recalculate();

        tree.set_relative_size(a, Vec2::new(0.5, 0.5));
        let changes = tree.recalculate();
        assert_eq!(changes.recalculated, vec![a.idx]);
    }

    #[test]
    fn padding_and_ignore_parent_padding() {
        let mut tree = tree();
        let parent = tree.create_node();
        let inner = tree.create_node();
        let outer = tree.create_node();
        tree.attach(inner, Some(parent));
        tree.attach(outer, Some(parent));
        tree.set_absolute_size(parent, Size::new(1000.0, 500.0));
        tree.set_padding(parent, Padding::new(0.1, 0.2, 0.1, 0.2));
        tree.set_ignore_parent_padding(outer, true);

        // Padded content rect: x 100..900, y 100..400.
        assert_eq!(
            tree.unscaled_rect(inner),
            Rect::new(100.0, 100.0, 900.0, 400.0)
        );
        assert_eq!(
            tree.unscaled_rect(outer),
            Rect::new(0.0, 0.0, 1000.0, 500.0)
        );
    }

    #[test]
    fn alignment_and_offset_compose() {
        let mut tree = tree();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(parent));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));
        tree.set_alignment(child, Alignment::BOTTOM_RIGHT);
        // Offset is a fraction of the parent's *full* size.
        tree.set_relative_offset(child, Vec2::new(-0.1, 0.0));

        // Anchored at (500, 250), then shifted left by 100.
        assert_eq!(
            tree.unscaled_rect(child),
            Rect::new(400.0, 250.0, 900.0, 500.0)
        );
    }

    #[test]
    fn ratio_then_clamp_applies_down_the_tree() {
        let mut tree = tree();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(parent));
        tree.set_ratio(child, Some(2.0));
        tree.set_max_size(child, Size::new(400.0, f64::INFINITY));

        // Full content 1000x500 already has ratio 2.0; the max clamp then
        // caps the width without re-running the ratio step.
        let rect = tree.unscaled_rect(child);
        assert_eq!(rect.size(), Size::new(400.0, 500.0));
    }

    #[test]
    fn reparenting_recomputes_against_the_new_parent() {
        let mut tree = tree();
        let p1 = tree.create_node();
        let p2 = tree.create_node();
        let child = tree.create_node();
        tree.set_absolute_size(p2, Size::new(200.0, 100.0));
        tree.attach(child, Some(p1));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));
        let _ = tree.recalculate();

        tree.attach(child, Some(p2));
        let changes = tree.recalculate();
        assert!(changes.recalculated.contains(&child.idx));
        assert_eq!(
            changes.parent_changed,
            vec![super::ParentChange {
                node: child.idx,
                old_parent: p1.idx,
                new_parent: p2.idx,
            }]
        );
        assert_eq!(
            changes.child_removed,
            vec![super::LinkChange {
                parent: p1.idx,
                child: child.idx,
            }]
        );
        assert_eq!(
            changes.child_added,
            vec![super::LinkChange {
                parent: p2.idx,
                child: child.idx,
            }]
        );
        assert_eq!(
            tree.unscaled_rect(child),
            Rect::new(0.0, 0.0, 100.0, 50.0)
        );
    }

    #[test]
    fn detach_reports_a_null_parent() {
        let mut tree = tree();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(parent));
        let _ = tree.recalculate();

        tree.attach(child, None);
        let changes = tree.recalculate();
        assert_eq!(changes.parent_changed.len(), 1);
        assert_eq!(changes.parent_changed[0].new_parent, super::INVALID);
    }

    #[test]
    fn lazy_read_keeps_the_batch_pending() {
        let mut tree = tree();
        let id = tree.create_node();
        let _ = tree.recalculate();

        tree.set_absolute_size(id, Size::new(10.0, 10.0));
        // Lazy read flushes geometry...
        assert_eq!(tree.unscaled_rect(id).size(), Size::new(10.0, 10.0));
        // ...but the notification still arrives with the next pass.
        let changes = tree.recalculate();
        assert_eq!(changes.recalculated, vec![id.idx]);
    }

    #[test]
    fn staged_resolution_changes_nothing_until_committed() {
        let mut tree = tree();
        let id = tree.create_node();
        let _ = tree.recalculate();

        tree.stage_resolution(2000.0, 1000.0);
        assert_eq!(tree.screen().scale(), (1.0, 1.0));
        let changes = tree.recalculate();
        assert!(changes.recalculated.is_empty());

        assert!(tree.commit_resolution());
        assert_eq!(tree.screen().scale(), (2.0, 2.0));
        let changes = tree.recalculate();
        assert_eq!(changes.recalculated, vec![id.idx]);
        assert_eq!(
            tree.scaled_rect(id),
            Rect::new(0.0, 0.0, 2000.0, 1000.0)
        );
    }

    #[test]
    fn commit_without_change_is_a_noop() {
        let mut tree = tree();
        let id = tree.create_node();
        let _ = tree.recalculate();
        let _ = id;

        tree.stage_resolution(1000.0, 500.0);
        assert!(!tree.commit_resolution());
        assert!(tree.recalculate().is_empty());
    }

    #[test]
    fn commit_reaches_absolute_children_too() {
        let mut tree = tree();
        let root = tree.create_node();
        let pinned = tree.create_node();
        tree.attach(pinned, Some(root));
        tree.set_mode(pinned, Mode::Absolute);
        let _ = tree.recalculate();

        tree.stage_resolution(500.0, 250.0);
        assert!(tree.commit_resolution());
        let changes = tree.recalculate();
        assert!(changes.recalculated.contains(&root.idx));
        assert!(changes.recalculated.contains(&pinned.idx));
    }

    #[test]
    fn scaled_rect_truncates_toward_zero() {
        let mut tree = tree();
        let id = tree.create_node();
        tree.set_absolute_location(id, Point::new(3.0, 3.0));
        tree.set_absolute_size(id, Size::new(5.0, 5.0));

        tree.stage_resolution(1500.0, 750.0); // scale 1.5
        tree.commit_resolution();
        let _ = tree.recalculate();

        // Location (4.5, 4.5) -> (4, 4); size (7.5, 7.5) -> (7, 7).
        assert_eq!(tree.scaled_rect(id), Rect::new(4.0, 4.0, 11.0, 11.0));
        // The unscaled rectangle stays exact.
        assert_eq!(tree.unscaled_rect(id), Rect::new(3.0, 3.0, 8.0, 8.0));
    }

    #[test]
    fn anisotropic_scale_uses_both_axes() {
        let mut tree = tree();
        let id = tree.create_node();
        let _ = tree.recalculate();

        tree.stage_resolution(2000.0, 250.0); // scale (2.0, 0.5)
        tree.commit_resolution();
        let _ = tree.recalculate();
        assert_eq!(
            tree.scaled_rect(id),
            Rect::new(0.0, 0.0, 2000.0, 250.0)
        );
    }

    #[test]
    fn halving_the_live_resolution_halves_scaled_sizes() {
        let mut tree = NodeTree::new(Size::new(1920.0, 1080.0));
        let root = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(root));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));
        let before = tree.scaled_rect(child);
        assert_eq!(before.size(), Size::new(960.0, 540.0));

        tree.stage_resolution(960.0, 540.0);
        tree.commit_resolution();

        // Unscaled geometry is untouched; scaled sizes halve.
        assert_eq!(tree.unscaled_rect(child).size(), Size::new(960.0, 540.0));
        assert_eq!(tree.scaled_rect(child).size(), Size::new(480.0, 270.0));
        assert_eq!(tree.scaled_rect(root).size(), Size::new(960.0, 540.0));
    }

    #[test]
    fn ratio_survives_unrelated_ancestor_changes() {
        let mut tree = tree();
        let root = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(root));
        tree.set_ratio(child, Some(1.5));
        let rect = tree.unscaled_rect(child);
        assert!((rect.width() / rect.height() - 1.5).abs() < 1e-9);

        // A cascade from the parent must re-establish the ratio exactly.
        tree.set_absolute_size(root, Size::new(777.0, 333.0));
        let rect = tree.unscaled_rect(child);
        assert!((rect.width() / rect.height() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn destroyed_nodes_are_reported_and_skipped() {
        let mut tree = tree();
        let a = tree.create_node();
        let b = tree.create_node();
        let _ = tree.recalculate();

        tree.set_absolute_size(a, Size::new(10.0, 10.0));
        tree.destroy_node(a);
        let changes = tree.recalculate();
        assert_eq!(changes.removed, vec![a.idx]);
        assert!(!changes.recalculated.contains(&a.idx));
        assert!(tree.is_alive(b));
    }

    #[test]
    fn mode_switch_preserves_geometry_and_detaches_from_cascade() {
        let mut tree = tree();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(parent));
        tree.set_relative_size(child, Vec2::new(0.5, 0.5));
        let _ = tree.recalculate();

        tree.set_mode(child, Mode::Absolute);
        assert_eq!(tree.absolute_size(child), Size::new(500.0, 250.0));
        let _ = tree.recalculate();

        tree.set_absolute_size(parent, Size::new(100.0, 100.0));
        let changes = tree.recalculate();
        assert!(!changes.recalculated.contains(&child.idx));

        // Switching back resumes tracking.
        tree.set_mode(child, Mode::Relative);
        let _ = tree.recalculate();
        tree.set_absolute_size(parent, Size::new(200.0, 200.0));
        let changes = tree.recalculate();
        assert!(changes.recalculated.contains(&child.idx));
        assert_eq!(tree.unscaled_rect(child).size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn recalculate_into_reuses_buffers() {
        let mut tree = tree();
        let id = tree.create_node();
        let mut changes = super::LayoutChanges::default();

        tree.recalculate_into(&mut changes);
        assert_eq!(changes.recalculated, vec![id.idx]);

        tree.recalculate_into(&mut changes);
        assert!(changes.is_empty());
    }

    #[test]
    fn min_clamp_reexpands_a_shrunken_child() {
        let mut tree = tree();
        let parent = tree.create_node();
        let child = tree.create_node();
        tree.attach(child, Some(parent));
        tree.set_min_size(child, Size::new(300.0, 100.0));
        tree.set_relative_size(child, Vec2::new(0.1, 0.1));

        let rect = tree.unscaled_rect(child);
        assert_eq!(rect.size(), Size::new(300.0, 100.0));
    }

    #[test]
    fn deep_chain_converges_in_one_pass() {
        let mut tree = tree();
        let mut ids = Vec::new();
        let root = tree.create_node();
        ids.push(root);
        for i in 1..10 {
            let node = tree.create_node();
            tree.attach(node, Some(ids[i - 1]));
            tree.set_relative_size(node, Vec2::new(0.9, 0.9));
            ids.push(node);
        }
        let _ = tree.recalculate();

        tree.set_absolute_size(root, Size::new(100.0, 100.0));
        let changes = tree.recalculate();
        assert_eq!(changes.recalculated.len(), 10);

        let mut expected = 100.0;
        for (depth, id) in ids.iter().enumerate() {
            if depth > 0 {
                expected *= 0.9;
            }
            let got = tree.unscaled_rect(*id).width();
            assert!((got - expected).abs() < 1e-9, "depth {depth}: {got}");
        }
    }
}
