// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and layout-input
//! management.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::geometry::{Alignment, Padding, scale_rect};
use crate::scale::ScreenScale;
use crate::trace::{ScaleCommitEvent, Tracer};
use crate::transform::{Mode, Transform};

use super::evaluate::{LayoutChanges, LinkChange, ParentChange};
use super::id::{ContentId, INVALID, NodeId};
use super::traverse::Children;

/// Per-node boolean flags.
///
/// Flags gate the per-frame traversal only: a node failing its gate is
/// skipped along with its entire subtree, but stays attached and keeps all
/// state, so re-enabling restores it as-is. Layout recalculation ignores
/// flags entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Master switch: a disabled node is visited by neither pass.
    pub enabled: bool,
    /// Whether the update pass visits this node (and its subtree).
    pub auto_update: bool,
    /// Whether the draw pass visits this node (and its subtree).
    pub auto_draw: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_update: true,
            auto_draw: true,
        }
    }
}

/// Struct-of-arrays storage for all nodes, plus the screen-scale provider.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct NodeTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) transform: Vec<Transform>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) content: Vec<Option<ContentId>>,

    // -- Computed properties (written by recalculation) --
    pub(crate) unscaled: Vec<Rect>,
    pub(crate) scaled: Vec<Rect>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    /// Per-slot liveness, so full-tree passes skip freed slots without
    /// scanning the free list.
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Screen scale --
    pub(crate) screen: ScreenScale,

    // -- Pending notifications (delivered by the next recalculation pass) --
    pub(crate) pending: LayoutChanges,
}

impl NodeTree {
    /// Creates an empty tree for the given design resolution.
    ///
    /// The live resolution starts equal to the design resolution; change it
    /// through [`stage_resolution`](Self::stage_resolution) and
    /// [`commit_resolution`](Self::commit_resolution).
    ///
    /// # Panics
    ///
    /// Panics if either design dimension is not finite and positive.
    #[must_use]
    pub fn new(design: Size) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            transform: Vec::new(),
            flags: Vec::new(),
            content: Vec::new(),
            unscaled: Vec::new(),
            scaled: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            screen: ScreenScale::new(design),
            pending: LayoutChanges::default(),
        }
    }

    // -- Allocation API --

    /// Creates a new root node and returns its handle.
    ///
    /// The node starts in absolute mode sized to the full design resolution
    /// at the origin, with all flags enabled and no content. It is born
    /// dirty: the first recalculation pass (or lazy read) computes its
    /// rectangles.
    pub fn create_node(&mut self) -> NodeId {
        let design_rect = Rect::from_origin_size(Point::ZERO, self.screen.design_size());
        let (sx, sy) = self.screen.scale();
        let scaled = scale_rect(design_rect, sx, sy);
        let transform = Transform::absolute(design_rect);

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.transform[idx as usize] = transform;
            self.flags[idx as usize] = NodeFlags::default();
            self.content[idx as usize] = None;
            self.unscaled[idx as usize] = design_rect;
            self.scaled[idx as usize] = scaled;
            self.alive[idx as usize] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.transform.push(transform);
            self.flags.push(NodeFlags::default());
            self.content.push(None);
            self.unscaled.push(design_rect);
            self.scaled.push(scaled);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.traversal_dirty = true;
        self.pending.added.push(idx);
        self.dirty.mark(idx, dirty::LAYOUT);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// The node is detached from its parent first (queueing the same
    /// notifications a detach would), then its slot is recycled. Old handles
    /// fail validation immediately.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (detach or destroy them first) or if
    /// the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy a node with children"
        );

        let parent = self.parent[idx as usize];
        if parent != INVALID {
            self.unlink_from_parent(idx);
            self.pending.child_removed.push(LinkChange {
                parent,
                child: idx,
            });
            self.pending.parent_changed.push(ParentChange {
                node: idx,
                old_parent: parent,
                new_parent: INVALID,
            });
            self.dirty.mark(parent, dirty::TOPOLOGY);
        }

        // Remove dirty tracking state, including any dependency edge.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.alive[idx as usize] = false;
        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending.removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && self.alive[id.idx as usize]
    }

    // -- Topology API --

    /// Moves `child` under `new_parent`, or detaches it into a root when
    /// `new_parent` is `None`.
    ///
    /// This is the only topology mutation and keeps the parent link and
    /// child lists symmetric. It is idempotent when the parent is unchanged.
    /// Otherwise it:
    ///
    /// - detaches from any current parent, queueing `ChildRemoved` on it;
    /// - links as the *last* child of the new parent, queueing `ChildAdded`;
    /// - forces the transform mode: relative under a parent, absolute as a
    ///   root. Detaching to a root stores the last computed unscaled
    ///   rectangle as the new absolute location/size;
    /// - swaps the invalidation edge so the node tracks exactly one source;
    /// - queues `ParentChanged` and marks the moved subtree for
    ///   recalculation.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale or if the move would create a cycle
    /// (attaching a node to itself or to one of its own descendants).
    pub fn attach(&mut self, child: NodeId, new_parent: Option<NodeId>) {
        self.validate(child);
        if let Some(p) = new_parent {
            self.validate(p);
        }
        let c = child.idx;
        let new_idx = new_parent.map_or(INVALID, |p| p.idx);
        let old_idx = self.parent[c as usize];
        if old_idx == new_idx {
            return;
        }

        // Cycle safety: the new parent's ancestor chain must not contain the
        // node being attached. Checked before any mutation.
        let mut cursor = new_idx;
        while cursor != INVALID {
            assert!(
                cursor != c,
                "attach would create a cycle: node {c} is the new parent or one of its ancestors"
            );
            cursor = self.parent[cursor as usize];
        }

        // Detaching to a root preserves the last computed rectangle, so make
        // sure it is current before the topology changes underneath it.
        if new_idx == INVALID {
            self.flush_layout();
        }

        if old_idx != INVALID {
            self.unlink_from_parent(c);
            if self.transform[c as usize].mode == Mode::Relative {
                self.dirty.remove_dependency(c, old_idx, dirty::LAYOUT);
            }
            self.pending.child_removed.push(LinkChange {
                parent: old_idx,
                child: c,
            });
            self.dirty.mark(old_idx, dirty::TOPOLOGY);
        }

        if new_idx == INVALID {
            let rect = self.unscaled[c as usize];
            let t = &mut self.transform[c as usize];
            t.mode = Mode::Absolute;
            t.location = rect.origin();
            t.size = rect.size();
        } else {
            // Link as last child.
            self.parent[c as usize] = new_idx;
            self.prev_sibling[c as usize] = INVALID;
            self.next_sibling[c as usize] = INVALID;
            if self.first_child[new_idx as usize] == INVALID {
                self.first_child[new_idx as usize] = c;
            } else {
                let mut last = self.first_child[new_idx as usize];
                while self.next_sibling[last as usize] != INVALID {
                    last = self.next_sibling[last as usize];
                }
                self.next_sibling[last as usize] = c;
                self.prev_sibling[c as usize] = last;
            }

            self.transform[c as usize].mode = Mode::Relative;
            let _ = self.dirty.add_dependency(c, new_idx, dirty::LAYOUT);
            self.pending.child_added.push(LinkChange {
                parent: new_idx,
                child: c,
            });
            self.dirty.mark(new_idx, dirty::TOPOLOGY);
        }

        self.pending.parent_changed.push(ParentChange {
            node: c,
            old_parent: old_idx,
            new_parent: new_idx,
        });
        self.dirty.mark_with(c, dirty::LAYOUT, &EagerPolicy);
        self.traversal_dirty = true;
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(NodeId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a node, in insertion
    /// order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the root nodes (those with no parent), in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && self.alive[idx as usize] {
                roots.push(NodeId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Screen scale API --

    /// Read access to the screen-scale provider. The commit API below is the
    /// only way to mutate it.
    #[must_use]
    pub fn screen(&self) -> &ScreenScale {
        &self.screen
    }

    /// Stages a new live resolution without changing anything.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not finite and positive.
    pub fn stage_resolution(&mut self, width: f64, height: f64) {
        self.screen.stage(width, height);
    }

    /// Commits the staged resolution.
    ///
    /// When the scale actually changes, every absolute node (which includes
    /// every root) is marked for recalculation; eager propagation carries
    /// the mark to all relative descendants, so the next pass recomputes the
    /// whole affected tree in root-before-leaf order. Returns whether the
    /// scale changed.
    pub fn commit_resolution(&mut self) -> bool {
        self.commit_resolution_with(&mut Tracer::none())
    }

    /// Like [`commit_resolution`](Self::commit_resolution), with tracing.
    pub fn commit_resolution_with(&mut self, tracer: &mut Tracer<'_>) -> bool {
        let live_old = self.screen.live_size();
        if !self.screen.apply() {
            return false;
        }
        for idx in 0..self.len {
            if !self.alive[idx as usize] {
                continue;
            }
            if self.transform[idx as usize].mode == Mode::Absolute {
                self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
            }
        }
        tracer.scale_commit(&ScaleCommitEvent {
            live_old,
            live_new: self.screen.live_size(),
            scale: self.screen.scale(),
        });
        true
    }

    // -- Property getters --
    //
    // Mode-specific getters are gated: reading an absolute-only field while
    // relative (or vice versa) is a programming error and panics.

    /// Returns the positioning mode of a node.
    #[must_use]
    pub fn mode(&self, id: NodeId) -> Mode {
        self.validate(id);
        self.transform[id.idx as usize].mode
    }

    /// Returns the stored absolute location (absolute mode only).
    #[must_use]
    pub fn absolute_location(&self, id: NodeId) -> Point {
        self.validate(id);
        self.require_mode(id.idx, Mode::Absolute, "absolute_location");
        self.transform[id.idx as usize].location
    }

    /// Returns the stored absolute size (absolute mode only).
    #[must_use]
    pub fn absolute_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.require_mode(id.idx, Mode::Absolute, "absolute_size");
        self.transform[id.idx as usize].size
    }

    /// Returns the fractional size (relative mode only).
    #[must_use]
    pub fn relative_size(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "relative_size");
        self.transform[id.idx as usize].relative_size
    }

    /// Returns the fractional offset (relative mode only).
    #[must_use]
    pub fn relative_offset(&self, id: NodeId) -> Vec2 {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "relative_offset");
        self.transform[id.idx as usize].relative_offset
    }

    /// Returns the alignment (relative mode only).
    #[must_use]
    pub fn alignment(&self, id: NodeId) -> Alignment {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "alignment");
        self.transform[id.idx as usize].alignment
    }

    /// Returns whether this node ignores its parent's padding (relative mode
    /// only).
    #[must_use]
    pub fn ignore_parent_padding(&self, id: NodeId) -> bool {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "ignore_parent_padding");
        self.transform[id.idx as usize].ignore_parent_padding
    }

    /// Returns the padding this node offers its relative children.
    #[must_use]
    pub fn padding(&self, id: NodeId) -> Padding {
        self.validate(id);
        self.transform[id.idx as usize].padding
    }

    /// Returns the minimum size clamp.
    #[must_use]
    pub fn min_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.transform[id.idx as usize].min_size
    }

    /// Returns the maximum size clamp.
    #[must_use]
    pub fn max_size(&self, id: NodeId) -> Size {
        self.validate(id);
        self.transform[id.idx as usize].max_size
    }

    /// Returns the fixed width:height ratio, or `None` when unspecified.
    #[must_use]
    pub fn ratio(&self, id: NodeId) -> Option<f64> {
        self.validate(id);
        self.transform[id.idx as usize].ratio
    }

    /// Returns the flags of a node.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the content handle of a node.
    #[must_use]
    pub fn content(&self, id: NodeId) -> Option<ContentId> {
        self.validate(id);
        self.content[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty; every setter is a no-op on equal
    //    values) --

    /// Switches the positioning mode explicitly.
    ///
    /// [`attach`](Self::attach) flips the mode automatically; this setter
    /// exists for the deliberate case of an absolutely positioned node kept
    /// under a parent. Switching *to* absolute stores the last computed
    /// rectangle as the new location/size, same as detaching; switching back
    /// to relative resumes tracking the parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or when switching to relative mode on
    /// a node with no parent.
    pub fn set_mode(&mut self, id: NodeId, mode: Mode) {
        self.validate(id);
        let idx = id.idx;
        if self.transform[idx as usize].mode == mode {
            return;
        }
        let parent = self.parent[idx as usize];
        match mode {
            Mode::Relative => {
                assert!(parent != INVALID, "relative mode requires a parent");
                let _ = self.dirty.add_dependency(idx, parent, dirty::LAYOUT);
            }
            Mode::Absolute => {
                self.flush_layout();
                if parent != INVALID {
                    self.dirty.remove_dependency(idx, parent, dirty::LAYOUT);
                }
                let rect = self.unscaled[idx as usize];
                let t = &mut self.transform[idx as usize];
                t.location = rect.origin();
                t.size = rect.size();
            }
        }
        self.transform[idx as usize].mode = mode;
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
    }

    /// Sets the stored location in design-resolution units (absolute mode
    /// only).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the node is relative, or the location
    /// is not finite.
    pub fn set_absolute_location(&mut self, id: NodeId, location: Point) {
        self.validate(id);
        self.require_mode(id.idx, Mode::Absolute, "absolute_location");
        assert!(
            location.x.is_finite() && location.y.is_finite(),
            "absolute location must be finite, got {location:?}"
        );
        if self.transform[id.idx as usize].location == location {
            return;
        }
        self.transform[id.idx as usize].location = location;
        self.mark_layout(id.idx);
    }

    /// Sets the stored size in design-resolution units (absolute mode only).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the node is relative, or the size has
    /// a negative or non-finite component.
    pub fn set_absolute_size(&mut self, id: NodeId, size: Size) {
        self.validate(id);
        self.require_mode(id.idx, Mode::Absolute, "absolute_size");
        assert!(
            size.width.is_finite() && size.width >= 0.0 && size.height.is_finite() && size.height >= 0.0,
            "absolute size must be finite and non-negative, got {size:?}"
        );
        if self.transform[id.idx as usize].size == size {
            return;
        }
        self.transform[id.idx as usize].size = size;
        self.mark_layout(id.idx);
    }

    /// Sets the size as a fraction of the parent's usable content size
    /// (relative mode only).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the node is absolute, or a component
    /// is negative or non-finite.
    pub fn set_relative_size(&mut self, id: NodeId, relative_size: Vec2) {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "relative_size");
        assert!(
            relative_size.x.is_finite()
                && relative_size.x >= 0.0
                && relative_size.y.is_finite()
                && relative_size.y >= 0.0,
            "relative size components must be finite and non-negative, got {relative_size:?}"
        );
        if self.transform[id.idx as usize].relative_size == relative_size {
            return;
        }
        self.transform[id.idx as usize].relative_size = relative_size;
        self.mark_layout(id.idx);
    }

    /// Sets the offset as a fraction of the parent's full size (relative
    /// mode only). Components may be negative.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the node is absolute, or a component
    /// is non-finite.
    pub fn set_relative_offset(&mut self, id: NodeId, relative_offset: Vec2) {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "relative_offset");
        assert!(
            relative_offset.x.is_finite() && relative_offset.y.is_finite(),
            "relative offset components must be finite, got {relative_offset:?}"
        );
        if self.transform[id.idx as usize].relative_offset == relative_offset {
            return;
        }
        self.transform[id.idx as usize].relative_offset = relative_offset;
        self.mark_layout(id.idx);
    }

    /// Sets the alignment inside the parent's usable rectangle (relative
    /// mode only).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is absolute.
    pub fn set_alignment(&mut self, id: NodeId, alignment: Alignment) {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "alignment");
        if self.transform[id.idx as usize].alignment == alignment {
            return;
        }
        self.transform[id.idx as usize].alignment = alignment;
        self.mark_layout(id.idx);
    }

    /// Sets whether this node lays out against the parent's full rectangle
    /// instead of its padded content rectangle (relative mode only).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node is absolute.
    pub fn set_ignore_parent_padding(&mut self, id: NodeId, ignore: bool) {
        self.validate(id);
        self.require_mode(id.idx, Mode::Relative, "ignore_parent_padding");
        if self.transform[id.idx as usize].ignore_parent_padding == ignore {
            return;
        }
        self.transform[id.idx as usize].ignore_parent_padding = ignore;
        self.mark_layout(id.idx);
    }

    /// Sets the padding this node offers its relative children.
    ///
    /// Only the children's rectangles depend on it, but the eager mark on
    /// this node reaches them through their dependency edges.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the padding fractions are invalid
    /// (negative, non-finite, or summing past `1.0` on an axis).
    pub fn set_padding(&mut self, id: NodeId, padding: Padding) {
        self.validate(id);
        padding.validate();
        if self.transform[id.idx as usize].padding == padding {
            return;
        }
        self.transform[id.idx as usize].padding = padding;
        self.mark_layout(id.idx);
    }

    /// Sets the minimum size clamp.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, a component is negative or non-finite,
    /// or the new minimum exceeds the current maximum on a component.
    pub fn set_min_size(&mut self, id: NodeId, min_size: Size) {
        self.validate(id);
        assert!(
            min_size.width.is_finite()
                && min_size.width >= 0.0
                && min_size.height.is_finite()
                && min_size.height >= 0.0,
            "min size must be finite and non-negative, got {min_size:?}"
        );
        let max = self.transform[id.idx as usize].max_size;
        assert!(
            min_size.width <= max.width && min_size.height <= max.height,
            "min size {min_size:?} exceeds max size {max:?}"
        );
        if self.transform[id.idx as usize].min_size == min_size {
            return;
        }
        self.transform[id.idx as usize].min_size = min_size;
        self.mark_layout(id.idx);
    }

    /// Sets the maximum size clamp. Components may be infinite (unbounded).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, a component is NaN or negative, or the
    /// new maximum drops below the current minimum on a component.
    pub fn set_max_size(&mut self, id: NodeId, max_size: Size) {
        self.validate(id);
        assert!(
            !max_size.width.is_nan()
                && max_size.width >= 0.0
                && !max_size.height.is_nan()
                && max_size.height >= 0.0,
            "max size must be non-negative, got {max_size:?}"
        );
        let min = self.transform[id.idx as usize].min_size;
        assert!(
            max_size.width >= min.width && max_size.height >= min.height,
            "max size {max_size:?} drops below min size {min:?}"
        );
        if self.transform[id.idx as usize].max_size == max_size {
            return;
        }
        self.transform[id.idx as usize].max_size = max_size;
        self.mark_layout(id.idx);
    }

    /// Sets or clears the fixed width:height ratio.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or a specified ratio is not finite and
    /// positive.
    pub fn set_ratio(&mut self, id: NodeId, ratio: Option<f64>) {
        self.validate(id);
        if let Some(value) = ratio {
            assert!(
                value.is_finite() && value > 0.0,
                "ratio must be finite and positive, got {value}"
            );
        }
        if self.transform[id.idx as usize].ratio == ratio {
            return;
        }
        self.transform[id.idx as usize].ratio = ratio;
        self.mark_layout(id.idx);
    }

    /// Sets the traversal flags. Takes effect on the next pass; no
    /// recalculation is needed since flags never affect geometry.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
    }

    /// Sets the content handle of a node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_content(&mut self, id: NodeId, content: Option<ContentId>) {
        self.validate(id);
        if self.content[id.idx as usize] == content {
            return;
        }
        self.content[id.idx as usize] = content;
        self.dirty.mark(id.idx, dirty::CONTENT);
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as found in `LayoutChanges`) rather
    // than `NodeId` handles, skipping generation validation, and read the
    // caches without forcing a recalculation. Only use with indices that
    // came from `LayoutChanges` or `traversal_order()`.

    /// Returns the cached unscaled rectangle at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn unscaled_rect_at(&self, idx: u32) -> Rect {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.unscaled[idx as usize]
    }

    /// Returns the cached scaled rectangle at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn scaled_rect_at(&self, idx: u32) -> Rect {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.scaled[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Panics unless the node's mode matches `expected`.
    fn require_mode(&self, idx: u32, expected: Mode, field: &str) {
        let actual = self.transform[idx as usize].mode;
        assert!(
            actual == expected,
            "{field} requires {expected:?} mode, but node {idx} is {actual:?}"
        );
    }

    /// Marks a node's layout dirty with eager propagation to its relative
    /// descendants.
    fn mark_layout(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::LAYOUT, &EagerPolicy);
    }

    /// Removes `idx` from its parent's child list without touching dirty
    /// state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}
