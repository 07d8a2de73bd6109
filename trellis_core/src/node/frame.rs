// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame traversal: dispatching update and draw callbacks to the host.

use alloc::vec::Vec;

use crate::host::{NodeHost, Tick};

use super::id::{INVALID, NodeId};
use super::store::{NodeFlags, NodeTree};

impl NodeTree {
    /// Runs the update pass: visits every node whose flags pass the
    /// `enabled && auto_update` gate, in depth-first preorder across all
    /// roots, calling [`NodeHost::update`] for each.
    ///
    /// A node failing the gate is skipped along with its entire subtree.
    /// Stale geometry is flushed first so callbacks observe fresh
    /// rectangles. The visit set is snapshotted up front: nodes created
    /// mid-pass are visited next frame, and nodes destroyed mid-pass are
    /// skipped.
    pub fn update(&mut self, host: &mut dyn NodeHost, tick: Tick) {
        self.flush_layout();
        let visit = self.collect_pass(|f| f.enabled && f.auto_update);
        for id in visit {
            if self.is_alive(id) {
                host.update(self, id, tick);
            }
        }
    }

    /// Runs the draw pass: same traversal as [`update`](Self::update) but
    /// gated on `enabled && auto_draw`, calling [`NodeHost::draw`] with read
    /// access to the tree.
    pub fn draw(&mut self, host: &mut dyn NodeHost, tick: Tick) {
        self.flush_layout();
        let visit = self.collect_pass(|f| f.enabled && f.auto_draw);
        for id in visit {
            host.draw(self, id, tick);
        }
    }

    /// Collects the gated preorder visit set across all roots.
    fn collect_pass<F>(&self, gate: F) -> Vec<NodeId>
    where
        F: Fn(NodeFlags) -> bool,
    {
        let mut out = Vec::new();
        let mut stack: Vec<u32> = Vec::new();
        for root in 0..self.len {
            if self.parent[root as usize] != INVALID || !self.alive[root as usize] {
                continue;
            }
            stack.push(root);
            while let Some(idx) = stack.pop() {
                if !gate(self.flags[idx as usize]) {
                    continue;
                }
                out.push(NodeId {
                    idx,
                    generation: self.generation[idx as usize],
                });
                let mark = stack.len();
                let mut child = self.first_child[idx as usize];
                while child != INVALID {
                    stack.push(child);
                    child = self.next_sibling[child as usize];
                }
                stack[mark..].reverse();
            }
        }
        out
    }
}
