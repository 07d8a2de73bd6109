// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree iteration and search helpers.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::NodeTree;

/// Iterator over the direct children of a node, in insertion order.
///
/// Returned by [`NodeTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a NodeTree,
    cursor: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a NodeTree, first: u32) -> Self {
        Self {
            tree,
            cursor: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.cursor == INVALID {
            return None;
        }
        let idx = self.cursor;
        self.cursor = self.tree.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.tree.generation[idx as usize],
        })
    }
}

/// Depth-first preorder iterator over the strict descendants of a node (the
/// starting node itself is not yielded).
///
/// Returned by [`NodeTree::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a NodeTree,
    stack: Vec<u32>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push children in reverse so the first child pops first.
        let mark = self.stack.len();
        let mut child = self.tree.first_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.tree.next_sibling[child as usize];
        }
        self.stack[mark..].reverse();
        Some(NodeId {
            idx,
            generation: self.tree.generation[idx as usize],
        })
    }
}

impl NodeTree {
    /// Returns a depth-first preorder iterator over the strict descendants
    /// of `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        let mut stack = Vec::new();
        let mut child = self.first_child[id.idx as usize];
        while child != INVALID {
            stack.push(child);
            child = self.next_sibling[child as usize];
        }
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Returns the first direct child satisfying `pred`, in sibling order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn find_child<F>(&self, id: NodeId, mut pred: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.children(id).find(|&child| pred(self, child))
    }

    /// Returns the first descendant satisfying `pred`.
    ///
    /// At each node, all direct children are tested in sibling order before
    /// descending; only then is each child's subtree searched in turn, fully,
    /// before moving to the next sibling's subtree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn find_descendant<F>(&self, id: NodeId, mut pred: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.validate(id);
        self.find_descendant_inner(id.idx, &mut pred)
    }

    fn find_descendant_inner<F>(&self, idx: u32, pred: &mut F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let node = NodeId {
                idx: child,
                generation: self.generation[child as usize],
            };
            if pred(self, node) {
                return Some(node);
            }
            child = self.next_sibling[child as usize];
        }
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            if let Some(found) = self.find_descendant_inner(child, pred) {
                return Some(found);
            }
            child = self.next_sibling[child as usize];
        }
        None
    }
}
