//! Deletion from a bucket's AVL tree.
//!
//! A node with two children is never itself unlinked: instead its in-order
//! successor (or predecessor, whichever side is taller) is spliced out of
//! its own spot and grafted into the doomed node's position, keeping that
//! survivor's own identity, and its place in the insertion-order list,
//! intact. Only the originally requested node is ever freed.

use std::hash::Hash;

use super::node::NodeId;
use super::OrderedMap;

impl<K: Ord + Hash, V> OrderedMap<K, V> {
    pub(super) fn remove_entry(&mut self, bucket: usize, target: NodeId) -> V {
        self.unlink_order(target);

        loop {
            let left = self.arena.get(target).left;
            let right = self.arena.get(target).right;
            match (left, right) {
                (Some(l), Some(r)) => {
                    let adjacent = if self.arena.get(l).height > self.arena.get(r).height {
                        self.last(l)
                    } else {
                        self.first(r)
                    };
                    self.splice_out(bucket, adjacent);

                    let left = self.arena.get(target).left;
                    let right = self.arena.get(target).right;
                    let left_h = left.map_or(0, |id| self.arena.get(id).height);
                    let right_h = right.map_or(0, |id| self.arena.get(id).height);
                    if let Some(l2) = left {
                        self.arena.get_mut(adjacent).left = Some(l2);
                        self.arena.get_mut(l2).parent = Some(adjacent);
                    }
                    if let Some(r2) = right {
                        self.arena.get_mut(adjacent).right = Some(r2);
                        self.arena.get_mut(r2).parent = Some(adjacent);
                    }
                    self.arena.get_mut(target).left = None;
                    self.arena.get_mut(target).right = None;
                    self.arena.get_mut(adjacent).height = left_h.max(right_h) + 1;
                    self.attach_to_parent(bucket, target, adjacent, self.arena.get(target).parent);
                    break;
                }
                _ => {
                    let child = left.or(right);
                    let parent = self.arena.get(target).parent;
                    match child {
                        Some(c) => self.attach_to_parent(bucket, target, c, parent),
                        None => self.detach_childless(bucket, target, parent),
                    }
                    if let Some(p) = parent {
                        self.rebalance(bucket, p);
                    }
                    break;
                }
            }
        }

        self.size -= 1;
        self.arena.dealloc(target).value
    }

    /// Detach `target` from the bucket (or its parent) when it has no
    /// children left to reattach in its place.
    fn detach_childless(&mut self, bucket: usize, target: NodeId, parent: Option<NodeId>) {
        match parent {
            None => self.table[bucket] = None,
            Some(p) => {
                if self.arena.get(p).left == Some(target) {
                    self.arena.get_mut(p).left = None;
                } else {
                    self.arena.get_mut(p).right = None;
                }
            }
        }
    }

    /// Detach `node` (which has at most one child, by construction of
    /// [`Self::first`]/[`Self::last`]) from its current spot, without
    /// touching size or insertion order (the caller is about to reattach
    /// it elsewhere).
    fn splice_out(&mut self, bucket: usize, node: NodeId) {
        let left = self.arena.get(node).left;
        let right = self.arena.get(node).right;
        debug_assert!(left.is_none() || right.is_none());
        let child = left.or(right);
        let parent = self.arena.get(node).parent;
        match child {
            Some(c) => self.attach_to_parent(bucket, node, c, parent),
            None => self.detach_childless(bucket, node, parent),
        }
        if let Some(p) = parent {
            self.rebalance(bucket, p);
        }
    }

    fn first(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.arena.get(id).left {
            id = l;
        }
        id
    }

    fn last(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.arena.get(id).right {
            id = r;
        }
        id
    }

    pub(super) fn unlink_order(&mut self, id: NodeId) {
        let prev = self.arena.get(id).prev;
        let next = self.arena.get(id).next;
        match prev {
            Some(p) => self.arena.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.arena.get_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    pub(super) fn link_tail(&mut self, id: NodeId) {
        self.arena.get_mut(id).prev = self.tail;
        self.arena.get_mut(id).next = None;
        match self.tail {
            Some(t) => self.arena.get_mut(t).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }
}
