//! Per-bucket AVL insertion, rotation, and rebalancing.
//!
//! Each hash bucket roots its own small AVL tree (ordered by `K: Ord`), so a
//! bucket with many collisions still resolves lookups in O(log n) instead of
//! degrading to a list, the way [`std::collections::HashMap`] would.

use std::cmp::Ordering;
use std::hash::Hash;

use super::node::NodeId;
use super::OrderedMap;

impl<K: Ord + Hash, V> OrderedMap<K, V> {
    /// Find the node for `key`, returning its bucket and id.
    pub(super) fn find(&self, key: &K) -> Option<(usize, NodeId)> {
        let bucket = self.bucket_for(key);
        let mut current = self.table[bucket];
        while let Some(id) = current {
            match key.cmp(&self.arena.get(id).key) {
                Ordering::Equal => return Some((bucket, id)),
                Ordering::Less => current = self.arena.get(id).left,
                Ordering::Greater => current = self.arena.get(id).right,
            }
        }
        None
    }

    /// Insert `key`/`value`, returning the prior value if `key` was present.
    /// New nodes are always appended to the insertion-order list; replacing
    /// an existing key's value leaves its position in that order untouched.
    pub(super) fn avl_insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = Self::hash_of(&key);
        let bucket = (hash & (self.table.len() as u32 - 1)) as usize;

        let Some(root) = self.table[bucket] else {
            let id = self.arena.alloc(key, value, hash);
            self.table[bucket] = Some(id);
            self.link_tail(id);
            self.size += 1;
            self.maybe_grow();
            return None;
        };

        let mut current = root;
        loop {
            match key.cmp(&self.arena.get(current).key) {
                Ordering::Equal => {
                    let node = self.arena.get_mut(current);
                    return Some(std::mem::replace(&mut node.value, value));
                }
                Ordering::Less => match self.arena.get(current).left {
                    Some(next) => current = next,
                    None => {
                        let id = self.arena.alloc(key, value, hash);
                        self.arena.get_mut(id).parent = Some(current);
                        self.arena.get_mut(current).left = Some(id);
                        self.link_tail(id);
                        self.size += 1;
                        self.rebalance(bucket, current);
                        self.maybe_grow();
                        return None;
                    }
                },
                Ordering::Greater => match self.arena.get(current).right {
                    Some(next) => current = next,
                    None => {
                        let id = self.arena.alloc(key, value, hash);
                        self.arena.get_mut(id).parent = Some(current);
                        self.arena.get_mut(current).right = Some(id);
                        self.link_tail(id);
                        self.size += 1;
                        self.rebalance(bucket, current);
                        self.maybe_grow();
                        return None;
                    }
                },
            }
        }
    }

    pub(super) fn bucket_for(&self, key: &K) -> usize {
        let hash = Self::hash_of(key);
        (hash & (self.table.len() as u32 - 1)) as usize
    }

    fn balance_factor(&self, id: NodeId) -> i32 {
        let node = self.arena.get(id);
        self.arena.height_of(node.left) - self.arena.height_of(node.right)
    }

    pub(super) fn update_height(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        let h = self.arena.height_of(node.left).max(self.arena.height_of(node.right)) + 1;
        self.arena.get_mut(id).height = h;
    }

    pub(super) fn attach_to_parent(&mut self, bucket: usize, old_child: NodeId, new_child: NodeId, parent: Option<NodeId>) {
        self.arena.get_mut(new_child).parent = parent;
        match parent {
            None => self.table[bucket] = Some(new_child),
            Some(p) => {
                if self.arena.get(p).left == Some(old_child) {
                    self.arena.get_mut(p).left = Some(new_child);
                } else {
                    self.arena.get_mut(p).right = Some(new_child);
                }
            }
        }
    }

    fn rotate_left(&mut self, bucket: usize, x: NodeId) -> NodeId {
        let parent = self.arena.get(x).parent;
        let y = self.arena.get(x).right.expect("rotate_left requires a right child");
        let t2 = self.arena.get(y).left;

        self.arena.get_mut(x).right = t2;
        if let Some(t2) = t2 {
            self.arena.get_mut(t2).parent = Some(x);
        }
        self.arena.get_mut(y).left = Some(x);
        self.arena.get_mut(x).parent = Some(y);

        self.update_height(x);
        self.update_height(y);
        self.attach_to_parent(bucket, x, y, parent);
        y
    }

    fn rotate_right(&mut self, bucket: usize, x: NodeId) -> NodeId {
        let parent = self.arena.get(x).parent;
        let y = self.arena.get(x).left.expect("rotate_right requires a left child");
        let t2 = self.arena.get(y).right;

        self.arena.get_mut(x).left = t2;
        if let Some(t2) = t2 {
            self.arena.get_mut(t2).parent = Some(x);
        }
        self.arena.get_mut(y).right = Some(x);
        self.arena.get_mut(x).parent = Some(y);

        self.update_height(x);
        self.update_height(y);
        self.attach_to_parent(bucket, x, y, parent);
        y
    }

    /// Walk from `node` up to the bucket root, recomputing heights and
    /// rotating any subtree whose balance factor has drifted past ±1.
    pub(super) fn rebalance(&mut self, bucket: usize, mut node: NodeId) {
        loop {
            self.update_height(node);
            let balance = self.balance_factor(node);
            let new_root = if balance > 1 {
                let left = self.arena.get(node).left.expect("positive balance implies a left child");
                if self.balance_factor(left) < 0 {
                    self.rotate_left(bucket, left);
                }
                self.rotate_right(bucket, node)
            } else if balance < -1 {
                let right = self.arena.get(node).right.expect("negative balance implies a right child");
                if self.balance_factor(right) > 0 {
                    self.rotate_right(bucket, right);
                }
                self.rotate_left(bucket, node)
            } else {
                node
            };
            match self.arena.get(new_root).parent {
                Some(p) => node = p,
                None => break,
            }
        }
    }
}
