//! `doubleCapacity`: an O(n) resize that never re-walks a bucket's tree with
//! comparisons, because it doesn't need to.
//!
//! Each bucket's AVL tree is already sorted by key (that's what makes it a
//! BST), so a single in-order walk yields a globally sorted run. Doubling
//! the table size only ever splits a bucket in two, by the next hash bit
//! (`hash & old_capacity`), and each half keeps the relative order of the
//! entries it inherits, so both halves can be rebuilt into perfectly
//! balanced trees by picking the middle of each run as its root, with no
//! rotation needed at all.

use super::node::NodeId;
use super::OrderedMap;

const MAX_CAPACITY: usize = 1 << 30;

impl<K, V> OrderedMap<K, V> {
    pub(super) fn maybe_grow(&mut self) {
        if self.size > self.threshold {
            self.double_capacity();
        }
    }

    fn double_capacity(&mut self) {
        let old_capacity = self.table.len();
        if old_capacity >= MAX_CAPACITY {
            return;
        }
        let new_capacity = old_capacity * 2;
        let mut new_table = vec![None; new_capacity];

        for bucket in 0..old_capacity {
            let Some(root) = self.table[bucket] else {
                continue;
            };
            let mut ordered = Vec::new();
            self.collect_in_order(root, &mut ordered);

            let mut low = Vec::with_capacity(ordered.len());
            let mut high = Vec::with_capacity(ordered.len());
            for id in ordered {
                if self.arena.get(id).hash & old_capacity as u32 == 0 {
                    low.push(id);
                } else {
                    high.push(id);
                }
            }

            new_table[bucket] = self.build_balanced(&low, None);
            new_table[bucket + old_capacity] = self.build_balanced(&high, None);
        }

        self.table = new_table;
        self.threshold = new_capacity * 3 / 4;
    }

    fn collect_in_order(&self, root: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = Vec::new();
        let mut current = Some(root);
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.arena.get(id).left;
            }
            match stack.pop() {
                Some(id) => {
                    out.push(id);
                    current = self.arena.get(id).right;
                }
                None => break,
            }
        }
    }

    /// Rebuild a balanced tree over an already-sorted run of ids, without
    /// touching their `prev`/`next` insertion-order links.
    fn build_balanced(&mut self, ids: &[NodeId], parent: Option<NodeId>) -> Option<NodeId> {
        if ids.is_empty() {
            return None;
        }
        let mid = ids.len() / 2;
        let root = ids[mid];
        let left = self.build_balanced(&ids[..mid], Some(root));
        let right = self.build_balanced(&ids[mid + 1..], Some(root));
        let height = self.arena.height_of(left).max(self.arena.height_of(right)) + 1;

        let node = self.arena.get_mut(root);
        node.parent = parent;
        node.left = left;
        node.right = right;
        node.height = height;
        Some(root)
    }
}
