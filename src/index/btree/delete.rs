//! Deletion: successor replacement, borrow, merge and root collapse.

use std::borrow::Borrow;

use tracing::trace;

use crate::common::NodeId;
use crate::index::btree::BTree;

impl<K: Ord, V> BTree<K, V> {
    /// Remove `key`, returning its value if it was present.
    ///
    /// A missing key leaves the tree untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove `key`, returning the stored key and value if it was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let loc = self.locate(key);
        if !loc.found {
            return None;
        }

        let (removed, shrunk) = if self.nodes.get(loc.node).is_leaf() {
            let removed = self.nodes.get_mut(loc.node).entries.remove(loc.index);
            (removed, loc.node)
        } else {
            // The in-order successor is the first entry of the leftmost leaf
            // under the right child. It takes the removed entry's slot.
            let right_child = self.nodes.get(loc.node).child(loc.index + 1);
            let leaf = self.leftmost_leaf(right_child);
            let successor = self.nodes.get_mut(leaf).entries.remove(0);
            let removed = std::mem::replace(
                &mut self.nodes.get_mut(loc.node).entries[loc.index],
                successor,
            );
            (removed, leaf)
        };
        self.len -= 1;

        self.fix_underflow(shrunk);
        Some(removed.into_parts())
    }

    /// Restore the minimum key count, starting at `current`, which has just
    /// lost one entry.
    ///
    /// Siblings are tried right before left. A borrow settles the tree; a
    /// merge takes one entry from the parent, so the loop climbs to it.
    fn fix_underflow(&mut self, mut current: NodeId) {
        let min_keys = self.config.min_keys();

        loop {
            let node = self.nodes.get(current);
            let Some(parent) = node.parent else {
                self.collapse_root();
                return;
            };
            if node.key_count() >= min_keys {
                return;
            }

            let parent_node = self.nodes.get(parent);
            let position = match parent_node.child_position(current) {
                Some(position) => position,
                None => panic!("{} is missing from the children of its parent {}", current, parent),
            };
            let right = parent_node.children.get(position + 1).copied();
            let left = position.checked_sub(1).map(|i| parent_node.child(i));

            let has_surplus = |id: Option<NodeId>| {
                id.map_or(false, |id| self.nodes.get(id).key_count() > min_keys)
            };
            let right_surplus = has_surplus(right);
            let left_surplus = has_surplus(left);

            if right_surplus {
                self.borrow_from_right(parent, position);
                return;
            }
            if left_surplus {
                self.borrow_from_left(parent, position);
                return;
            }

            if right.is_some() {
                self.merge_children(parent, position);
            } else if left.is_some() {
                self.merge_children(parent, position - 1);
            } else {
                panic!("non-root {} has no siblings", current);
            }
            current = parent;
        }
    }

    /// Rotate one entry from the right sibling of `children[position]`
    /// through the parent.
    fn borrow_from_right(&mut self, parent: NodeId, position: usize) {
        let node_id = self.nodes.get(parent).child(position);
        let right_id = self.nodes.get(parent).child(position + 1);

        let right = self.nodes.get_mut(right_id);
        let lifted = right.entries.remove(0);
        let moved_child = if right.is_leaf() {
            None
        } else {
            Some(right.children.remove(0))
        };

        let separator = std::mem::replace(&mut self.nodes.get_mut(parent).entries[position], lifted);

        let node = self.nodes.get_mut(node_id);
        node.entries.push(separator);
        if let Some(child) = moved_child {
            node.children.push(child);
            self.nodes.get_mut(child).parent = Some(node_id);
        }

        self.stats.borrows += 1;
        trace!(node = %node_id, sibling = %right_id, "borrowed from right sibling");
    }

    /// Rotate one entry from the left sibling of `children[position]`
    /// through the parent.
    fn borrow_from_left(&mut self, parent: NodeId, position: usize) {
        let node_id = self.nodes.get(parent).child(position);
        let left_id = self.nodes.get(parent).child(position - 1);

        let left = self.nodes.get_mut(left_id);
        let last = left.entries.len() - 1;
        let lifted = left.entries.remove(last);
        let moved_child = if left.is_leaf() {
            None
        } else {
            let last = left.children.len() - 1;
            Some(left.children.remove(last))
        };

        let separator = std::mem::replace(
            &mut self.nodes.get_mut(parent).entries[position - 1],
            lifted,
        );

        let node = self.nodes.get_mut(node_id);
        node.entries.insert(0, separator);
        if let Some(child) = moved_child {
            node.children.insert(0, child);
            self.nodes.get_mut(child).parent = Some(node_id);
        }

        self.stats.borrows += 1;
        trace!(node = %node_id, sibling = %left_id, "borrowed from left sibling");
    }

    /// Merge `children[left_pos + 1]` into `children[left_pos]`, pulling the
    /// separator between them down from the parent. The right node is freed.
    fn merge_children(&mut self, parent: NodeId, left_pos: usize) {
        let parent_node = self.nodes.get_mut(parent);
        let separator = parent_node.entries.remove(left_pos);
        let right_id = parent_node.children.remove(left_pos + 1);
        let left_id = parent_node.children[left_pos];

        let right = self.nodes.take(right_id);
        for &child in &right.children {
            self.nodes.get_mut(child).parent = Some(left_id);
        }

        let left = self.nodes.get_mut(left_id);
        left.entries.push(separator);
        left.entries.extend(right.entries);
        left.children.extend(right.children);

        self.stats.merges += 1;
        trace!(node = %left_id, absorbed = %right_id, parent = %parent, "merged siblings");
    }

    /// Replace an emptied internal root by its only child.
    fn collapse_root(&mut self) {
        let old_root = self.root;
        let root = self.nodes.get(old_root);
        if root.key_count() > 0 || root.is_leaf() {
            return;
        }

        let child = root.child(0);
        self.nodes.take(old_root);
        self.nodes.get_mut(child).parent = None;
        self.root = child;

        self.stats.root_collapses += 1;
        trace!(old_root = %old_root, new_root = %child, "collapsed root");
    }
}

#[cfg(test)]
mod tests {
    use crate::index::btree::BTree;

    fn tree_of(keys: impl IntoIterator<Item = u32>) -> BTree<u32, u32> {
        keys.into_iter().map(|k| (k, k * 10)).collect()
    }

    fn keys_of(tree: &BTree<u32, u32>) -> Vec<u32> {
        tree.keys().into_iter().copied().collect()
    }

    #[test]
    fn test_remove_missing_key() {
        let mut tree = tree_of(1..=7);
        let before = tree.stats();

        assert_eq!(tree.remove(&42), None);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.stats(), before);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_from_root_leaf() {
        let mut tree = tree_of([1, 2, 3]);
        assert_eq!(tree.remove(&2), Some(20));
        assert_eq!(keys_of(&tree), vec![1, 3]);

        tree.remove(&1);
        tree.remove(&3);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_remove_internal_key_uses_successor() {
        // root [2 4], leaves [1] [3] [5 6 7]
        let mut tree = tree_of(1..=7);
        let root = tree.root_id();

        assert_eq!(tree.remove_entry(&4), Some((4, 40)));

        let root_keys: Vec<u32> = tree.node(root).entries().iter().map(|e| *e.key()).collect();
        assert_eq!(root_keys, vec![2, 5]);
        assert!(!tree.contains(&4));
        assert_eq!(tree.lookup(&5), Some(&50));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_borrow_from_right() {
        // root [2 4], leaves [1] [3] [5 6 7]
        let mut tree = tree_of(1..=7);
        tree.remove(&3);

        // [3] underflows; right sibling [5 6 7] has surplus
        assert_eq!(tree.stats().borrows, 1);
        assert_eq!(tree.stats().merges, 0);
        let root = tree.node(tree.root_id());
        assert_eq!(*root.entries()[1].key(), 5);
        assert_eq!(keys_of(&tree), vec![1, 2, 4, 5, 6, 7]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_borrow_from_left() {
        // root [2], leaves [0 1] [3]
        let mut tree = tree_of([1, 2, 3, 4, 0]);
        tree.remove(&4);
        let root = tree.node(tree.root_id());
        assert_eq!(tree.node(root.child(0)).key_count(), 2);
        assert_eq!(tree.node(root.child(1)).key_count(), 1);

        // [3] underflows with no right sibling; [0 1] lends 1 via the parent
        tree.remove(&3);
        assert_eq!(tree.stats().borrows, 1);
        let root = tree.node(tree.root_id());
        assert_eq!(*root.entries()[0].key(), 1);
        assert_eq!(keys_of(&tree), vec![0, 1, 2]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_merge_and_root_collapse() {
        // root [20], leaves [10] [30 40]
        let mut tree = tree_of([10, 20, 30, 40]);
        tree.remove(&40);
        assert_eq!(tree.height(), 2);

        // [10] and [30] both at minimum: merge, root empties and collapses
        tree.remove(&10);
        assert_eq!(tree.stats().merges, 1);
        assert_eq!(tree.stats().root_collapses, 1);
        assert_eq!(tree.height(), 1);
        assert_eq!(keys_of(&tree), vec![20, 30]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_merge_propagates_to_internal_nodes() {
        let mut tree = tree_of(1..=30);
        let height = tree.height();
        assert!(height >= 3);

        for k in 1..=30 {
            assert_eq!(tree.remove(&k), Some(k * 10));
            assert!(tree.validate().is_ok(), "invalid after removing {}", k);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(tree.stats().root_collapses as usize >= height - 1);
    }

    #[test]
    fn test_remove_descending_with_larger_order() {
        let mut tree: BTree<u32, u32> = BTree::with_order(5).unwrap();
        for k in 0..200 {
            tree.add(k, k);
        }
        for k in (0..200).rev().step_by(3) {
            tree.remove(&k);
            assert!(tree.validate().is_ok());
        }
        assert_eq!(tree.len(), 200 - (0..200).rev().step_by(3).count());
    }

    #[test]
    fn test_remove_twice() {
        let mut tree = tree_of(1..=10);
        assert!(tree.remove(&5).is_some());
        assert!(tree.remove(&5).is_none());
        assert_eq!(tree.len(), 9);
    }
}
