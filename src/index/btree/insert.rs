//! Insertion: upsert, node split and root promotion.

use tracing::trace;

use crate::common::NodeId;
use crate::index::btree::{BTree, Entry, Node};

impl<K: Ord, V> BTree<K, V> {
    /// Insert `key` with `value`, or overwrite the value of an existing key.
    ///
    /// Returns the previous value when the key was already present. An
    /// overwrite never changes the structure or the size.
    pub fn add(&mut self, key: K, value: V) -> Option<V> {
        let loc = self.locate(&key);
        if loc.found {
            let entry = &mut self.nodes.get_mut(loc.node).entries[loc.index];
            return Some(entry.replace_value(value));
        }

        self.nodes
            .get_mut(loc.node)
            .entries
            .insert(loc.index, Entry::new(key, value));
        self.len += 1;

        self.fix_overflow(loc.node);
        None
    }

    /// Split overfull nodes bottom-up, starting at `current`.
    ///
    /// Each split promotes one entry into the parent, which may overflow in
    /// turn. Splitting the root grows the tree by one level and ends the loop.
    fn fix_overflow(&mut self, mut current: NodeId) {
        while self.nodes.get(current).key_count() > self.config.order {
            let (median, sibling) = self.split_node(current);
            self.stats.splits += 1;

            let Some(parent) = self.nodes.get(current).parent else {
                self.promote_root(median, current, sibling);
                return;
            };

            let slot = match self.nodes.get(parent).search(median.key()) {
                Ok(_) => panic!("promoted key is already present in parent {}", parent),
                Err(slot) => slot,
            };
            trace!(node = %current, sibling = %sibling, parent = %parent, slot, "split node");

            let parent_node = self.nodes.get_mut(parent);
            parent_node.entries.insert(slot, median);
            parent_node.children.insert(slot + 1, sibling);
            current = parent;
        }
    }

    /// Split `id` at its median position `floor(m / 2)`.
    ///
    /// The node keeps the lower entries (and their children); a new right
    /// sibling under the same parent takes the upper ones. Returns the median
    /// entry, which the caller must place in the parent, and the sibling.
    fn split_node(&mut self, id: NodeId) -> (Entry<K, V>, NodeId) {
        let split_at = self.config.order / 2;

        let node = self.nodes.get_mut(id);
        let right_entries = node.entries.split_off(split_at + 1);
        let median = node.entries.remove(split_at);
        let right_children = if node.is_leaf() {
            Vec::new()
        } else {
            node.children.split_off(split_at + 1)
        };
        let parent = node.parent;

        let sibling = self
            .nodes
            .alloc(Node::from_parts(right_entries, right_children, parent));
        self.adopt_children(sibling);
        (median, sibling)
    }

    /// Replace the root with a new node holding only `median`.
    fn promote_root(&mut self, median: Entry<K, V>, left: NodeId, right: NodeId) {
        let root = self
            .nodes
            .alloc(Node::from_parts(vec![median], vec![left, right], None));
        self.adopt_children(root);
        trace!(old_root = %left, new_root = %root, "promoted new root");

        self.root = root;
        self.stats.root_splits += 1;
    }
}
