//! The [`BTree`] type: construction, search and read-only operations.
//!
//! Mutation lives next door: insertion in `insert.rs`, deletion in
//! `delete.rs`, the date-stepping range lookup in `range.rs`.

use std::borrow::Borrow;
use std::fmt;

use tracing::debug;

use crate::common::{BTreeConfig, Error, NodeId, Result};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::{Node, TreeStats};

/// Where a key is, or where it would go.
///
/// Returned by [`BTree::locate`]. When `found` is true, `node.entries[index]`
/// holds the key. Otherwise `node` is a leaf and `index` is the insertion
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub node: NodeId,
    pub index: usize,
    pub found: bool,
}

/// An ordered key-value map backed by a B-tree of fixed order.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                        BTree<K, V>                       │
/// │  ┌──────────┐   ┌────────────────────────────────────┐   │
/// │  │  root    │──▶│  nodes: NodeArena<K, V>            │   │
/// │  │  NodeId  │   │  [Node0] [Node1] [ free ] [Node3]  │   │
/// │  └──────────┘   └────────────────────────────────────┘   │
/// │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐      │
/// │  │   len    │   │  config  │   │  stats           │      │
/// │  │  usize   │   │  order m │   │  split/merge/... │      │
/// │  └──────────┘   └──────────┘   └──────────────────┘      │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// Every non-root node holds between `floor(m / 2)` and `m` entries, all
/// leaves sit at the same depth, and the root is always present (an empty
/// tree is a single empty leaf).
///
/// # Usage
/// ```
/// use rangemap_btree::BTree;
///
/// let mut tree = BTree::with_order(3).unwrap();
/// for k in [10, 20, 30, 40, 50] {
///     tree.add(k, k * 100);
/// }
///
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.lookup(&30), Some(&3000));
/// assert_eq!(tree.remove(&30), Some(3000));
/// assert!(!tree.contains(&30));
/// ```
#[derive(Clone)]
pub struct BTree<K, V> {
    /// Arena owning every node of the tree.
    pub(super) nodes: NodeArena<K, V>,

    /// Current root. Replaced on root split and root collapse.
    pub(super) root: NodeId,

    /// Number of distinct keys.
    pub(super) len: usize,

    /// Immutable after construction.
    pub(super) config: BTreeConfig,

    pub(super) stats: TreeStats,
}

impl<K, V> BTree<K, V> {
    /// Create an empty tree of the default order (3).
    pub fn new() -> Self {
        Self::from_valid_config(BTreeConfig::default())
    }

    /// Create an empty tree of order `order`.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is below [`MIN_ORDER`](crate::common::config::MIN_ORDER)
    pub fn with_order(order: usize) -> Result<Self> {
        Self::with_config(BTreeConfig::new(order))
    }

    /// Create an empty tree from a full configuration.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if the configured order is too small
    pub fn with_config(config: BTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: BTreeConfig) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.alloc(Node::new_leaf(None));
        debug!(order = config.order, "created B-tree");

        Self {
            nodes,
            root,
            len: 0,
            config,
            stats: TreeStats::new(),
        }
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum entries per node.
    #[inline]
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Minimum entries per non-root node.
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.config.min_keys()
    }

    pub fn config(&self) -> &BTreeConfig {
        &self.config
    }

    /// Snapshot of the rebalancing counters.
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// Handle of the current root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Borrow a node for structural inspection.
    ///
    /// # Panics
    /// Panics if `id` does not name a live node of this tree.
    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes.get(id)
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Some(&child) = self.nodes.get(current).children.first() {
            height += 1;
            current = child;
        }
        height
    }

    /// Remove every entry. The order and the stats are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::new_leaf(None));
        self.len = 0;
    }

    /// Follow first children from `id` down to a leaf.
    pub(super) fn leftmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&child) = self.nodes.get(id).children.first() {
            id = child;
        }
        id
    }

    fn rightmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&child) = self.nodes.get(id).children.last() {
            id = child;
        }
        id
    }

    /// Point every child of `id` back at `id`.
    pub(super) fn adopt_children(&mut self, id: NodeId) {
        let children = self.nodes.get(id).children.clone();
        for child in children {
            self.nodes.get_mut(child).parent = Some(id);
        }
    }

    /// Smallest key and its value.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.nodes.get(self.leftmost_leaf(self.root));
        leaf.entries.first().map(|e| (e.key(), e.value()))
    }

    /// Largest key and its value.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.nodes.get(self.rightmost_leaf(self.root));
        leaf.entries.last().map(|e| (e.key(), e.value()))
    }

    /// All entries in key order.
    pub fn to_vec(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_in_order(self.root, &mut out);
        out
    }

    /// All keys in order.
    pub fn keys(&self) -> Vec<&K> {
        self.to_vec().into_iter().map(|(k, _)| k).collect()
    }

    fn collect_in_order<'a>(&'a self, id: NodeId, out: &mut Vec<(&'a K, &'a V)>) {
        let node = self.nodes.get(id);
        for (i, entry) in node.entries.iter().enumerate() {
            if let Some(&child) = node.children.get(i) {
                self.collect_in_order(child, out);
            }
            out.push((entry.key(), entry.value()));
        }
        if let Some(&child) = node.children.get(node.entries.len()) {
            self.collect_in_order(child, out);
        }
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Walk from the root to the node holding `key`, or to the leaf where it
    /// would be inserted.
    pub fn locate<Q>(&self, key: &Q) -> Locator
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            match node.search(key) {
                Ok(index) => {
                    return Locator {
                        node: current,
                        index,
                        found: true,
                    }
                }
                Err(index) if node.is_leaf() => {
                    return Locator {
                        node: current,
                        index,
                        found: false,
                    }
                }
                Err(index) => current = node.child(index),
            }
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.locate(key).found
    }

    /// Value stored under `key`, or `None` if the key is not present.
    pub fn lookup<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let loc = self.locate(key);
        if !loc.found {
            return None;
        }
        Some(self.nodes.get(loc.node).entries[loc.index].value())
    }

    pub fn lookup_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let loc = self.locate(key);
        if !loc.found {
            return None;
        }
        Some(self.nodes.get_mut(loc.node).entries[loc.index].value_mut())
    }

    /// Check every structural invariant of the tree.
    ///
    /// Checks key ordering within and across nodes, child counts, equal leaf
    /// depth, the `[min_keys, order]` band for non-root nodes, parent links,
    /// the size counter, and that no arena node is unreachable.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first broken invariant
    pub fn validate(&self) -> Result<()> {
        let root = self.nodes.get(self.root);
        if root.parent.is_some() {
            return Err(violation(format!("root {} has a parent", self.root)));
        }
        if root.key_count() == 0 && !root.is_leaf() {
            return Err(violation(format!("root {} is empty but has children", self.root)));
        }

        let mut walk = Walk {
            leaf_depth: None,
            entries: 0,
            nodes: 0,
        };
        self.validate_node(self.root, None, None, 0, &mut walk)?;

        if walk.entries != self.len {
            return Err(violation(format!(
                "size counter is {} but {} entries are reachable",
                self.len, walk.entries
            )));
        }
        if walk.nodes != self.nodes.len() {
            return Err(violation(format!(
                "{} live nodes but only {} reachable from the root",
                self.nodes.len(),
                walk.nodes
            )));
        }
        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<()> {
        let node = self.nodes.get(id);
        walk.nodes += 1;
        walk.entries += node.key_count();

        if id != self.root {
            let count = node.key_count();
            if count < self.min_keys() || count > self.order() {
                return Err(violation(format!(
                    "{} holds {} entries, expected {}..={}",
                    id,
                    count,
                    self.min_keys(),
                    self.order()
                )));
            }
        } else if node.key_count() > self.order() {
            return Err(violation(format!("root holds {} entries", node.key_count())));
        }

        for pair in node.entries.windows(2) {
            if pair[0].key() >= pair[1].key() {
                return Err(violation(format!("{} entries are not strictly sorted", id)));
            }
        }
        if let (Some(lower), Some(first)) = (lower, node.entries.first()) {
            if first.key() <= lower {
                return Err(violation(format!("{} has a key below its lower bound", id)));
            }
        }
        if let (Some(upper), Some(last)) = (upper, node.entries.last()) {
            if last.key() >= upper {
                return Err(violation(format!("{} has a key above its upper bound", id)));
            }
        }

        if node.is_leaf() {
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(violation(format!(
                        "leaf {} at depth {}, other leaves at depth {}",
                        id, depth, expected
                    )));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != node.key_count() + 1 {
            return Err(violation(format!(
                "{} has {} entries but {} children",
                id,
                node.key_count(),
                node.children.len()
            )));
        }

        for (i, &child) in node.children.iter().enumerate() {
            if self.nodes.get(child).parent != Some(id) {
                return Err(violation(format!("{} does not point back to parent {}", child, id)));
            }
            let child_lower = if i == 0 { lower } else { Some(node.entries[i - 1].key()) };
            let child_upper = node.entries.get(i).map(|e| e.key()).or(upper);
            self.validate_node(child, child_lower, child_upper, depth + 1, walk)?;
        }
        Ok(())
    }
}

struct Walk {
    leaf_depth: Option<usize>,
    entries: usize,
    nodes: usize,
}

fn violation(message: String) -> Error {
    Error::InvariantViolation(message)
}

impl<K, V> Default for BTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.to_vec()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = BTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for BTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::MIN_ORDER;

    #[test]
    fn test_new_tree_is_empty() {
        let tree: BTree<u32, u32> = BTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.order(), 3);
        assert!(tree.node(tree.root_id()).is_leaf());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_with_order_rejects_small_orders() {
        assert!(BTree::<u32, u32>::with_order(MIN_ORDER).is_ok());
        assert_eq!(
            BTree::<u32, u32>::with_order(1).unwrap_err(),
            Error::InvalidOrder { order: 1, min: MIN_ORDER }
        );
    }

    #[test]
    fn test_locate_empty_tree() {
        let tree: BTree<u32, u32> = BTree::new();
        let loc = tree.locate(&7);
        assert_eq!(
            loc,
            Locator {
                node: tree.root_id(),
                index: 0,
                found: false
            }
        );
    }

    #[test]
    fn test_locate_finds_internal_and_leaf_keys() {
        let tree: BTree<u32, u32> = (1..=7).map(|k| (k, k)).collect();

        // 1..=7 with order 3 puts 2 and 4 in the root
        let root = tree.root_id();
        let loc = tree.locate(&4);
        assert!(loc.found);
        assert_eq!(loc.node, root);

        let loc = tree.locate(&7);
        assert!(loc.found);
        assert!(tree.node(loc.node).is_leaf());

        let loc = tree.locate(&100);
        assert!(!loc.found);
        assert!(tree.node(loc.node).is_leaf());
        assert_eq!(loc.index, tree.node(loc.node).key_count());
    }

    #[test]
    fn test_lookup_and_lookup_mut() {
        let mut tree: BTree<u32, String> = BTree::new();
        tree.add(1, "one".to_string());
        tree.add(2, "two".to_string());

        assert_eq!(tree.lookup(&1).map(String::as_str), Some("one"));
        assert_eq!(tree.lookup(&3), None);

        tree.lookup_mut(&2).unwrap().push('!');
        assert_eq!(tree.lookup(&2).map(String::as_str), Some("two!"));
        assert!(tree.lookup_mut(&9).is_none());
    }

    #[test]
    fn test_first_and_last() {
        let mut tree: BTree<u32, u32> = BTree::new();
        assert_eq!(tree.first_key_value(), None);
        assert_eq!(tree.last_key_value(), None);

        for k in [50, 10, 40, 20, 30, 60, 5] {
            tree.add(k, k + 1);
        }
        assert_eq!(tree.first_key_value(), Some((&5, &6)));
        assert_eq!(tree.last_key_value(), Some((&60, &61)));
    }

    #[test]
    fn test_to_vec_in_order() {
        let tree: BTree<u32, u32> = [9, 3, 7, 1, 5, 8, 2, 6, 4]
            .into_iter()
            .map(|k| (k, k * 2))
            .collect();

        let keys: Vec<u32> = tree.keys().into_iter().copied().collect();
        assert_eq!(keys, (1..=9).collect::<Vec<_>>());
        assert_eq!(tree.to_vec()[0], (&1, &2));
    }

    #[test]
    fn test_height_grows() {
        let mut tree: BTree<u32, u32> = BTree::new();
        for k in 0..3 {
            tree.add(k, k);
        }
        assert_eq!(tree.height(), 1);

        tree.add(3, 3);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_clear() {
        let mut tree: BTree<u32, u32> = (0..20).map(|k| (k, k)).collect();
        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert!(!tree.contains(&3));
        assert!(tree.validate().is_ok());

        tree.add(3, 3);
        assert!(tree.contains(&3));
    }

    #[test]
    fn test_validate_detects_bad_size() {
        let mut tree: BTree<u32, u32> = (0..10).map(|k| (k, k)).collect();
        tree.len += 1;

        match tree.validate() {
            Err(Error::InvariantViolation(msg)) => assert!(msg.contains("size counter")),
            other => panic!("Expected InvariantViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_detects_broken_parent_link() {
        let mut tree: BTree<u32, u32> = (0..10).map(|k| (k, k)).collect();
        let child = tree.node(tree.root_id()).child(0);
        tree.nodes.get_mut(child).parent = None;

        assert!(matches!(tree.validate(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_validate_detects_unsorted_entries() {
        let mut tree: BTree<u32, u32> = (0..3).map(|k| (k, k)).collect();
        let root = tree.root_id();
        tree.nodes.get_mut(root).entries.swap(0, 2);

        assert!(matches!(tree.validate(), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_debug_renders_as_map() {
        let tree: BTree<u32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{:?}", tree), "{1: \"a\", 2: \"b\"}");
    }
}
