//! B-tree node.

use std::borrow::Borrow;

use crate::common::NodeId;
use crate::index::btree::Entry;

/// A node of the tree.
///
/// One shape serves both roles: a leaf is a node whose `children` is empty.
///
/// # Layout
/// ```text
///            entries:   [ e0 ][ e1 ][ e2 ]
///           children: [c0]  [c1]  [c2]  [c3]
///
///   c0 < e0 < c1 < e1 < c2 < e2 < c3
/// ```
/// For an internal node `children.len() == entries.len() + 1`.
///
/// `parent` is a navigation aid for upward traversal during split and merge.
/// Nodes are owned by the arena, never by their parent link.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    pub(crate) entries: Vec<Entry<K, V>>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Create an empty leaf.
    pub fn new_leaf(parent: Option<NodeId>) -> Self {
        Self {
            entries: Vec::new(),
            children: Vec::new(),
            parent,
        }
    }

    /// Create a node from already-ordered parts.
    pub(crate) fn from_parts(
        entries: Vec<Entry<K, V>>,
        children: Vec<NodeId>,
        parent: Option<NodeId>,
    ) -> Self {
        debug_assert!(children.is_empty() || children.len() == entries.len() + 1);
        Self {
            entries,
            children,
            parent,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of entries held.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    /// Position of `child` among this node's children.
    pub fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Find the first entry whose key is `>= key`.
    ///
    /// Returns `Ok(i)` on an exact match, `Err(i)` with the insertion slot
    /// (equivalently, the child to descend into) otherwise.
    #[inline]
    pub fn search<Q>(&self, key: &Q) -> std::result::Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.binary_search_by(|e| e.key().borrow().cmp(key))
    }
}
